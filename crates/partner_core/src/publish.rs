use crate::schema::{Demand, Match};
use crate::scoring::MatchRules;
use serde::Serialize;

/// What the demand-creation flow should do with a freshly drafted demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "matches", rename_all = "snake_case")]
pub enum PublishDecision {
    /// Similar demands exist; offer them to the user before publishing.
    ReviewMatches(Vec<Match>),
    PublishDirectly,
}

/// Routes a new demand using the configured default threshold.
pub fn route_new_demand(rules: &MatchRules, candidate: &Demand, pool: &[Demand]) -> PublishDecision {
    let matches = rules.find_similar_demands(candidate, pool, rules.default_min_similarity());
    if matches.is_empty() {
        tracing::debug!("no similar demands, publishing directly");
        PublishDecision::PublishDirectly
    } else {
        tracing::debug!(count = matches.len(), "similar demands found");
        PublishDecision::ReviewMatches(matches)
    }
}
