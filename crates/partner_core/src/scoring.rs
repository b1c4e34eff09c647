use crate::error::ConfigError;
use crate::keywords::{contains_keyword, share_group, KeywordTables};
use crate::schema::{Demand, HeadCount, Match};
use crate::text::{normalized, shared_token_count};
use crate::time::time_similarity;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Threshold used by the demand-creation flow when none is given.
pub const DEFAULT_MIN_SIMILARITY: i32 = 30;

lazy_static! {
    static ref BUILTIN_RULES: MatchRules = MatchRules::builtin();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub general: GeneralSettings,
    pub weights: FieldWeights,
    pub levels: LevelThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub min_similarity: u8,
}

/// Relative weight of each field in the overall score. The overall score is
/// a true weighted average, so the weights need not sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub activity_type: u32,
    pub time: u32,
    pub location: u32,
    pub people_count: u32,
    pub description: u32,
}

impl FieldWeights {
    pub fn total(&self) -> u64 {
        [
            self.activity_type,
            self.time,
            self.location,
            self.people_count,
            self.description,
        ]
        .iter()
        .map(|weight| u64::from(*weight))
        .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub very_high: u8,
    pub high: u8,
    pub medium: u8,
    pub fair: u8,
}

impl LevelThresholds {
    /// Every level stays reachable only when thresholds never increase
    /// from `very_high` down to `fair`.
    pub fn is_ordered(&self) -> bool {
        self.very_high >= self.high && self.high >= self.medium && self.medium >= self.fair
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityLevel {
    VeryHigh,
    High,
    Medium,
    Fair,
    Low,
}

impl fmt::Display for SimilarityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SimilarityLevel::VeryHigh => "very high",
            SimilarityLevel::High => "high",
            SimilarityLevel::Medium => "medium",
            SimilarityLevel::Fair => "fair",
            SimilarityLevel::Low => "low",
        };
        write!(f, "{value}")
    }
}

/// Per-field sub-scores (each 0..=100) and the weighted overall score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub activity_type: u32,
    pub time: u32,
    pub location: u32,
    pub people_count: u32,
    pub description: u32,
    pub overall: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRules {
    pub config: MatcherConfig,
    pub tables: KeywordTables,
}

impl MatchRules {
    pub fn builtin() -> Self {
        Self {
            config: MatcherConfig {
                general: GeneralSettings { min_similarity: 30 },
                weights: FieldWeights {
                    activity_type: 35,
                    time: 30,
                    location: 20,
                    people_count: 10,
                    description: 5,
                },
                levels: LevelThresholds {
                    very_high: 80,
                    high: 60,
                    medium: 40,
                    fair: 30,
                },
            },
            tables: KeywordTables::builtin(),
        }
    }

    /// Reads `matcher.toml` and `keywords.yaml` from `path`.
    pub fn load_from_dir(path: &Path) -> Result<Self, ConfigError> {
        let config_path = path.join("matcher.toml");
        let config_str = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        let config: MatcherConfig =
            toml::from_str(&config_str).map_err(|source| ConfigError::Toml {
                path: config_path.clone(),
                source,
            })?;

        let keywords_path = path.join("keywords.yaml");
        let keywords_str = fs::read_to_string(&keywords_path).map_err(|source| ConfigError::Io {
            path: keywords_path.clone(),
            source,
        })?;
        let tables: KeywordTables =
            serde_yaml::from_str(&keywords_str).map_err(|source| ConfigError::Yaml {
                path: keywords_path.clone(),
                source,
            })?;

        if config.weights.total() == 0 {
            return Err(ConfigError::ZeroWeights);
        }
        if !config.levels.is_ordered() {
            return Err(ConfigError::LevelsOutOfOrder);
        }
        if config.general.min_similarity > 100 {
            return Err(ConfigError::ThresholdOutOfRange(i64::from(
                config.general.min_similarity,
            )));
        }

        tracing::info!(
            path = %path.display(),
            categories = tables.activity_categories.len(),
            "loaded matcher rules"
        );
        Ok(Self { config, tables })
    }

    pub fn default_min_similarity(&self) -> i32 {
        i32::from(self.config.general.min_similarity)
    }

    pub fn calculate_similarity(&self, a: &Demand, b: &Demand) -> u8 {
        self.score_breakdown(a, b).overall
    }

    pub fn score_breakdown(&self, a: &Demand, b: &Demand) -> ScoreBreakdown {
        let tables = &self.tables;
        let weights = &self.config.weights;

        let activity_type = compare_text(&a.activity_type, &b.activity_type, |x, y| {
            type_similarity(x, y, tables)
        });
        let time = compare_text(&a.time, &b.time, |x, y| time_similarity(x, y, tables));
        let location = compare_text(&a.location, &b.location, |x, y| {
            location_similarity(x, y, tables)
        });
        let people_count = people_similarity(a.people_count.as_ref(), b.people_count.as_ref());
        let description = compare_text(&a.desc, &b.desc, |x, y| {
            description_similarity(x, y, tables)
        });

        let overall = weighted_overall(&[
            (activity_type, weights.activity_type),
            (time, weights.time),
            (location, weights.location),
            (people_count, weights.people_count),
            (description, weights.description),
        ]);

        ScoreBreakdown {
            activity_type,
            time,
            location,
            people_count,
            description,
            overall,
        }
    }

    /// Scores every demand in `pool` against `candidate`, keeps those at or
    /// above `min_similarity` and orders them by descending similarity.
    /// Equal scores keep pool order. A threshold outside 0..=100 matches
    /// nothing.
    pub fn find_similar_demands(
        &self,
        candidate: &Demand,
        pool: &[Demand],
        min_similarity: i32,
    ) -> Vec<Match> {
        if !(0..=100).contains(&min_similarity) {
            tracing::debug!(min_similarity, "threshold out of range, skipping match");
            return Vec::new();
        }

        let mut matches: Vec<Match> = pool
            .iter()
            .filter(|existing| !is_same_demand(candidate, existing))
            .map(|existing| Match {
                demand: existing.clone(),
                similarity: self.calculate_similarity(candidate, existing),
            })
            .filter(|found| i32::from(found.similarity) >= min_similarity)
            .collect();
        matches.sort_by(|a, b| b.similarity.cmp(&a.similarity));

        tracing::debug!(
            pool = pool.len(),
            matched = matches.len(),
            min_similarity,
            "scored demand pool"
        );
        matches
    }

    pub fn level(&self, similarity: u8) -> SimilarityLevel {
        let levels = &self.config.levels;
        if similarity >= levels.very_high {
            SimilarityLevel::VeryHigh
        } else if similarity >= levels.high {
            SimilarityLevel::High
        } else if similarity >= levels.medium {
            SimilarityLevel::Medium
        } else if similarity >= levels.fair {
            SimilarityLevel::Fair
        } else {
            SimilarityLevel::Low
        }
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::builtin()
    }
}

/// [`MatchRules::calculate_similarity`] with the built-in rules.
pub fn calculate_similarity(a: &Demand, b: &Demand) -> u8 {
    BUILTIN_RULES.calculate_similarity(a, b)
}

/// [`MatchRules::find_similar_demands`] with the built-in rules.
pub fn find_similar_demands(candidate: &Demand, pool: &[Demand], min_similarity: i32) -> Vec<Match> {
    BUILTIN_RULES.find_similar_demands(candidate, pool, min_similarity)
}

fn is_same_demand(candidate: &Demand, existing: &Demand) -> bool {
    match (&candidate.id, &existing.id) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn compare_text(
    a: &Option<String>,
    b: &Option<String>,
    scorer: impl Fn(&str, &str) -> u32,
) -> u32 {
    match (normalized(a.as_deref()), normalized(b.as_deref())) {
        (Some(a), Some(b)) => scorer(&a, &b).min(100),
        _ => 0,
    }
}

fn weighted_overall(scores: &[(u32, u32)]) -> u8 {
    let total_weight: u64 = scores.iter().map(|(_, weight)| u64::from(*weight)).sum();
    if total_weight == 0 {
        return 0;
    }
    let weighted: u64 = scores
        .iter()
        .map(|(score, weight)| u64::from(*score) * u64::from(*weight))
        .sum();
    let average = weighted as f64 / total_weight as f64;
    average.round().clamp(0.0, 100.0) as u8
}

fn type_similarity(a: &str, b: &str, tables: &KeywordTables) -> u32 {
    if a == b {
        return 100;
    }
    if share_group(&tables.activity_categories, a, b) {
        return 80;
    }
    if shared_token_count(a, b) > 0 {
        return 60;
    }
    0
}

fn location_similarity(a: &str, b: &str, tables: &KeywordTables) -> u32 {
    if a == b {
        return 100;
    }
    let mut best = 0;
    if share_group(&tables.areas, a, b) {
        best = best.max(70);
    }
    if share_group(&tables.places, a, b) {
        best = best.max(85);
    }
    if best > 0 {
        return best;
    }
    let shared = shared_token_count(a, b) as u32;
    (shared * 15).min(60)
}

fn people_similarity(a: Option<&HeadCount>, b: Option<&HeadCount>) -> u32 {
    let (Some(a), Some(b)) = (a.and_then(HeadCount::as_count), b.and_then(HeadCount::as_count))
    else {
        return 0;
    };
    match a.abs_diff(b) {
        0 => 100,
        1 => 80,
        2 => 60,
        3 => 40,
        4 | 5 => 20,
        _ => 0,
    }
}

fn description_similarity(a: &str, b: &str, tables: &KeywordTables) -> u32 {
    if a == b {
        return 100;
    }
    let shared_keywords = tables
        .description_keywords
        .iter()
        .filter(|keyword| contains_keyword(a, keyword) && contains_keyword(b, keyword))
        .count() as u32;
    if shared_keywords > 0 {
        return (shared_keywords * 20).min(80);
    }
    if shared_token_count(a, b) > 0 {
        return 20;
    }
    0
}
