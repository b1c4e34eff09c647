use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use partner_core::{route_new_demand, Demand, MatchRules, SimilarityLevel};
use schemars::schema_for;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "partner")]
#[command(about = "Activity partner demand matcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export JSON Schemas for demand records
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Rank existing demands by similarity to a candidate
    Match {
        /// JSON file holding the candidate demand
        #[arg(long)]
        candidate: PathBuf,
        /// JSON file holding an array of existing demands
        #[arg(long)]
        pool: PathBuf,
        /// Directory with matcher.toml and keywords.yaml (default: built-in rules)
        #[arg(long)]
        rules_dir: Option<PathBuf>,
        /// Minimum similarity, 0-100 (default: from rules)
        #[arg(long, allow_negative_numbers = true)]
        min_similarity: Option<i32>,
    },
    /// Show the per-field score breakdown for two demands
    Score {
        a: PathBuf,
        b: PathBuf,
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },
    /// Decide whether a new demand should be published or reviewed first
    Publish {
        #[arg(long)]
        candidate: PathBuf,
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for Demand and Match
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[derive(Serialize)]
struct RankedMatch {
    #[serde(flatten)]
    found: partner_core::Match,
    level: SimilarityLevel,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Match {
            candidate,
            pool,
            rules_dir,
            min_similarity,
        } => match_demands(&candidate, &pool, rules_dir.as_deref(), min_similarity),
        Commands::Score { a, b, rules_dir } => score_pair(&a, &b, rules_dir.as_deref()),
        Commands::Publish {
            candidate,
            pool,
            rules_dir,
        } => publish(&candidate, &pool, rules_dir.as_deref()),
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries JSON results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_rules(rules_dir: Option<&Path>) -> Result<MatchRules> {
    match rules_dir {
        Some(dir) => MatchRules::load_from_dir(dir)
            .with_context(|| format!("Failed to load rules from {}", dir.display())),
        None => Ok(MatchRules::builtin()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid demand JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn match_demands(
    candidate: &Path,
    pool: &Path,
    rules_dir: Option<&Path>,
    min_similarity: Option<i32>,
) -> Result<()> {
    let rules = load_rules(rules_dir)?;
    let candidate: Demand = read_json(candidate)?;
    let pool: Vec<Demand> = read_json(pool)?;
    let threshold = min_similarity.unwrap_or_else(|| rules.default_min_similarity());

    let ranked: Vec<RankedMatch> = rules
        .find_similar_demands(&candidate, &pool, threshold)
        .into_iter()
        .map(|found| RankedMatch {
            level: rules.level(found.similarity),
            found,
        })
        .collect();
    tracing::info!(pool = pool.len(), matched = ranked.len(), threshold, "match complete");
    print_json(&ranked)
}

fn score_pair(a: &Path, b: &Path, rules_dir: Option<&Path>) -> Result<()> {
    let rules = load_rules(rules_dir)?;
    let a: Demand = read_json(a)?;
    let b: Demand = read_json(b)?;
    print_json(&rules.score_breakdown(&a, &b))
}

fn publish(candidate: &Path, pool: &Path, rules_dir: Option<&Path>) -> Result<()> {
    let rules = load_rules(rules_dir)?;
    let candidate: Demand = read_json(candidate)?;
    let pool: Vec<Demand> = read_json(pool)?;
    print_json(&route_new_demand(&rules, &candidate, &pool))
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let demand_schema = schema_for!(partner_core::Demand);
    let demand_json = serde_json::to_string_pretty(&demand_schema)?;
    fs::write(out_dir.join("Demand.schema.json"), demand_json)?;

    let match_schema = schema_for!(partner_core::Match);
    let match_json = serde_json::to_string_pretty(&match_schema)?;
    fs::write(out_dir.join("Match.schema.json"), match_json)?;

    tracing::info!(out_dir = %out_dir.display(), "exported schemas");
    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_match_command() {
        let cli = Cli::try_parse_from([
            "partner",
            "match",
            "--candidate",
            "c.json",
            "--pool",
            "p.json",
            "--min-similarity",
            "-5",
        ])
        .unwrap();
        match cli.command {
            Commands::Match { min_similarity, rules_dir, .. } => {
                assert_eq!(min_similarity, Some(-5));
                assert!(rules_dir.is_none());
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_schema_export_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("schemas");
        schema_export(out_dir.clone()).unwrap();
        assert!(out_dir.join("Demand.schema.json").exists());
        assert!(out_dir.join("Match.schema.json").exists());
    }
}
