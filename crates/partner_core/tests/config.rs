use partner_core::{ConfigError, Demand, MatchRules};
use std::fs;
use std::path::{Path, PathBuf};

fn shipped_config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

fn copy_shipped_config(dir: &Path) {
    for name in ["matcher.toml", "keywords.yaml"] {
        fs::copy(shipped_config_dir().join(name), dir.join(name)).unwrap();
    }
}

#[test]
fn test_shipped_config_matches_builtin_rules() {
    let rules = MatchRules::load_from_dir(&shipped_config_dir()).unwrap();
    assert_eq!(rules, MatchRules::builtin());
}

#[test]
fn test_missing_dir_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MatchRules::load_from_dir(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    fs::write(dir.path().join("matcher.toml"), "[general\nmin_similarity = ").unwrap();
    let err = MatchRules::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn test_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    fs::write(dir.path().join("keywords.yaml"), "areas: [unclosed").unwrap();
    let err = MatchRules::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
}

#[test]
fn test_zero_weights_rejected() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    fs::write(
        dir.path().join("matcher.toml"),
        r#"
[general]
min_similarity = 30

[weights]
activity_type = 0
time = 0
location = 0
people_count = 0
description = 0

[levels]
very_high = 80
high = 60
medium = 40
fair = 30
"#,
    )
    .unwrap();
    let err = MatchRules::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroWeights));
}

#[test]
fn test_misordered_levels_rejected() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    let config = fs::read_to_string(dir.path().join("matcher.toml")).unwrap();
    fs::write(
        dir.path().join("matcher.toml"),
        config.replace("high = 60", "high = 90"),
    )
    .unwrap();
    let err = MatchRules::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::LevelsOutOfOrder));
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    let config = fs::read_to_string(dir.path().join("matcher.toml")).unwrap();
    fs::write(
        dir.path().join("matcher.toml"),
        config.replace("min_similarity = 30", "min_similarity = 150"),
    )
    .unwrap();
    let err = MatchRules::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ThresholdOutOfRange(150)));
}

#[test]
fn test_new_category_needs_no_code_change() {
    let dir = tempfile::tempdir().unwrap();
    copy_shipped_config(dir.path());
    let mut keywords = fs::read_to_string(dir.path().join("keywords.yaml")).unwrap();
    keywords = keywords.replace(
        "activity_categories:\n",
        "activity_categories:\n  - name: \"outdoors\"\n    keywords: [\"hiking\", \"climbing\"]\n",
    );
    fs::write(dir.path().join("keywords.yaml"), keywords).unwrap();

    let rules = MatchRules::load_from_dir(dir.path()).unwrap();
    let hike = Demand {
        activity_type: Some("hiking".to_string()),
        ..Demand::default()
    };
    let climb = Demand {
        activity_type: Some("climbing".to_string()),
        ..Demand::default()
    };
    assert_eq!(rules.score_breakdown(&hike, &climb).activity_type, 80);
    assert_eq!(MatchRules::builtin().score_breakdown(&hike, &climb).activity_type, 0);
}
