//! Soft parsing and comparison of free-text time descriptions.

use crate::keywords::{first_group, KeywordTables};
use crate::text::shared_token_count;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // First digit group shaped like "14", "14:30", "14：30" or "14-30"
    static ref HOUR_REGEX: Regex = Regex::new(r"([0-9]{1,2})[：:-]?([0-9]{0,2})").unwrap();
}

/// Periods that earn partial credit when they differ. Each group holds a
/// single period, so the partial-credit branch never fires today.
const PERIOD_AFFINITY: &[&[&str]] = &[&["morning"], &["afternoon"], &["evening"]];

/// Signals recovered from one time description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSignals {
    pub period: Option<String>,
    pub hour: Option<f64>,
    pub day_class: Option<String>,
    pub is_weekend: bool,
}

impl TimeSignals {
    /// `text` must already be lower-cased.
    pub fn parse(text: &str, tables: &KeywordTables) -> Self {
        let day_class = first_group(&tables.day_classes, text).map(str::to_string);
        Self {
            period: first_group(&tables.periods, text).map(str::to_string),
            hour: parse_hour(text),
            is_weekend: day_class.as_deref() == Some(KeywordTables::WEEKEND),
            day_class,
        }
    }

    fn is_complete(&self) -> bool {
        self.period.is_some() && self.hour.is_some() && self.day_class.is_some()
    }
}

fn parse_hour(text: &str) -> Option<f64> {
    let captures = HOUR_REGEX.captures(text)?;
    let mut hour: f64 = captures.get(1)?.as_str().parse().ok()?;
    if let Some(minutes) = captures.get(2).filter(|m| !m.as_str().is_empty()) {
        hour += minutes.as_str().parse::<f64>().ok()? / 60.0;
    }
    // A bare zero hour reads as "no hour given"
    (hour > 0.0).then_some(hour)
}

fn periods_related(a: &str, b: &str) -> bool {
    PERIOD_AFFINITY
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b))
}

fn hour_score(a: f64, b: f64) -> u32 {
    let diff = (a - b).abs();
    if diff == 0.0 {
        30
    } else if diff <= 1.0 {
        25
    } else if diff <= 2.0 {
        20
    } else if diff <= 4.0 {
        10
    } else {
        0
    }
}

/// Both arguments must be non-empty and lower-cased.
pub fn time_similarity(a: &str, b: &str, tables: &KeywordTables) -> u32 {
    if a == b {
        return 100;
    }

    let left = TimeSignals::parse(a, tables);
    let right = TimeSignals::parse(b, tables);
    let mut score = 0;

    if let (Some(pa), Some(pb)) = (&left.period, &right.period) {
        if pa == pb {
            score += 40;
        } else if periods_related(pa, pb) {
            score += 20;
        }
    }

    if let (Some(ha), Some(hb)) = (left.hour, right.hour) {
        score += hour_score(ha, hb);
    }

    if let (Some(da), Some(db)) = (&left.day_class, &right.day_class) {
        if da == db {
            score += 30;
        } else if left.is_weekend == right.is_weekend {
            // Unreachable with only weekend/weekday classes configured
            score += 15;
        }
    }

    if score == 0 && !(left.is_complete() && right.is_complete()) {
        return fallback_similarity(a, b, tables);
    }

    score.min(100)
}

fn fallback_similarity(a: &str, b: &str, tables: &KeywordTables) -> u32 {
    let shared_group = tables
        .periods
        .iter()
        .chain(&tables.day_classes)
        .any(|group| group.matches(a) && group.matches(b));
    if shared_group {
        return 80;
    }
    if shared_token_count(a, b) > 0 {
        return 40;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordGroup;

    fn score(a: &str, b: &str) -> u32 {
        time_similarity(a, b, &KeywordTables::builtin())
    }

    #[test]
    fn test_parse_signals() {
        let tables = KeywordTables::builtin();
        let signals = TimeSignals::parse("saturday afternoon 14:30-16:00", &tables);
        assert_eq!(signals.period.as_deref(), Some("afternoon"));
        assert_eq!(signals.hour, Some(14.5));
        assert_eq!(signals.day_class.as_deref(), Some("weekend"));
        assert!(signals.is_weekend);

        let signals = TimeSignals::parse("周三晚上7点", &tables);
        assert_eq!(signals.period.as_deref(), Some("evening"));
        assert_eq!(signals.hour, Some(7.0));
        assert_eq!(signals.day_class.as_deref(), Some("weekday"));
        assert!(!signals.is_weekend);
    }

    #[test]
    fn test_parse_hour_variants() {
        assert_eq!(parse_hour("9点"), Some(9.0));
        assert_eq!(parse_hour("19：45"), Some(19.75));
        assert_eq!(parse_hour("14-30"), Some(14.5));
        assert_eq!(parse_hour("0点"), None);
        assert_eq!(parse_hour("whenever"), None);
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(score("周六下午", "周六下午"), 100);
    }

    #[test]
    fn test_all_signals_match() {
        // period 40 + hour 30 + day 30
        assert_eq!(score("saturday afternoon 14:00", "weekend afternoon 14:00 sharp"), 100);
    }

    #[test]
    fn test_hour_steps() {
        assert_eq!(score("monday 14:00", "tuesday 15:00"), 25 + 30);
        assert_eq!(score("monday 14:00", "tuesday 16:00"), 20 + 30);
        assert_eq!(score("monday 14:00", "tuesday 18:00"), 10 + 30);
        assert_eq!(score("monday 8:00", "tuesday 18:00"), 30);
    }

    #[test]
    fn test_different_periods_earn_nothing() {
        // Weekend matches, periods differ, no hours
        assert_eq!(score("saturday morning", "sunday evening"), 30);
    }

    #[test]
    fn test_different_day_classes_earn_nothing() {
        assert_eq!(score("saturday afternoon 14:00", "monday afternoon 14:00"), 70);
    }

    #[test]
    fn test_extra_non_weekend_class_earns_partial_credit() {
        let mut tables = KeywordTables::builtin();
        tables
            .day_classes
            .push(KeywordGroup::new("holiday", &["holiday"]));
        assert_eq!(time_similarity("holiday", "monday", &tables), 15);
        assert_eq!(time_similarity("holiday", "saturday", &tables), 0);
    }

    #[test]
    fn test_fully_parsed_but_disjoint_is_zero() {
        assert_eq!(score("saturday afternoon 14:00-16:00", "monday morning 8:00"), 0);
    }

    #[test]
    fn test_fallback_shared_group() {
        // Parsed periods differ (morning vs evening) yet both mention an evening keyword
        assert_eq!(score("早上或晚上", "晚上"), 80);
        assert_eq!(score("morning or evening", "evening"), 80);
        assert_eq!(score("晚上", "夜里"), 40);
    }

    #[test]
    fn test_fallback_shared_token() {
        assert_eq!(score("after class", "after work"), 40);
        assert_eq!(score("flexible", "whenever"), 0);
    }
}
