//! Poll option classification and smart ordering.
//!
//! Decides which answer options count as "attending" and, with smart sort
//! enabled, orders them chronologically: options carrying a time-of-day
//! («в 13:00», «к 8:30») come first in time order, the rest follow by
//! semantic rank (soundcheck → rehearsal → concert → other).
//!
//! The classification is a heuristic over natural language; nuanced answers
//! («Не приду, но если надо — смогу») follow the stated rules exactly, see
//! the edge-case tests.

use crate::domain::{DomainError, PollOption};
use regex::Regex;
use std::sync::LazyLock;

/// «в 13:00», «к 10», «в 9», «к 8:30». Hour is validated separately so that
/// «в 99» is not mistaken for a time.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bв\b|\bк\b)\s*(\d{1,2})(?::(\d{2}))?\b").expect("time regex")
});

fn fold(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the option text reads as "will attend".
///
/// Negation is checked before affirmation: «не смогу на концерт» must never
/// classify as affirmative merely for containing «смогу».
pub fn is_affirmative(text: &str) -> bool {
    let t = fold(text);

    if t.contains("не смогу") || (t.starts_with("не") && t.contains("смогу")) {
        return false;
    }
    if t.contains("не приду") || (t.starts_with("не") && t.contains("приду")) {
        return false;
    }

    t.contains('✅') || t.contains("приду") || t.contains("смогу")
}

/// Minutes since midnight for the first time token in the text, if any.
pub fn extract_minutes(text: &str) -> Option<u32> {
    let t = fold(text);
    let caps = TIME_RE.captures(&t)?;
    let hh: u32 = caps.get(1)?.as_str().parse().ok()?;
    let mm: u32 = caps
        .get(2)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    if hh > 23 || mm > 59 {
        return None;
    }
    Some(hh * 60 + mm)
}

/// Semantic order for options without a time: soundcheck, rehearsal,
/// concert, everything else.
pub fn semantic_rank(text: &str) -> u8 {
    let t = fold(text);
    if t.contains("саунд") || t.contains("чек") {
        return 0;
    }
    if t.contains("репет") {
        return 1;
    }
    if t.contains("концерт") {
        return 2;
    }
    3
}

/// Filter a poll's options down to the affirmative ones, optionally smart
/// sorted. Errors when nothing classifies as affirmative, carrying the full
/// raw option list for diagnosis.
///
/// Smart sort key: timed options precede untimed ones and order by time
/// ascending; untimed options order by semantic rank; the poll's declared
/// order is the final tie-break (the sort is stable).
pub fn select_targets(
    options: &[PollOption],
    smart_sort: bool,
) -> Result<Vec<PollOption>, DomainError> {
    let mut targets: Vec<PollOption> = options
        .iter()
        .filter(|o| is_affirmative(&o.text))
        .cloned()
        .collect();

    if targets.is_empty() {
        let listing = options
            .iter()
            .map(|o| format!("- {}", o.text))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(DomainError::NoAffirmativeOptions { options: listing });
    }

    if smart_sort {
        let mut keyed: Vec<((u8, u32, u8, usize), PollOption)> = targets
            .into_iter()
            .enumerate()
            .map(|(idx, opt)| {
                let key = match extract_minutes(&opt.text) {
                    Some(mins) => (0u8, mins, semantic_rank(&opt.text), idx),
                    None => (1, u32::from(semantic_rank(&opt.text)), 0, idx),
                };
                (key, opt)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        targets = keyed.into_iter().map(|(_, opt)| opt).collect();
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(text: &str) -> PollOption {
        PollOption {
            text: text.to_string(),
            option: vec![text.len() as u8],
        }
    }

    #[test]
    fn affirmative_markers() {
        assert!(is_affirmative("✅ Буду"));
        assert!(is_affirmative("Приду"));
        assert!(is_affirmative("Смогу в 18:00"));
        assert!(is_affirmative("  смогу   на саундчек "));
    }

    #[test]
    fn plain_negatives() {
        assert!(!is_affirmative("Не смогу"));
        assert!(!is_affirmative("не приду"));
        assert!(!is_affirmative("Нет"));
        assert!(!is_affirmative("Ещё не знаю"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn negation_wins_over_affirmation() {
        assert!(!is_affirmative("не смогу на концерт"));
        assert!(!is_affirmative("Не приду, но если надо — смогу"));
        // «не» anywhere before «смогу» without the literal pair still negates
        // via the starts-with rule.
        assert!(!is_affirmative("не в этот раз, смогу в другой"));
    }

    #[test]
    fn time_extraction() {
        assert_eq!(extract_minutes("Концерт в 19:00"), Some(19 * 60));
        assert_eq!(extract_minutes("сбор к 8:30"), Some(8 * 60 + 30));
        assert_eq!(extract_minutes("в 9"), Some(9 * 60));
        assert_eq!(extract_minutes("к 10"), Some(10 * 60));
        assert_eq!(extract_minutes("Репетиция"), None);
    }

    #[test]
    fn time_extraction_rejects_out_of_range() {
        assert_eq!(extract_minutes("в 99"), None);
        assert_eq!(extract_minutes("в 24"), None);
        assert_eq!(extract_minutes("в 12:75"), None);
    }

    #[test]
    fn semantic_ranks() {
        assert_eq!(semantic_rank("Саундчек"), 0);
        assert_eq!(semantic_rank("чек в зале"), 0);
        assert_eq!(semantic_rank("Репетиция"), 1);
        assert_eq!(semantic_rank("Концерт"), 2);
        assert_eq!(semantic_rank("Просто приду"), 3);
    }

    #[test]
    fn smart_sort_orders_timed_then_semantic() {
        let options = vec![
            opt("Смогу на концерт в 19:00"),
            opt("Смогу на саундчек в 18:00"),
            opt("Смогу на репетицию"),
            opt("Не смогу"),
        ];
        let targets = select_targets(&options, true).unwrap();
        let texts: Vec<&str> = targets.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "Смогу на саундчек в 18:00",
                "Смогу на концерт в 19:00",
                "Смогу на репетицию",
            ]
        );
    }

    #[test]
    fn plain_order_preserved_without_smart_sort() {
        let options = vec![
            opt("Смогу на концерт в 19:00"),
            opt("Смогу на саундчек в 18:00"),
            opt("Не приду"),
        ];
        let targets = select_targets(&options, false).unwrap();
        let texts: Vec<&str> = targets.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(
            texts,
            ["Смогу на концерт в 19:00", "Смогу на саундчек в 18:00"]
        );
    }

    #[test]
    fn no_affirmative_options_is_an_error() {
        let options = vec![opt("Не смогу"), opt("Не приду")];
        let err = select_targets(&options, false).unwrap_err();
        match err {
            DomainError::NoAffirmativeOptions { options } => {
                assert!(options.contains("Не смогу"));
                assert!(options.contains("Не приду"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
