//! Attendance report: section tally, music stand math, text rendering.
//!
//! Counting happens after the full voter set is known, so this module is
//! pure: a voter set and a registry in, a formatted report out. No error
//! outcomes — empty inputs yield an all-zero report.

use crate::domain::instrument::{plural_ru, Section};
use crate::domain::MusicianRegistry;
use std::collections::{BTreeMap, HashSet};

/// Derived attendance numbers for one poll run. Transient, never persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportStats {
    /// Per-section head count, in section order. Zero-count sections are
    /// absent.
    pub counts: BTreeMap<Section, usize>,
    /// Voters matched to a registry row (including `Unknown` labels).
    pub total: usize,
    /// Stands for the paired string sections, two players per stand.
    pub stands_strings: usize,
    /// Stands for everyone else, one per player.
    pub stands_others: usize,
    /// Voters missing from the registry entirely.
    pub unmatched: usize,
}

impl ReportStats {
    /// Join the voter set against the registry and tally sections. Voters
    /// absent from the registry are counted as unmatched, not dropped;
    /// unrecognized labels land in `Section::Unknown`.
    pub fn tally(voters: &HashSet<i64>, registry: &MusicianRegistry) -> Self {
        let mut counts: BTreeMap<Section, usize> = BTreeMap::new();
        let mut total = 0usize;

        for &uid in voters {
            let Some(label) = registry.instrument(uid) else {
                continue;
            };
            total += 1;
            *counts.entry(Section::normalize(label)).or_insert(0) += 1;
        }

        let mut stands_strings = 0usize;
        let mut stands_others = 0usize;
        for (&section, &n) in &counts {
            if section.is_paired_string() {
                stands_strings += n.div_ceil(2);
            } else {
                stands_others += n;
            }
        }

        Self {
            counts,
            total,
            stands_strings,
            stands_others,
            unmatched: voters.len() - total,
        }
    }

    /// Total music stands required.
    pub fn stands_total(&self) -> usize {
        self.stands_strings + self.stands_others
    }

    /// Render the report text: header with the poll question and the counted
    /// option labels, one line per non-empty section in section order, then
    /// the totals block.
    pub fn render(&self, question: &str, option_labels: &[String]) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("🎵 СТАТИСТИКА".to_string());
        lines.push(String::new());
        lines.push(format!("Опрос: {question}"));
        lines.push(format!("Учитываю варианты: {}", option_labels.join(" / ")));
        lines.push(String::new());

        for (&section, &n) in &self.counts {
            lines.push(format!("{} {} {}", section.icon(), n, section.label(n)));
        }

        lines.push(String::new());
        lines.push(format!(
            "📊 Всего: {} {}",
            self.total,
            plural_ru(self.total as i64, "человек", "человека", "человек")
        ));
        lines.push(format!("🎼 Нужно Пультов: {}", self.stands_total()));
        lines.push(format!(
            "❤️ Из них для струнников: {}, 🥴 для остальных: {}",
            self.stands_strings, self.stands_others
        ));

        if self.unmatched > 0 {
            lines.push(format!("⚠️ Не найдено в базе: {}", self.unmatched));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(i64, &str)]) -> MusicianRegistry {
        entries
            .iter()
            .map(|&(id, label)| (id, label.to_string()))
            .collect()
    }

    fn voters(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn end_to_end_scenario() {
        let reg = registry(&[(1, "скрипка 1"), (2, "скрипка2"), (3, "виолончель")]);
        let stats = ReportStats::tally(&voters(&[1, 2, 3, 4]), &reg);

        assert_eq!(stats.counts.get(&Section::FirstViolins), Some(&2));
        assert_eq!(stats.counts.get(&Section::SecondViolins), None);
        assert_eq!(stats.counts.get(&Section::Cello), Some(&1));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unmatched, 1);
        // ceil(2/2) + ceil(1/2) for strings, nothing else.
        assert_eq!(stats.stands_strings, 2);
        assert_eq!(stats.stands_others, 0);
        assert_eq!(stats.stands_total(), 2);
    }

    #[test]
    fn paired_sections_share_stands() {
        let reg = registry(&[
            (1, "альт"),
            (2, "альт"),
            (3, "альт"),
            (4, "альт"),
            (5, "альт"),
        ]);
        let stats = ReportStats::tally(&voters(&[1, 2, 3, 4, 5]), &reg);
        assert_eq!(stats.stands_strings, 3);
        assert_eq!(stats.stands_others, 0);
    }

    #[test]
    fn unpaired_sections_need_one_stand_each() {
        let reg = registry(&[
            (1, "флейта"),
            (2, "флейта"),
            (3, "флейта"),
            (4, "флейта"),
            (5, "флейта"),
        ]);
        let stats = ReportStats::tally(&voters(&[1, 2, 3, 4, 5]), &reg);
        assert_eq!(stats.stands_strings, 0);
        assert_eq!(stats.stands_others, 5);
    }

    #[test]
    fn unknown_labels_are_counted_not_dropped() {
        let reg = registry(&[(1, "укулеле")]);
        let stats = ReportStats::tally(&voters(&[1]), &reg);
        assert_eq!(stats.counts.get(&Section::Unknown), Some(&1));
        assert_eq!(stats.total, 1);
        assert_eq!(stats.unmatched, 0);
        // Unknown players still get a stand each.
        assert_eq!(stats.stands_others, 1);
    }

    #[test]
    fn empty_inputs_yield_zero_report() {
        let stats = ReportStats::tally(&HashSet::new(), &MusicianRegistry::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.unmatched, 0);
        assert_eq!(stats.stands_total(), 0);

        let text = stats.render("Репетиция", &["Приду".to_string()]);
        assert!(text.contains("Всего: 0 человек"));
        assert!(!text.contains("Не найдено в базе"));
    }

    #[test]
    fn render_pluralizes_and_orders_sections() {
        let reg = registry(&[
            (1, "скрипка 2"),
            (2, "скрипка 2"),
            (3, "труба"),
            (4, "дирижёр"),
        ]);
        let stats = ReportStats::tally(&voters(&[1, 2, 3, 4]), &reg);
        let text = stats.render(
            "Кто будет на концерте?",
            &["Смогу в 19:00".to_string(), "Приду".to_string()],
        );

        assert!(text.contains("Опрос: Кто будет на концерте?"));
        assert!(text.contains("Учитываю варианты: Смогу в 19:00 / Приду"));
        assert!(text.contains("🎻 2 вторые скрипки"));
        assert!(text.contains("🎺 1 труба"));
        assert!(text.contains("👨‍🏫 1 дирижер"));
        // Strings render before brass, brass before the conductor.
        let violins = text.find("вторые скрипки").unwrap();
        let trumpet = text.find("труба").unwrap();
        let conductor = text.find("дирижер").unwrap();
        assert!(violins < trumpet && trumpet < conductor);

        assert!(text.contains("📊 Всего: 4 человека"));
        assert!(text.contains("🎼 Нужно Пультов: 3"));
        assert!(text.contains("для струнников: 1, 🥴 для остальных: 2"));
    }
}
