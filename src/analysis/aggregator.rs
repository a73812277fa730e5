//! Case aggregation into pie-chart series.
//!
//! Each function walks the case list once, counts a single subject field
//! and returns a [`SeriesOutcome`]. Traversal stops for the whole list at
//! the first case with no `force` or no `force.subject`.

use crate::models::{CaseRecord, Dimension, SeriesEntry, SeriesOutcome, Subject, UNKNOWN_LABEL};
use std::collections::HashMap;

/// Counts labels while remembering the order they were first seen in.
#[derive(Debug, Default)]
struct LabelCounter {
    index: HashMap<String, usize>,
    entries: Vec<SeriesEntry>,
}

impl LabelCounter {
    fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(SeriesEntry {
                    category: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn into_entries(self) -> Vec<SeriesEntry> {
        self.entries
    }
}

/// Feeds the subject of every case into `visit` until a case without a
/// force or subject is reached.
fn for_each_subject<'a, F>(cases: &'a [CaseRecord], mut visit: F)
where
    F: FnMut(&'a Subject),
{
    for case in cases {
        // A missing link ends the scan for the remaining cases too.
        let Some(force) = case.force.as_ref() else {
            break;
        };
        let Some(subject) = force.subject.as_ref() else {
            break;
        };

        visit(subject);
    }
}

/// Counts a free-text subject field, most frequent first.
fn aggregate_text_field<F>(cases: &[CaseRecord], dimension: Dimension, field: F) -> SeriesOutcome
where
    F: Fn(&Subject) -> Option<&str>,
{
    let mut counter = LabelCounter::default();

    for_each_subject(cases, |subject| {
        if let Some(label) = field(subject).filter(|l| !l.is_empty()) {
            counter.add(label);
        }
    });

    let mut entries = counter.into_entries();
    // Stable, so ties keep encounter order.
    entries.sort_by_key(|e| std::cmp::Reverse(e.count));

    SeriesOutcome::from_entries(dimension, entries)
}

/// Aggregate subjects by race, most frequent first.
pub fn aggregate_by_race(cases: &[CaseRecord]) -> SeriesOutcome {
    aggregate_text_field(cases, Dimension::Race, |s| s.race.as_deref())
}

/// Aggregate subjects by sex, most frequent first.
pub fn aggregate_by_sex(cases: &[CaseRecord]) -> SeriesOutcome {
    aggregate_text_field(cases, Dimension::Sex, |s| s.sex.as_deref())
}

/// Map an age to its group label.
///
/// Boundaries belong to the lower group, so 10 is `"0-10"` and 70 is
/// `"60-70"`. Negative ages are `"Unknown"`.
pub fn age_group(age: i64) -> &'static str {
    match age {
        i64::MIN..=-1 => UNKNOWN_LABEL,
        0..=10 => "0-10",
        11..=20 => "10-20",
        21..=30 => "20-30",
        31..=40 => "30-40",
        41..=50 => "40-50",
        51..=60 => "50-60",
        61..=70 => "60-70",
        _ => "70+",
    }
}

/// Aggregate subjects by age group, ordered by group label.
///
/// Labels are compared as strings, which puts `"Unknown"` after the
/// numeric groups.
pub fn aggregate_by_age_group(cases: &[CaseRecord]) -> SeriesOutcome {
    let mut counter = LabelCounter::default();

    for_each_subject(cases, |subject| {
        let label = subject.age.map(age_group).unwrap_or(UNKNOWN_LABEL);
        counter.add(label);
    });

    let mut entries = counter.into_entries();
    entries.sort_by(|a, b| a.category.cmp(&b.category));

    SeriesOutcome::from_entries(Dimension::AgeGroup, entries)
}

/// Aggregate one dimension.
pub fn aggregate(cases: &[CaseRecord], dimension: Dimension) -> SeriesOutcome {
    match dimension {
        Dimension::Race => aggregate_by_race(cases),
        Dimension::Sex => aggregate_by_sex(cases),
        Dimension::AgeGroup => aggregate_by_age_group(cases),
    }
}

/// Count the cases that carry both coordinates.
pub fn located_case_count(cases: &[CaseRecord]) -> usize {
    cases.iter().filter(|c| c.location().is_some()).count()
}
