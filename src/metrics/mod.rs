mod types;

pub use types::{FieldBreakdown, StatEntry};

use std::collections::BTreeMap;

use crate::models::{FieldValue, ResponseRecord, SurveyField};

/// Frequency of each observed value of `field`.
///
/// A single-choice answer adds one to its value. A multi-select answer adds
/// one to every value it selected, so for `Hope` the counts can add up to
/// more than the number of responses.
pub fn count_by(responses: &[ResponseRecord], field: SurveyField) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for response in responses {
        match response.value_of(field) {
            FieldValue::Scalar(value) => {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
            FieldValue::Multi(values) => {
                for value in values {
                    *counts.entry(value.to_string()).or_insert(0) += 1;
                }
            }
        }
    }
    counts
}

/// Share of respondents, in percent, rounded to one decimal place.
///
/// `total` is the number of responses; a zero total yields 0.0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Counts and percentages for one field, most frequent first.
pub fn breakdown(responses: &[ResponseRecord], field: SurveyField) -> FieldBreakdown {
    let total = responses.len();
    let mut entries: Vec<StatEntry> = count_by(responses, field)
        .into_iter()
        .map(|(value, count)| {
            let label = field
                .option_label(&value)
                .map(str::to_string)
                .unwrap_or_else(|| value.clone());
            StatEntry {
                value,
                label,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    // count_by yields values in order, so a stable sort keeps ties alphabetical
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    FieldBreakdown {
        field,
        title: field.label().to_string(),
        total_responses: total,
        entries,
    }
}

/// Breakdowns for every survey field, or `None` when there is nothing to aggregate.
pub fn summarize(responses: &[ResponseRecord]) -> Option<Vec<FieldBreakdown>> {
    if responses.is_empty() {
        return None;
    }
    Some(
        SurveyField::ALL
            .iter()
            .map(|field| breakdown(responses, *field))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Familiarity, Hope, Role, SurveyOption};
    use chrono::{TimeZone, Utc};

    fn response(role: Role, familiarity: Familiarity, hope: &[Hope]) -> ResponseRecord {
        ResponseRecord {
            id: format!("{}-{}", role.as_str(), hope.len()),
            session_id: "s".into(),
            role,
            familiarity,
            hope: hope.to_vec(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ResponseRecord> {
        vec![
            response(Role::Engineer, Familiarity::Beginner, &[Hope::PracticalSkills, Hope::Networking]),
            response(Role::Engineer, Familiarity::Advanced, &[Hope::PracticalSkills]),
            response(Role::Designer, Familiarity::Beginner, &[Hope::Inspiration, Hope::Networking, Hope::CareerGrowth]),
        ]
    }

    #[test]
    fn scalar_field_counts_once_per_response() {
        let counts = count_by(&sample(), SurveyField::Role);
        assert_eq!(counts.get("engineer"), Some(&2));
        assert_eq!(counts.get("designer"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 3);
    }

    #[test]
    fn multi_select_counts_every_selection() {
        let responses = sample();
        let counts = count_by(&responses, SurveyField::Hope);
        assert_eq!(counts.get("practical-skills"), Some(&2));
        assert_eq!(counts.get("networking"), Some(&2));
        assert_eq!(counts.get("inspiration"), Some(&1));
        assert!(counts.values().sum::<usize>() > responses.len());
    }

    #[test]
    fn single_selections_sum_to_response_count() {
        let responses = vec![
            response(Role::Student, Familiarity::None, &[Hope::Networking]),
            response(Role::Student, Familiarity::None, &[Hope::Inspiration]),
        ];
        let counts = count_by(&responses, SurveyField::Hope);
        assert_eq!(counts.values().sum::<usize>(), responses.len());
    }

    #[test]
    fn empty_collection_has_no_counts() {
        assert!(count_by(&[], SurveyField::Familiarity).is_empty());
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn scalar_percentages_sum_to_about_one_hundred() {
        let responses = vec![
            response(Role::Engineer, Familiarity::Beginner, &[Hope::Networking]),
            response(Role::Designer, Familiarity::Beginner, &[Hope::Networking]),
            response(Role::Student, Familiarity::Expert, &[Hope::Networking]),
            response(Role::Other, Familiarity::Expert, &[Hope::Networking]),
            response(Role::Engineer, Familiarity::None, &[Hope::Networking]),
            response(Role::Educator, Familiarity::Advanced, &[Hope::Networking]),
            response(Role::Researcher, Familiarity::Advanced, &[Hope::Networking]),
        ];

        for field in [SurveyField::Role, SurveyField::Familiarity] {
            let breakdown = breakdown(&responses, field);
            let sum: f64 = breakdown.entries.iter().map(|e| e.percentage).sum();
            let tolerance = 0.1 * breakdown.entries.len() as f64;
            assert!((sum - 100.0).abs() <= tolerance, "{field:?} summed to {sum}");
        }
    }

    #[test]
    fn hope_percentages_are_share_of_respondents() {
        let breakdown = breakdown(&sample(), SurveyField::Hope);
        assert_eq!(breakdown.total_responses, 3);
        assert_eq!(breakdown.entry("networking").unwrap().percentage, 66.7);
        let sum: f64 = breakdown.entries.iter().map(|e| e.percentage).sum();
        assert!(sum > 100.0);
        assert_eq!(breakdown.selection_count(), 6);
    }

    #[test]
    fn breakdown_sorts_by_count_then_value() {
        let breakdown = breakdown(&sample(), SurveyField::Hope);
        let values: Vec<_> = breakdown.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(
            values,
            ["networking", "practical-skills", "career-growth", "inspiration"]
        );
        assert_eq!(breakdown.title, "Expected Takeaways");
        assert_eq!(breakdown.entries[1].label, "Practical skills");
    }
}
