use serde::{Deserialize, Serialize};

use crate::models::SurveyField;

/// Count and share of respondents for one option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEntry {
    pub value: String,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Aggregate of one survey field over a response collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBreakdown {
    pub field: SurveyField,
    pub title: String,
    /// Number of responses, not number of selections
    pub total_responses: usize,
    /// Sorted by count descending, ties by value
    pub entries: Vec<StatEntry>,
}

impl FieldBreakdown {
    pub fn selection_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn entry(&self, value: &str) -> Option<&StatEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }
}
