use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::survey::{Familiarity, FieldValue, Hope, Role, SurveyField, SurveyOption};

/// One participant's validated answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub familiarity: Familiarity,
    pub hope: Vec<Hope>,
    pub timestamp: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn value_of(&self, field: SurveyField) -> FieldValue {
        match field {
            SurveyField::Role => FieldValue::Scalar(self.role.as_str()),
            SurveyField::Familiarity => FieldValue::Scalar(self.familiarity.as_str()),
            SurveyField::Hope => {
                FieldValue::Multi(self.hope.iter().map(|hope| hope.as_str()).collect())
            }
        }
    }

    /// Hope values joined for on-screen display.
    pub fn hope_display(&self) -> String {
        self.hope
            .iter()
            .map(|hope| hope.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A submission as received from the form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub familiarity: Option<String>,
    #[serde(default)]
    pub hope: Vec<String>,
}

impl RawSubmission {
    pub fn new(role: &str, familiarity: &str, hope: &[&str]) -> Self {
        Self {
            role: Some(role.to_string()),
            familiarity: Some(familiarity.to_string()),
            hope: hope.iter().map(|value| value.to_string()).collect(),
        }
    }
}

/// Validated answers, ready to be stamped with a session and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswers {
    pub role: Role,
    pub familiarity: Familiarity,
    pub hope: Vec<Hope>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ResponseRecord {
        ResponseRecord {
            id: "r-1".into(),
            session_id: "session-20240315-142530-000".into(),
            role: Role::Engineer,
            familiarity: Familiarity::Beginner,
            hope: vec![Hope::PracticalSkills, Hope::Networking],
            timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["sessionId"], "session-20240315-142530-000");
        assert_eq!(json["role"], "engineer");
        assert_eq!(json["hope"][1], "networking");
    }

    #[test]
    fn value_of_distinguishes_single_and_multi_select() {
        let record = record();
        assert_eq!(record.value_of(SurveyField::Role), FieldValue::Scalar("engineer"));
        assert_eq!(
            record.value_of(SurveyField::Hope),
            FieldValue::Multi(vec!["practical-skills", "networking"])
        );
        assert_eq!(record.hope_display(), "practical-skills, networking");
    }

    #[test]
    fn raw_submission_tolerates_missing_keys() {
        let raw: RawSubmission = serde_json::from_str(r#"{"role":"engineer"}"#).unwrap();
        assert_eq!(raw.role.as_deref(), Some("engineer"));
        assert!(raw.familiarity.is_none());
        assert!(raw.hope.is_empty());
    }
}
