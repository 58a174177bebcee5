use crate::{
    error::{Result, SurveyError},
    models::{Familiarity, Hope, RawSubmission, Role, SurveyField, SurveyOption, ValidatedAnswers},
};

/// Checks a raw submission against the survey schema.
///
/// An empty takeaway selection is reported before anything else, so
/// `EmptySelection` comes back whenever `hope` is empty no matter what the
/// other answers look like. Repeated takeaways collapse to one.
pub fn validate(raw: &RawSubmission) -> Result<ValidatedAnswers> {
    if raw.hope.iter().all(|value| value.trim().is_empty()) {
        return Err(SurveyError::EmptySelection);
    }

    let role: Role = parse_single(SurveyField::Role, raw.role.as_deref())?;
    let familiarity: Familiarity = parse_single(SurveyField::Familiarity, raw.familiarity.as_deref())?;

    let mut hope: Vec<Hope> = Vec::with_capacity(raw.hope.len());
    for value in raw.hope.iter().filter(|value| !value.trim().is_empty()) {
        let parsed = Hope::parse(value).ok_or_else(|| SurveyError::UnknownValue {
            field: SurveyField::Hope.key(),
            value: value.clone(),
        })?;
        if !hope.contains(&parsed) {
            hope.push(parsed);
        }
    }

    Ok(ValidatedAnswers {
        role,
        familiarity,
        hope,
    })
}

fn parse_single<T: SurveyOption>(field: SurveyField, value: Option<&str>) -> Result<T> {
    let value = match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(SurveyError::MissingField(field.key())),
    };

    T::parse(value).ok_or_else(|| SurveyError::UnknownValue {
        field: field.key(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_submission() {
        let raw = RawSubmission::new("engineer", "beginner", &["practical-skills", "networking"]);
        let answers = validate(&raw).unwrap();

        assert_eq!(answers.role, Role::Engineer);
        assert_eq!(answers.familiarity, Familiarity::Beginner);
        assert_eq!(answers.hope, vec![Hope::PracticalSkills, Hope::Networking]);
    }

    #[test]
    fn empty_hope_is_reported_regardless_of_other_answers() {
        let cases = [
            RawSubmission::new("engineer", "beginner", &[]),
            RawSubmission::new("not-a-role", "beginner", &[]),
            RawSubmission::default(),
            RawSubmission::new("engineer", "beginner", &["", "  "]),
        ];

        for raw in cases {
            assert!(matches!(validate(&raw), Err(SurveyError::EmptySelection)));
        }
    }

    #[test]
    fn non_empty_hope_never_reports_empty_selection() {
        let raw = RawSubmission {
            role: None,
            familiarity: None,
            hope: vec!["networking".into()],
        };
        assert!(matches!(validate(&raw), Err(SurveyError::MissingField("role"))));
    }

    #[test]
    fn rejects_unknown_options() {
        let raw = RawSubmission::new("astronaut", "beginner", &["networking"]);
        match validate(&raw) {
            Err(SurveyError::UnknownValue { field, value }) => {
                assert_eq!(field, "role");
                assert_eq!(value, "astronaut");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let raw = RawSubmission::new("engineer", "guru", &["networking"]);
        assert!(matches!(
            validate(&raw),
            Err(SurveyError::UnknownValue { field: "familiarity", .. })
        ));

        let raw = RawSubmission::new("engineer", "expert", &["networking", "free-lunch"]);
        assert!(matches!(
            validate(&raw),
            Err(SurveyError::UnknownValue { field: "hope", .. })
        ));
    }

    #[test]
    fn missing_familiarity_is_rejected() {
        let raw = RawSubmission {
            role: Some("designer".into()),
            familiarity: Some("   ".into()),
            hope: vec!["inspiration".into()],
        };
        assert!(matches!(
            validate(&raw),
            Err(SurveyError::MissingField("familiarity"))
        ));
    }

    #[test]
    fn duplicate_hope_values_collapse() {
        let raw = RawSubmission::new(
            "student",
            "none",
            &["networking", "inspiration", "networking"],
        );
        let answers = validate(&raw).unwrap();
        assert_eq!(answers.hope, vec![Hope::Networking, Hope::Inspiration]);
    }
}
