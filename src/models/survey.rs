//! The survey schema: the closed option sets participants choose from and
//! the fields the dashboard aggregates over.

use serde::{Deserialize, Serialize};

/// Shared behaviour of the closed option sets.
pub trait SurveyOption: Sized + Copy + 'static {
    const ALL: &'static [Self];

    /// Wire spelling, as stored and exported
    fn as_str(&self) -> &'static str;

    /// Human-readable label for dashboards
    fn label(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Engineer,
    Designer,
    ProductManager,
    DataScientist,
    Researcher,
    Educator,
    Student,
    Other,
}

impl SurveyOption for Role {
    const ALL: &'static [Self] = &[
        Role::Engineer,
        Role::Designer,
        Role::ProductManager,
        Role::DataScientist,
        Role::Researcher,
        Role::Educator,
        Role::Student,
        Role::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Role::Engineer => "engineer",
            Role::Designer => "designer",
            Role::ProductManager => "product-manager",
            Role::DataScientist => "data-scientist",
            Role::Researcher => "researcher",
            Role::Educator => "educator",
            Role::Student => "student",
            Role::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Role::Engineer => "Engineer",
            Role::Designer => "Designer",
            Role::ProductManager => "Product Manager",
            Role::DataScientist => "Data Scientist",
            Role::Researcher => "Researcher",
            Role::Educator => "Educator",
            Role::Student => "Student",
            Role::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Familiarity {
    None,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SurveyOption for Familiarity {
    const ALL: &'static [Self] = &[
        Familiarity::None,
        Familiarity::Beginner,
        Familiarity::Intermediate,
        Familiarity::Advanced,
        Familiarity::Expert,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Familiarity::None => "none",
            Familiarity::Beginner => "beginner",
            Familiarity::Intermediate => "intermediate",
            Familiarity::Advanced => "advanced",
            Familiarity::Expert => "expert",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Familiarity::None => "Never used AI tools",
            Familiarity::Beginner => "Beginner",
            Familiarity::Intermediate => "Intermediate",
            Familiarity::Advanced => "Advanced",
            Familiarity::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hope {
    PracticalSkills,
    Networking,
    IndustryInsights,
    HandsOnPractice,
    CareerGrowth,
    Inspiration,
}

impl SurveyOption for Hope {
    const ALL: &'static [Self] = &[
        Hope::PracticalSkills,
        Hope::Networking,
        Hope::IndustryInsights,
        Hope::HandsOnPractice,
        Hope::CareerGrowth,
        Hope::Inspiration,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Hope::PracticalSkills => "practical-skills",
            Hope::Networking => "networking",
            Hope::IndustryInsights => "industry-insights",
            Hope::HandsOnPractice => "hands-on-practice",
            Hope::CareerGrowth => "career-growth",
            Hope::Inspiration => "inspiration",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Hope::PracticalSkills => "Practical skills",
            Hope::Networking => "Networking",
            Hope::IndustryInsights => "Industry insights",
            Hope::HandsOnPractice => "Hands-on practice",
            Hope::CareerGrowth => "Career growth",
            Hope::Inspiration => "Inspiration",
        }
    }
}

/// Survey questions the dashboard aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurveyField {
    Role,
    Familiarity,
    Hope,
}

impl SurveyField {
    pub const ALL: [SurveyField; 3] = [SurveyField::Role, SurveyField::Familiarity, SurveyField::Hope];

    pub fn key(&self) -> &'static str {
        match self {
            SurveyField::Role => "role",
            SurveyField::Familiarity => "familiarity",
            SurveyField::Hope => "hope",
        }
    }

    /// Column heading used on the dashboard and in CSV exports
    pub const fn label(&self) -> &'static str {
        match self {
            SurveyField::Role => "Primary Role",
            SurveyField::Familiarity => "AI Familiarity",
            SurveyField::Hope => "Expected Takeaways",
        }
    }

    /// Label for a stored option value of this field.
    pub fn option_label(&self, value: &str) -> Option<&'static str> {
        match self {
            SurveyField::Role => Role::parse(value).map(|role| role.label()),
            SurveyField::Familiarity => Familiarity::parse(value).map(|f| f.label()),
            SurveyField::Hope => Hope::parse(value).map(|hope| hope.label()),
        }
    }
}

/// The answer a single response gives to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(&'static str),
    Multi(Vec<&'static str>),
}
