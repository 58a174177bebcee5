pub mod response;
pub mod session;
pub mod survey;

pub use response::{RawSubmission, ResponseRecord, ValidatedAnswers};
pub use session::{Session, SessionSummary};
pub use survey::{Familiarity, FieldValue, Hope, Role, SurveyField, SurveyOption};
