//! Session lifecycle: naming, injectable time and ids, and the manager that
//! keeps the response store and session registry in step.

pub mod clock;
pub mod manager;
mod naming;

pub use clock::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidIds};
pub use manager::SessionManager;
pub use naming::{display_name, parse_session_id, session_id_for};
