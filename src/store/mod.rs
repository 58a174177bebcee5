//! In-memory shapes of the persisted regions.
//!
//! `ResponseStore` is the source of truth; `SessionRegistry` keeps a
//! per-session copy of the same records. Keeping the two in step is the
//! session manager's job.

mod registry;
mod responses;

pub use registry::SessionRegistry;
pub use responses::ResponseStore;
