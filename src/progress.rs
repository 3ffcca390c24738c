//! Watch-progress tracking.
//!
//! `ProgressStore` owns the persisted `id -> ProgressRecord` map. Records are
//! updated through pure transitions on `ProgressRecord`; the store applies
//! them, reconciles against newly built libraries and computes course-wide
//! aggregates. Persistence is best-effort throughout.

mod aggregate;
mod record;
mod store;
mod throttle;

pub use aggregate::Aggregate;
pub use record::{COMPLETION_THRESHOLD, LectureStatus, ProgressRecord};
pub use store::{ProgressStore, Reconcile};
pub use throttle::SaveThrottle;
