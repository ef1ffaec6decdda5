//! Study sessions and the state they mutate
//!
//! This module provides:
//! - Pure review-state transitions (rate, toggle, free-study outcome)
//! - The controller that owns and persists that state
//! - Free-study and due-review session queues

pub mod controller;
pub mod session;
pub mod state;

pub use controller::{Answer, Outcome, PendingAdvance, StudyController, DEFAULT_ADVANCE_DELAY};
pub use session::{Advance, Scope, Selection, Session, SessionMode, SessionStatus};
pub use state::{Changes, MembershipChange, StudyEvent, StudyState};
