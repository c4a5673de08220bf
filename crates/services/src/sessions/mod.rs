mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{
    NextStep, ScanResult, ScanSession, SessionEffect, SessionEvent, SessionPhase,
};
pub use workflow::{CompletionReport, SessionLoopService};
