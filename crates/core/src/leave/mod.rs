//! Leave request workflow.
//!
//! # Modules
//!
//! - `types` - Leave domain types (LeaveRequest, LeaveStatus, StageDecisions)
//! - `error` - Error type shared by every leave operation
//! - `workflow` - Approval state machine for requests and cancellations

pub mod error;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod workflow_props;

pub use error::LeaveError;
pub use types::{
    ApprovalState, ApproverRole, CancellationRequest, DateRange, Decision, DecisionEvent,
    LeaveRequest, LeaveStatus, LeaveType, StageDecisions,
};
pub use workflow::{Transition, WorkflowService};
