//! Tool-call lifecycle and batch aggregate.
//!
//! # State Transitions
//!
//! ```text
//! (start) ──> Validating ──> Error                 [unknown tool / validation / confirm step fails]
//! Validating ──> Scheduled                         [no confirmation required]
//! Validating ──> AwaitingApproval ──> Cancelled    [outcome = Cancel]
//! AwaitingApproval ──> Scheduled                   [any proceed outcome]
//! Scheduled ──> Executing ──> Success | Error | Cancelled   [gated on whole-batch readiness]
//! (any non-terminal) ──> Cancelled                 [external cancel]
//! ```
//!
//! Success, Error and Cancelled are absorbing. A [`Batch`](batch::Batch)
//! only moves calls to Executing once no sibling is still Validating or
//! AwaitingApproval.

pub mod batch;
pub mod tool_call;
