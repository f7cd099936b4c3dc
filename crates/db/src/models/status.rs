//! Status lookup identifiers.
//!
//! The enums live in `castline_core::status` so pure domain rules can use
//! them; they are re-exported here next to the row structs that store them.

pub use castline_core::status::{
    ApplicationStatus, CastingCallStatus, ExternalActorStatus, InvitationStatus, ProjectStatus,
    StatusId, SubmissionStatus, SubscriptionStatus,
};
