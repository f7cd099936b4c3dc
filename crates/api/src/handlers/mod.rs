//! Request handlers.
//!
//! Each submodule holds the async handler functions for one area of the
//! API. Handlers check access, validate input with `castline_core`, delegate
//! to the repositories in `castline_db` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod billing;
pub mod casting_call;
pub mod casting_code;
pub mod catalog;
pub mod external_actor;
pub mod field_value;
pub mod profile;
pub mod project;
pub mod questionnaire;
pub mod scene;
pub mod studio;
pub mod tenant;
pub mod user;
