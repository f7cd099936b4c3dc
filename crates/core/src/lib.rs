//! Castline domain core.
//!
//! Pure types and validation rules shared by the repository layer and the
//! HTTP API. Nothing in this crate touches the database or the network.

pub mod casting;
pub mod casting_code;
pub mod custom_field;
pub mod error;
pub mod external_actor;
pub mod pagination;
pub mod profile;
pub mod questionnaire;
pub mod region_pricing;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
