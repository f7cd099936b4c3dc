//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod application;
pub mod casting_call;
pub mod casting_code;
pub mod custom_field;
pub mod dashboard;
pub mod external_actor;
pub mod invitation;
pub mod profile;
pub mod project;
pub mod questionnaire;
pub mod region;
pub mod region_subscription;
pub mod response;
pub mod scene;
pub mod skill;
pub mod status;
pub mod studio;
pub mod submission;
pub mod subscription;
pub mod tenant;
pub mod user;
