//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod casting_call_repo;
pub mod casting_code_repo;
pub mod custom_field_repo;
pub mod dashboard_repo;
pub mod external_actor_repo;
pub mod invitation_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod questionnaire_repo;
pub mod region_repo;
pub mod region_subscription_repo;
pub mod response_repo;
pub mod scene_repo;
pub mod skill_repo;
pub mod studio_repo;
pub mod submission_repo;
pub mod subscription_repo;
pub mod tenant_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use casting_call_repo::CastingCallRepo;
pub use casting_code_repo::CastingCodeRepo;
pub use custom_field_repo::{CustomFieldRepo, FieldValueRepo};
pub use dashboard_repo::DashboardRepo;
pub use external_actor_repo::ExternalActorRepo;
pub use invitation_repo::InvitationRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use questionnaire_repo::QuestionnaireRepo;
pub use region_repo::{LocationRepo, RegionRepo};
pub use region_subscription_repo::{MultiRegionDiscountRepo, RegionPlanRepo, RegionSubscriptionRepo};
pub use response_repo::ResponseRepo;
pub use scene_repo::{SceneExternalActorRepo, SceneRepo, SceneTalentRepo, TalentRequirementRepo};
pub use skill_repo::SkillRepo;
pub use studio_repo::StudioRepo;
pub use submission_repo::SubmissionRepo;
pub use subscription_repo::{SubscriptionFeatureRepo, SubscriptionPlanRepo, SubscriptionRepo};
pub use tenant_repo::TenantRepo;
pub use user_repo::UserRepo;
