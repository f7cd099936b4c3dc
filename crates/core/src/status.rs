//! Status enums mapping to SMALLSERIAL lookup tables.
//!
//! Each variant's discriminant matches the seed order (1-based) of the
//! corresponding `*_statuses` table, and its name matches the seeded `name`
//! column.

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($val:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the seeded status name.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Resolve a database status ID.
            pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
                match id {
                    $( $val => Ok(Self::$variant), )+
                    other => Err(CoreError::Internal(format!(
                        concat!("unknown ", stringify!($name), " id {}"),
                        other
                    ))),
                }
            }

            /// Resolve a status name as supplied by API clients.
            pub fn from_name(name: &str) -> Result<Self, CoreError> {
                let lowered = name.trim().to_lowercase();
                match lowered.as_str() {
                    $( $label => Ok(Self::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        name
                    ))),
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Draft = (1, "draft"),
        Active = (2, "active"),
        Completed = (3, "completed"),
        Archived = (4, "archived"),
    }
}

define_status_enum! {
    /// Casting call visibility status.
    CastingCallStatus {
        Draft = (1, "draft"),
        Open = (2, "open"),
        Closed = (3, "closed"),
    }
}

define_status_enum! {
    /// Application review status.
    ApplicationStatus {
        Pending = (1, "pending"),
        Shortlisted = (2, "shortlisted"),
        Accepted = (3, "accepted"),
        Rejected = (4, "rejected"),
        Withdrawn = (5, "withdrawn"),
    }
}

define_status_enum! {
    /// External actor onboarding status.
    ExternalActorStatus {
        Active = (1, "active"),
        Invited = (2, "invited"),
        Converted = (3, "converted"),
    }
}

define_status_enum! {
    /// Questionnaire invitation status.
    InvitationStatus {
        Pending = (1, "pending"),
        Completed = (2, "completed"),
        Declined = (3, "declined"),
    }
}

define_status_enum! {
    /// Billing status of a main or region subscription.
    SubscriptionStatus {
        Active = (1, "active"),
        Trialing = (2, "trialing"),
        PastDue = (3, "past_due"),
        Canceled = (4, "canceled"),
    }
}

define_status_enum! {
    /// Review status of a casting-code submission.
    SubmissionStatus {
        Pending = (1, "pending"),
        Reviewed = (2, "reviewed"),
        Accepted = (3, "accepted"),
        Rejected = (4, "rejected"),
    }
}

impl SubscriptionStatus {
    /// Whether the subscription currently grants access.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Trialing | Self::PastDue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(ProjectStatus::Draft.id(), 1);
        assert_eq!(CastingCallStatus::Closed.id(), 3);
        assert_eq!(ApplicationStatus::Withdrawn.id(), 5);
        assert_eq!(ExternalActorStatus::Converted.id(), 3);
        assert_eq!(SubscriptionStatus::Canceled.id(), 4);
    }

    #[test]
    fn from_id_and_name() {
        assert_eq!(
            ApplicationStatus::from_id(2).unwrap(),
            ApplicationStatus::Shortlisted
        );
        assert!(ApplicationStatus::from_id(9).is_err());
        assert_eq!(
            SubscriptionStatus::from_name("PAST_DUE").unwrap(),
            SubscriptionStatus::PastDue
        );
        assert_eq!(ExternalActorStatus::Invited.name(), "invited");
        assert!(InvitationStatus::from_name("maybe").is_err());
    }

    #[test]
    fn live_subscriptions() {
        assert!(SubscriptionStatus::Active.is_live());
        assert!(SubscriptionStatus::PastDue.is_live());
        assert!(!SubscriptionStatus::Canceled.is_live());
    }
}
