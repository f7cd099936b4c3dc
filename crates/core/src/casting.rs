//! Casting call and application lifecycle rules.

use crate::error::CoreError;
use crate::status::{ApplicationStatus, CastingCallStatus};
use crate::types::Timestamp;

impl ApplicationStatus {
    /// Whether the status ends the application's review.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    /// Whether a reviewer may move an application from `self` to `next`.
    ///
    /// Withdrawal is handled by [`ensure_can_withdraw`] since only the
    /// applicant may perform it.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Shortlisted)
                | (Pending, Accepted)
                | (Pending, Rejected)
                | (Shortlisted, Accepted)
                | (Shortlisted, Rejected)
        )
    }
}

/// Validate a reviewer-driven status change.
pub fn ensure_review_transition(
    current: ApplicationStatus,
    next: ApplicationStatus,
) -> Result<(), CoreError> {
    if next == ApplicationStatus::Withdrawn {
        return Err(CoreError::Forbidden(
            "Only the applicant can withdraw an application".into(),
        ));
    }
    if !current.can_transition_to(next) {
        return Err(CoreError::Conflict(format!(
            "Cannot move application from {} to {}",
            current.name(),
            next.name()
        )));
    }
    Ok(())
}

/// Validate an applicant-driven withdrawal.
pub fn ensure_can_withdraw(current: ApplicationStatus) -> Result<(), CoreError> {
    if current.is_final() {
        return Err(CoreError::Conflict(format!(
            "Application is already {}",
            current.name()
        )));
    }
    Ok(())
}

/// Check that a casting call currently accepts new applications.
pub fn ensure_accepting_applications(
    status: CastingCallStatus,
    deadline: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    if status != CastingCallStatus::Open {
        return Err(CoreError::Conflict(format!(
            "Casting call is {} and not accepting applications",
            status.name()
        )));
    }
    if let Some(deadline) = deadline {
        if now > deadline {
            return Err(CoreError::Conflict(
                "Casting call deadline has passed".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn review_transitions() {
        use ApplicationStatus::*;
        assert!(ensure_review_transition(Pending, Shortlisted).is_ok());
        assert!(ensure_review_transition(Shortlisted, Accepted).is_ok());
        assert!(ensure_review_transition(Pending, Rejected).is_ok());
        assert_matches!(
            ensure_review_transition(Accepted, Rejected),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            ensure_review_transition(Shortlisted, Pending),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            ensure_review_transition(Pending, Withdrawn),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn withdrawal() {
        assert!(ensure_can_withdraw(ApplicationStatus::Pending).is_ok());
        assert!(ensure_can_withdraw(ApplicationStatus::Shortlisted).is_ok());
        assert!(ensure_can_withdraw(ApplicationStatus::Accepted).is_err());
        assert!(ensure_can_withdraw(ApplicationStatus::Withdrawn).is_err());
    }

    #[test]
    fn accepting_applications() {
        let now = Utc::now();
        assert!(ensure_accepting_applications(CastingCallStatus::Open, None, now).is_ok());
        assert!(ensure_accepting_applications(
            CastingCallStatus::Open,
            Some(now + Duration::days(1)),
            now
        )
        .is_ok());
        assert!(ensure_accepting_applications(
            CastingCallStatus::Open,
            Some(now - Duration::minutes(1)),
            now
        )
        .is_err());
        assert!(ensure_accepting_applications(CastingCallStatus::Draft, None, now).is_err());
        assert!(ensure_accepting_applications(CastingCallStatus::Closed, None, now).is_err());
    }
}
