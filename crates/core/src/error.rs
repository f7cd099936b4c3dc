use crate::types::DbId;

/// Failures raised by Castline's domain rules.
///
/// The API layer maps each variant onto an HTTP status; the stable
/// machine-readable code comes from [`CoreError::code`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row addressed by its numeric id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that can never be accepted, e.g. an unknown choice option or a
    /// missing required answer.
    #[error("{0}")]
    Validation(String),

    /// The request is well formed but clashes with current state: a
    /// duplicate application, a full casting code, a converted actor.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The caller is known but is not a studio member, owner or admin.
    #[error("{0}")]
    Forbidden(String),

    /// Broken invariants such as a status id missing from the lookup tables.
    /// The message is logged, never returned to clients.
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Stable code carried in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the message may be shown to the caller as is.
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = CoreError::not_found("Casting call", 7);
        assert_eq!(err.to_string(), "Casting call with id 7 not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn internal_messages_stay_private() {
        assert!(!CoreError::Internal("status 9".into()).is_public());
        assert!(CoreError::Conflict("Already applied".into()).is_public());
    }
}
