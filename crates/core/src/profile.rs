//! Talent profile attribute rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum accepted height in centimetres.
pub const MIN_HEIGHT_CM: i32 = 50;

/// Maximum accepted height in centimetres.
pub const MAX_HEIGHT_CM: i32 = 272;

/// Maximum length of a profile bio.
pub const MAX_BIO_LEN: usize = 4000;

/// Talent availability for new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Limited,
    Unavailable,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Limited => "limited",
            Self::Unavailable => "unavailable",
        }
    }

    /// Parse the stored representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "available" => Ok(Self::Available),
            "limited" => Ok(Self::Limited),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(CoreError::Validation(format!(
                "availability must be one of available, limited, unavailable; got '{other}'"
            ))),
        }
    }
}

/// Validate a height in centimetres.
pub fn validate_height_cm(value: i32, field: &str) -> Result<(), CoreError> {
    if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between {MIN_HEIGHT_CM} and {MAX_HEIGHT_CM} cm, got {value}"
        )));
    }
    Ok(())
}

/// Validate an optional `[min, max]` height window (used by talent requirements).
pub fn validate_height_range(min: Option<i32>, max: Option<i32>) -> Result<(), CoreError> {
    if let Some(min) = min {
        validate_height_cm(min, "min_height_cm")?;
    }
    if let Some(max) = max {
        validate_height_cm(max, "max_height_cm")?;
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "min_height_cm ({min}) must not exceed max_height_cm ({max})"
            )));
        }
    }
    Ok(())
}

/// Validate the optional free-form profile attributes together.
pub fn validate_profile_attributes(
    height_cm: Option<i32>,
    availability: Option<&str>,
    bio: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(height) = height_cm {
        validate_height_cm(height, "height_cm")?;
    }
    if let Some(availability) = availability {
        Availability::parse(availability)?;
    }
    if let Some(bio) = bio {
        if bio.chars().count() > MAX_BIO_LEN {
            return Err(CoreError::Validation(format!(
                "bio must be at most {MAX_BIO_LEN} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_round_trip_names() {
        for a in [
            Availability::Available,
            Availability::Limited,
            Availability::Unavailable,
        ] {
            assert_eq!(Availability::parse(a.as_str()).unwrap(), a);
        }
        assert!(Availability::parse("busy").is_err());
    }

    #[test]
    fn height_bounds() {
        assert!(validate_height_cm(MIN_HEIGHT_CM, "h").is_ok());
        assert!(validate_height_cm(MAX_HEIGHT_CM, "h").is_ok());
        assert!(validate_height_cm(49, "h").is_err());
        assert!(validate_height_cm(300, "h").is_err());
    }

    #[test]
    fn height_range_ordering() {
        assert!(validate_height_range(Some(160), Some(180)).is_ok());
        assert!(validate_height_range(Some(180), Some(180)).is_ok());
        assert!(validate_height_range(None, Some(180)).is_ok());
        assert!(validate_height_range(Some(190), Some(180)).is_err());
    }

    #[test]
    fn profile_attributes() {
        assert!(
            validate_profile_attributes(Some(170), Some("limited"), Some("Stage actor")).is_ok()
        );
        assert!(validate_profile_attributes(None, Some("sometimes"), None).is_err());
        let long_bio = "x".repeat(MAX_BIO_LEN + 1);
        assert!(validate_profile_attributes(None, None, Some(&long_bio)).is_err());
    }
}
