//! Studio productions. Scenes and casting calls hang off a project.

use castline_core::error::CoreError;
use castline_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub studio_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// `project_statuses`: draft, active, completed, archived.
    pub status_id: StatusId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Shooting window once `patch` is applied; absent fields keep their
    /// stored value.
    pub fn schedule_after(&self, patch: &UpdateProject) -> Schedule {
        Schedule {
            start: patch.start_date.or(self.start_date),
            end: patch.end_date.or(self.end_date),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Omitted means draft.
    pub status_id: Option<StatusId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CreateProject {
    pub fn schedule(&self) -> Schedule {
        Schedule {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Optional start and end dates of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Schedule {
    /// An open-ended window is fine; a closed one must not run backwards.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Err(CoreError::Validation(format!(
                "end_date {end} is before start_date {start}"
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 3, d)
    }

    fn window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Schedule {
        Schedule { start, end }
    }

    #[test]
    fn backwards_window_is_rejected() {
        assert!(window(day(10), day(9)).validate().is_err());
        assert!(window(day(10), day(10)).validate().is_ok());
        assert!(window(None, day(1)).validate().is_ok());
    }

    #[test]
    fn patch_keeps_stored_dates() {
        let project = Project {
            id: 1,
            studio_id: 1,
            name: "Pilot".into(),
            description: None,
            status_id: 1,
            start_date: day(1),
            end_date: day(20),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let patch = UpdateProject {
            end_date: day(25),
            ..Default::default()
        };
        assert_eq!(project.schedule_after(&patch), window(day(1), day(25)));
    }
}
