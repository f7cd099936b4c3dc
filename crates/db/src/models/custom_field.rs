//! Custom field definitions and per-entity values.

use castline_core::custom_field::{FieldSpec, FieldType};
use castline_core::error::CoreError;
use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::questionnaire::options_of;

/// A row from the `custom_fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomField {
    pub id: DbId,
    pub entity_type: String,
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub options: serde_json::Value,
    pub is_required: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CustomField {
    /// The validation view of a stored field definition.
    pub fn spec(&self) -> Result<FieldSpec, CoreError> {
        Ok(FieldSpec {
            name: self.name.clone(),
            field_type: FieldType::parse(&self.field_type)?,
            options: options_of(&self.options),
            is_required: self.is_required,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomField {
    pub entity_type: String,
    pub name: String,
    pub label: String,
    pub field_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
}

/// The machine name and type are fixed once values may exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomField {
    pub label: Option<String>,
    pub options: Option<Vec<String>>,
    pub is_required: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Filter for `GET /custom-fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomFieldParams {
    pub entity_type: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// A stored value for one field on one profile or studio.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FieldValue {
    pub id: DbId,
    pub owner_id: DbId,
    pub field_id: DbId,
    pub name: String,
    pub value: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldValueInput {
    pub field_id: DbId,
    pub value: serde_json::Value,
}

/// Request body for `PUT /{profiles|studios}/{id}/field-values`.
///
/// A `null` value clears the stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct SetFieldValues {
    pub values: Vec<FieldValueInput>,
}
