//! Admin-defined custom fields for profiles and studios.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::validation::require_non_empty;

/// Which entity a custom field attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Profile,
    Studio,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Studio => "studio",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "profile" => Ok(Self::Profile),
            "studio" => Ok(Self::Studio),
            other => Err(CoreError::Validation(format!(
                "entity_type must be 'profile' or 'studio', got '{other}'"
            ))),
        }
    }
}

/// Value type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Select,
    MultiSelect,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "select" => Ok(Self::Select),
            "multi_select" => Ok(Self::MultiSelect),
            other => Err(CoreError::Validation(format!("unknown field_type '{other}'"))),
        }
    }

    fn takes_options(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

/// Field definition as needed for value validation.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub is_required: bool,
}

/// Validate a field definition before it is stored.
///
/// `name` is the machine key (lowercase snake case); select types need at
/// least one option and other types must not carry any.
pub fn validate_field_definition(
    name: &str,
    label: &str,
    field_type: &str,
    options: &[String],
) -> Result<FieldType, CoreError> {
    require_non_empty(label, "label")?;
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        || name.starts_with(|c: char| c.is_ascii_digit())
    {
        return Err(CoreError::Validation(format!(
            "name must be lowercase snake_case, got '{name}'"
        )));
    }
    let field_type = FieldType::parse(field_type)?;
    if field_type.takes_options() {
        if options.is_empty() || options.iter().any(|o| o.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "{} fields need a non-empty list of options",
                field_type.as_str()
            )));
        }
    } else if !options.is_empty() {
        return Err(CoreError::Validation(format!(
            "{} fields do not take options",
            field_type.as_str()
        )));
    }
    Ok(field_type)
}

/// Validate a value for a field. `null` clears optional fields.
pub fn validate_field_value(field: &FieldSpec, value: &Value) -> Result<(), CoreError> {
    let invalid = |expected: &str| {
        CoreError::Validation(format!("{} expects {expected}", field.name))
    };

    if value.is_null() {
        if field.is_required {
            return Err(CoreError::Validation(format!("{} is required", field.name)));
        }
        return Ok(());
    }

    match field.field_type {
        FieldType::Text => {
            let text = value.as_str().ok_or_else(|| invalid("text"))?;
            if field.is_required && text.trim().is_empty() {
                return Err(CoreError::Validation(format!("{} is required", field.name)));
            }
        }
        FieldType::Number => {
            value.as_f64().ok_or_else(|| invalid("a number"))?;
        }
        FieldType::Boolean => {
            value.as_bool().ok_or_else(|| invalid("true or false"))?;
        }
        FieldType::Select => {
            let choice = value.as_str().ok_or_else(|| invalid("one option"))?;
            if !field.options.iter().any(|o| o == choice) {
                return Err(CoreError::Validation(format!(
                    "{}: '{choice}' is not one of the options",
                    field.name
                )));
            }
        }
        FieldType::MultiSelect => {
            let choices = value.as_array().ok_or_else(|| invalid("a list of options"))?;
            for choice in choices {
                let choice = choice.as_str().ok_or_else(|| invalid("a list of options"))?;
                if !field.options.iter().any(|o| o == choice) {
                    return Err(CoreError::Validation(format!(
                        "{}: '{choice}' is not one of the options",
                        field.name
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(field_type: FieldType, options: &[&str], is_required: bool) -> FieldSpec {
        FieldSpec {
            name: "eye_colour".into(),
            field_type,
            options: options.iter().map(|s| s.to_string()).collect(),
            is_required,
        }
    }

    #[test]
    fn definitions() {
        let opts = vec!["blue".to_string(), "green".to_string()];
        assert_eq!(
            validate_field_definition("eye_colour", "Eye colour", "select", &opts).unwrap(),
            FieldType::Select
        );
        assert!(validate_field_definition("eye_colour", "Eye colour", "select", &[]).is_err());
        assert!(validate_field_definition("Eye Colour", "Eye colour", "text", &[]).is_err());
        assert!(validate_field_definition("1st", "First", "text", &[]).is_err());
        assert!(validate_field_definition("shoe", "", "number", &[]).is_err());
        assert!(validate_field_definition("shoe", "Shoe", "number", &opts).is_err());
        assert!(validate_field_definition("shoe", "Shoe", "decimal", &[]).is_err());
    }

    #[test]
    fn values() {
        let select = field(FieldType::Select, &["blue", "green"], false);
        assert!(validate_field_value(&select, &json!("blue")).is_ok());
        assert!(validate_field_value(&select, &json!("red")).is_err());
        assert!(validate_field_value(&select, &Value::Null).is_ok());

        let multi = field(FieldType::MultiSelect, &["a", "b"], false);
        assert!(validate_field_value(&multi, &json!(["a", "b"])).is_ok());
        assert!(validate_field_value(&multi, &json!(["c"])).is_err());

        assert!(validate_field_value(&field(FieldType::Number, &[], false), &json!(42)).is_ok());
        assert!(validate_field_value(&field(FieldType::Number, &[], false), &json!("42")).is_err());
        let flag = field(FieldType::Boolean, &[], false);
        assert!(validate_field_value(&flag, &json!(false)).is_ok());
    }

    #[test]
    fn required_values() {
        let text = field(FieldType::Text, &[], true);
        assert!(validate_field_value(&text, &Value::Null).is_err());
        assert!(validate_field_value(&text, &json!(" ")).is_err());
        assert!(validate_field_value(&text, &json!("hazel")).is_ok());
    }

    #[test]
    fn entity_types() {
        assert_eq!(EntityType::parse("studio").unwrap(), EntityType::Studio);
        assert!(EntityType::parse("project").is_err());
    }
}
