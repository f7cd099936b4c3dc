//! External actor lifecycle and CSV import.
//!
//! External actors are studio-managed contacts who are not yet platform
//! users. Studios bulk-load them from a CSV export of their own contact
//! lists; the parser here is deliberately forgiving about header spelling
//! and reports bad rows instead of failing the whole file.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::status::ExternalActorStatus;
use crate::validation::{normalize_email, validate_email};

/// Maximum number of data rows accepted in one import.
pub const MAX_IMPORT_ROWS: usize = 2000;

impl ExternalActorStatus {
    /// Allowed lifecycle moves: active -> invited -> converted, or
    /// active -> converted directly. Converted is terminal.
    pub fn can_transition_to(self, next: ExternalActorStatus) -> bool {
        use ExternalActorStatus::*;
        matches!(
            (self, next),
            (Active, Invited) | (Active, Converted) | (Invited, Converted) | (Invited, Invited)
        )
    }
}

/// Validate an external actor status change.
pub fn ensure_transition(
    current: ExternalActorStatus,
    next: ExternalActorStatus,
) -> Result<(), CoreError> {
    if !current.can_transition_to(next) {
        return Err(CoreError::Conflict(format!(
            "External actor is {} and cannot become {}",
            current.name(),
            next.name()
        )));
    }
    Ok(())
}

/// One actor parsed from an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedActor {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// A rejected row, reported with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Result of parsing an import file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CsvImport {
    pub actors: Vec<ParsedActor>,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Notes,
    Ignored,
}

fn classify_header(header: &str) -> Column {
    let key: String = header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match key.as_str() {
        "firstname" | "first" | "givenname" => Column::FirstName,
        "lastname" | "last" | "surname" | "familyname" => Column::LastName,
        "name" | "fullname" => Column::FullName,
        "email" | "emailaddress" | "mail" => Column::Email,
        "phone" | "phonenumber" | "mobile" | "tel" => Column::Phone,
        "notes" | "note" | "comments" => Column::Notes,
        _ => Column::Ignored,
    }
}

/// Split a full name on its last space: "Mary Jane Watson" -> ("Mary Jane", "Watson").
fn split_full_name(full: &str) -> (String, Option<String>) {
    let full = full.trim();
    match full.rsplit_once(' ') {
        Some((first, last)) if !first.trim().is_empty() => {
            (first.trim().to_string(), Some(last.trim().to_string()))
        }
        _ => (full.to_string(), None),
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an external actor CSV export.
///
/// The first non-blank record is the header. Recognised columns (any case,
/// punctuation ignored): first name, last name, full name, email, phone,
/// notes. A file must provide either a first-name or a full-name column.
/// Rows without a name, with an invalid email, or repeating an email seen
/// earlier in the file are reported in [`CsvImport::errors`].
pub fn parse_actor_csv(text: &str) -> Result<CsvImport, CoreError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = csv_records(text).into_iter();

    let header = records
        .next()
        .ok_or_else(|| CoreError::Validation("CSV is empty".into()))?;
    let columns: Vec<Column> = header.fields.iter().map(|h| classify_header(h)).collect();

    if !columns
        .iter()
        .any(|c| matches!(c, Column::FirstName | Column::FullName))
    {
        return Err(CoreError::Validation(
            "CSV header must include a 'first_name' or 'name' column".into(),
        ));
    }

    let mut import = CsvImport::default();
    let mut seen_emails = HashSet::new();

    for record in records {
        let line_no = record.line;
        if import.actors.len() + import.errors.len() >= MAX_IMPORT_ROWS {
            return Err(CoreError::Validation(format!(
                "CSV exceeds the maximum of {MAX_IMPORT_ROWS} rows"
            )));
        }
        if record.unterminated {
            import.errors.push(RowError {
                line: line_no,
                message: "unterminated quoted field".into(),
            });
            continue;
        }

        let values = record.fields;
        let field = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == wanted)
                .and_then(|i| non_empty(values.get(i)))
        };

        let (first_name, last_name) = match (field(Column::FirstName), field(Column::FullName)) {
            (Some(first), _) => (first, field(Column::LastName)),
            (None, Some(full)) => {
                let (first, last) = split_full_name(&full);
                (first, field(Column::LastName).or(last))
            }
            (None, None) => {
                import.errors.push(RowError {
                    line: line_no,
                    message: "missing name".into(),
                });
                continue;
            }
        };

        let email = match field(Column::Email) {
            Some(raw) => {
                if validate_email(&raw, "email").is_err() {
                    import.errors.push(RowError {
                        line: line_no,
                        message: format!("invalid email '{raw}'"),
                    });
                    continue;
                }
                let normalized = normalize_email(&raw);
                if !seen_emails.insert(normalized.clone()) {
                    import.errors.push(RowError {
                        line: line_no,
                        message: format!("duplicate email '{normalized}'"),
                    });
                    continue;
                }
                Some(normalized)
            }
            None => None,
        };

        import.actors.push(ParsedActor {
            first_name,
            last_name,
            email,
            phone: field(Column::Phone),
            notes: field(Column::Notes),
        });
    }

    Ok(import)
}

/// One CSV record and the physical line it starts on.
#[derive(Debug, Default)]
struct Record {
    line: usize,
    fields: Vec<String>,
    quoted: bool,
    /// The file ended inside a quoted field.
    unterminated: bool,
}

impl Record {
    fn is_blank(&self) -> bool {
        !self.quoted && self.fields.len() == 1 && self.fields[0].trim().is_empty()
    }
}

/// Split `text` into records, honouring double-quoted fields, `""` escapes
/// and line breaks inside quotes. Blank lines are skipped.
fn csv_records(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut record = Record {
        line: 1,
        ..Default::default()
    };
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        if ch == '\n' {
            line += 1;
        }
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => current.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                record.quoted = true;
            }
            ',' => record.fields.push(std::mem::take(&mut current)),
            '\n' => {
                record.fields.push(std::mem::take(&mut current));
                let finished = std::mem::replace(
                    &mut record,
                    Record {
                        line,
                        ..Default::default()
                    },
                );
                if !finished.is_blank() {
                    records.push(finished);
                }
            }
            _ => current.push(ch),
        }
    }

    record.fields.push(current);
    record.unterminated = in_quotes;
    if !record.is_blank() {
        records.push(record);
    }
    records
}
