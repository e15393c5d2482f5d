//! Static entity schemas and dotted-path resolution.
//!
//! A schema describes, at compile time, which fields a selector string may
//! traverse. Selector validity is only discovered when a criteria or sort
//! condition is built or compiled against a concrete schema; nothing checks
//! a schema for completeness up front.

use crate::{error::Error, value::Value};

///
/// FieldType
///
/// The scalar shape a resolved selector yields. `Nested` segments may only
/// appear in the middle of a dotted path.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Date,
    DateTime,
    List(&'static Self),
    Nested(&'static EntitySchema),
}

impl FieldType {
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Returns true when a value's variant already has this field type's
    /// shape, i.e. no normalization is needed before storing it in a node.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Uint, Value::Uint(_))
            | (Self::Float, Value::Float(_))
            | (Self::Text, Value::Text(_))
            | (Self::Date, Value::Date(_))
            | (Self::DateTime, Value::DateTime(_)) => true,
            (Self::List(elem), Value::List(items)) => {
                items.iter().all(|item| elem.accepts(item))
            }
            _ => false,
        }
    }

    /// Stable label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Bool => "Bool".to_string(),
            Self::Int => "Int".to_string(),
            Self::Uint => "Uint".to_string(),
            Self::Float => "Float".to_string(),
            Self::Text => "Text".to_string(),
            Self::Date => "Date".to_string(),
            Self::DateTime => "DateTime".to_string(),
            Self::List(elem) => format!("List<{}>", elem.label()),
            Self::Nested(schema) => format!("Nested<{}>", schema.path),
        }
    }
}

///
/// FieldKind
///
/// Plain stored field, or a zero-argument accessor addressed as `name()`
/// in a selector.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Field,
    Accessor,
}

///
/// FieldSchema
///

#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub ty: FieldType,
    /// A nullable field may read as `Value::Null`; normalization of an empty
    /// boolean input produces `Null` only for nullable targets.
    pub nullable: bool,
}

///
/// EntitySchema
///

#[derive(Debug)]
pub struct EntitySchema {
    pub path: &'static str,
    pub fields: &'static [FieldSchema],
}

impl EntitySchema {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// EntitySchema values are 'static registry entries; identity comparison is
// sufficient and keeps FieldType: PartialEq cheap.
impl PartialEq for EntitySchema {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for EntitySchema {}

///
/// EntityKind
///
/// Binds a concrete record type to its schema registry entry.
///

pub trait EntityKind: FieldValues {
    const PATH: &'static str;
    const SCHEMA: &'static EntitySchema;
}

///
/// FieldRead / FieldValues
///
/// Runtime field-read capability. Evaluation walks dotted paths one segment
/// at a time; a nested segment hands back another readable record.
///

pub enum FieldRead<'a> {
    Value(Value),
    Nested(&'a dyn FieldValues),
}

pub trait FieldValues {
    fn get_value(&self, field: &str) -> Option<FieldRead<'_>>;
}

///
/// FieldPresence
///
/// Result of reading a resolved path off a concrete record. Distinguishes a
/// missing field from a present-but-null one; predicates treat the two
/// differently.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FieldPresence {
    Present(Value),
    Missing,
}

/// Read a resolved dotted path off a record. An absent segment, or an
/// intermediate that is not a nested record, reads as missing.
pub(crate) fn read_path(record: &dyn FieldValues, segments: &[String]) -> FieldPresence {
    let Some((last, init)) = segments.split_last() else {
        return FieldPresence::Missing;
    };

    let mut current: &dyn FieldValues = record;
    for segment in init {
        match current.get_value(segment) {
            Some(FieldRead::Nested(next)) => current = next,
            // A null intermediate reads as missing rather than erroring at
            // evaluation time.
            _ => return FieldPresence::Missing,
        }
    }

    match current.get_value(last) {
        Some(FieldRead::Value(value)) => FieldPresence::Present(value),
        _ => FieldPresence::Missing,
    }
}

///
/// ResolvedField
///
/// A selector resolved against a schema: normalized segments (accessor
/// parens stripped) plus the terminal field shape.
///

#[derive(Clone, Debug)]
pub struct ResolvedField {
    pub segments: Vec<String>,
    pub ty: FieldType,
    pub nullable: bool,
}

/// Resolve a dotted selector against a schema.
///
/// Segments may be written `name` (plain field) or `name()` (zero-argument
/// accessor); each intermediate segment must resolve to a nested entity.
pub fn resolve_path(schema: &'static EntitySchema, selector: &str) -> Result<ResolvedField, Error> {
    if selector.trim().is_empty() {
        return Err(Error::invalid_selector(
            selector,
            schema.path,
            "selector is empty",
        ));
    }

    let mut current = schema;
    let mut segments = Vec::new();
    let parts: Vec<&str> = selector.split('.').collect();
    let last_index = parts.len() - 1;

    for (index, raw) in parts.iter().enumerate() {
        let part = raw.trim();
        if part.is_empty() {
            return Err(Error::invalid_selector(
                selector,
                schema.path,
                "selector contains an empty segment",
            ));
        }

        let (name, wants_accessor) = split_segment(part).ok_or_else(|| {
            Error::invalid_selector(selector, schema.path, format!("malformed segment '{part}'"))
        })?;

        let field = current.field(name).ok_or_else(|| {
            Error::invalid_selector(
                selector,
                schema.path,
                format!("no field '{name}' on entity '{}'", current.path),
            )
        })?;

        let matches_kind = match field.kind {
            FieldKind::Field => !wants_accessor,
            FieldKind::Accessor => wants_accessor,
        };
        if !matches_kind {
            let expected = match field.kind {
                FieldKind::Field => format!("'{name}' is a field, not an accessor"),
                FieldKind::Accessor => format!("'{name}' is an accessor; address it as '{name}()'"),
            };
            return Err(Error::invalid_selector(selector, schema.path, expected));
        }

        segments.push(name.to_string());

        if index == last_index {
            return Ok(ResolvedField {
                segments,
                ty: field.ty,
                nullable: field.nullable,
            });
        }

        match field.ty {
            FieldType::Nested(next) => current = next,
            _ => {
                return Err(Error::invalid_selector(
                    selector,
                    schema.path,
                    format!("segment '{name}' is not a nested entity"),
                ));
            }
        }
    }

    // Unreachable: the loop always returns on the last segment.
    Err(Error::invalid_selector(
        selector,
        schema.path,
        "selector did not resolve",
    ))
}

/// Split a segment into its name and whether it used accessor syntax.
/// Returns None for malformed paren usage.
fn split_segment(part: &str) -> Option<(&str, bool)> {
    if let Some(name) = part.strip_suffix("()") {
        if name.is_empty() || name.contains('(') || name.contains(')') {
            return None;
        }
        return Some((name, true));
    }

    if part.contains('(') || part.contains(')') {
        return None;
    }

    Some((part, false))
}
