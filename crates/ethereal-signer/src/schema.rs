//! Parsing of the flattened type-schema strings served by the exchange.
//!
//! The exchange publishes each primary type as `"<type> <name>,<type> <name>,..."`.
//! Field order is significant: it is the order fields are encoded in.

use ethereal_core::{SchemaError, SchemaResult};
use std::collections::BTreeMap;
use std::fmt;

/// One `(name, type)` pair of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedField {
    pub name: String,
    pub type_name: String,
}

impl TypedField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for TypedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// Parse a comma-separated schema string into ordered fields.
///
/// Empty segments (`"a b,,c d"`, trailing commas) are skipped. Every other
/// segment must split on whitespace into exactly `<type> <name>`.
pub fn parse_type_schema(input: &str) -> SchemaResult<Vec<TypedField>> {
    let mut fields = Vec::new();
    for raw in input.split(',') {
        let field = raw.trim();
        if field.is_empty() {
            continue;
        }
        let parts: Vec<&str> = field.split_whitespace().collect();
        match parts.as_slice() {
            [type_name, name] => fields.push(TypedField::new(*name, *type_name)),
            _ => {
                return Err(SchemaError::InvalidField {
                    field: field.to_string(),
                })
            }
        }
    }
    Ok(fields)
}

/// Inverse of [`parse_type_schema`] for well-formed input.
pub fn format_type_schema(fields: &[TypedField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Struct type definitions keyed by type name. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSchema {
    types: BTreeMap<String, Vec<TypedField>>,
}

impl TypeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every `primaryType -> schema string` entry.
    pub fn from_signature_types<'a, I>(entries: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut schema = Self::new();
        for (name, definition) in entries {
            schema.insert(name.clone(), parse_type_schema(definition)?);
        }
        Ok(schema)
    }

    pub fn with_type(mut self, name: impl Into<String>, fields: Vec<TypedField>) -> Self {
        self.insert(name, fields);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<TypedField>) {
        self.types.insert(name.into(), fields);
    }

    pub fn get(&self, name: &str) -> Option<&[TypedField]> {
        self.types.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TypedField])> {
        self.types.iter().map(|(n, f)| (n.as_str(), f.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
