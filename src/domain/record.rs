// Record domain models: raw parsed rows, field schemas and coerced rows
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Column names of one parsed payload, shared by every row it produced.
#[derive(Debug)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            // First occurrence wins for duplicated column names
            index.entry(name.clone()).or_insert(idx);
        }
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// One input row as column name -> raw string value.
///
/// Short rows simply carry fewer values; lookups past the end yield `None`.
#[derive(Debug, Clone)]
pub struct RawRecord {
    header: Arc<Header>,
    values: Vec<String>,
}

impl RawRecord {
    pub fn new(header: Arc<Header>, values: Vec<String>) -> Self {
        Self { header, values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.header.position(column)?;
        self.values.get(idx).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Year,
    Measure,
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Year(i32),
    Number(f64),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Year(y) => Some(f64::from(*y)),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Year(y) => write!(f, "{}", y),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Year(y) => serializer.serialize_i32(*y),
            Value::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

/// What to do when a raw value is absent or fails conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum OnInvalid {
    Fallback(Value),
    DropRow,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub column: String,
    pub output: String,
    pub kind: FieldKind,
    pub on_invalid: OnInvalid,
}

impl FieldSpec {
    fn new(column: &str, kind: FieldKind) -> Self {
        let fallback = match kind {
            FieldKind::Text => Value::Text(String::new()),
            FieldKind::Year => Value::Year(0),
            FieldKind::Measure => Value::Number(0.0),
        };
        Self {
            column: column.to_string(),
            output: column.to_string(),
            kind,
            on_invalid: OnInvalid::Fallback(fallback),
        }
    }

    /// Convert one raw value. `None` means the value is invalid for this kind.
    pub fn convert(&self, raw: Option<&str>) -> Option<Value> {
        let raw = raw?;
        match self.kind {
            FieldKind::Text => {
                if raw.trim().is_empty() {
                    None
                } else {
                    Some(Value::Text(raw.to_string()))
                }
            }
            FieldKind::Year => raw.trim().parse::<i32>().ok().map(Value::Year),
            FieldKind::Measure => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Number),
        }
    }
}

/// The columns one pipeline instance reads, and how each is coerced.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::default()
    }

    /// Apply the schema to one row. Returns `None` when a `DropRow` field is invalid.
    pub fn coerce(&self, record: &RawRecord) -> Option<FilteredRecord> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let value = match spec.convert(record.get(&spec.column)) {
                Some(value) => value,
                None => match &spec.on_invalid {
                    OnInvalid::Fallback(value) => value.clone(),
                    OnInvalid::DropRow => return None,
                },
            };
            fields.push((spec.output.clone(), value));
        }
        Some(FilteredRecord { fields })
    }
}

/// Builder for [`FieldSchema`]. Modifiers apply to the most recently added field.
#[derive(Debug, Default)]
pub struct FieldSchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl FieldSchemaBuilder {
    pub fn text(mut self, column: &str) -> Self {
        self.fields.push(FieldSpec::new(column, FieldKind::Text));
        self
    }

    pub fn year(mut self, column: &str) -> Self {
        self.fields.push(FieldSpec::new(column, FieldKind::Year));
        self
    }

    pub fn measure(mut self, column: &str) -> Self {
        self.fields.push(FieldSpec::new(column, FieldKind::Measure));
        self
    }

    /// Name the field differently in the projected output.
    pub fn alias(mut self, output: &str) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.output = output.to_string();
        }
        self
    }

    pub fn fallback(mut self, value: Value) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.on_invalid = OnInvalid::Fallback(value);
        }
        self
    }

    /// Drop the whole row when this field is invalid.
    pub fn required(mut self) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.on_invalid = OnInvalid::DropRow;
        }
        self
    }

    pub fn build(self) -> FieldSchema {
        FieldSchema {
            fields: self.fields,
        }
    }
}

/// A row projected and coerced by a [`FieldSchema`]; every declared field is present.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecord {
    fields: Vec<(String, Value)>,
}

impl FilteredRecord {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_number()
    }

    /// Render a field as a display key (text as-is, numbers formatted).
    pub fn key(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }
}

impl Serialize for FilteredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
