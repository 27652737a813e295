//! Type codec: semantic values ↔ wire values, and field kinds ↔ column types.
//!
//! Every conversion is a total match over the closed kind set, so adding a
//! kind is one exhaustively-checked change here.


use crate::{
    model::{FieldKind, FieldType},
    value::{CqlValue, Value, ValueTag},
};
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

///
/// ColumnType
/// Storage column types emitted into DDL.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnType {
    BigInt,
    Boolean,
    Double,
    Float,
    Int,
    Text,
    Timestamp,
    Uuid,
}

impl ColumnType {
    /// Native type name in the store's DDL grammar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Double => "double",
            Self::Float => "float",
            Self::Int => "int",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
        }
    }

    /// Parse a native type name (case-insensitive; `varchar` is an alias of `text`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "bigint" => Self::BigInt,
            "boolean" => Self::Boolean,
            "double" => Self::Double,
            "float" => Self::Float,
            "int" => Self::Int,
            "text" | "varchar" => Self::Text,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            _ => return None,
        };

        Some(ty)
    }

    /// Whether a wire value may be stored in a column of this type.
    #[must_use]
    pub const fn accepts(self, value: &CqlValue) -> bool {
        matches!(
            (self, value),
            (_, CqlValue::Null)
                | (Self::BigInt, CqlValue::BigInt(_))
                | (Self::Boolean, CqlValue::Boolean(_))
                | (Self::Double, CqlValue::Double(_))
                | (Self::Float, CqlValue::Float(_))
                | (Self::Int, CqlValue::Int(_))
                | (Self::Text, CqlValue::Text(_))
                | (Self::Timestamp, CqlValue::Timestamp(_))
                | (Self::Uuid, CqlValue::Uuid(_))
        )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// CodecError
///

#[derive(Clone, Debug, ThisError, PartialEq)]
pub enum CodecError {
    #[error("no column type mapping for '{type_name}'")]
    UnsupportedType { type_name: String },

    #[error("expected {expected} value, found {found}")]
    TypeMismatch { expected: FieldKind, found: ValueTag },

    #[error("unexpected null for non-nullable {expected} value")]
    UnexpectedNull { expected: FieldKind },

    #[error("timestamp {millis}ms is outside the representable range")]
    TimestampOutOfRange { millis: i64 },

    #[error("expected {expected} values, found {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("column '{column}': {source}")]
    Column {
        column: String,
        #[source]
        source: Box<Self>,
    },
}

impl CodecError {
    /// Attach the column the failure occurred in.
    #[must_use]
    pub fn in_column(self, column: impl Into<String>) -> Self {
        Self::Column {
            column: column.into(),
            source: Box::new(self),
        }
    }
}

/// Storage column type for a field kind, used for DDL generation.
/// Nullability does not affect the column type.
pub fn column_type(kind: FieldKind) -> Result<ColumnType, CodecError> {
    let ty = match kind {
        FieldKind::BigInt => ColumnType::BigInt,
        FieldKind::Boolean => ColumnType::Boolean,
        FieldKind::Double => ColumnType::Double,
        FieldKind::Float => ColumnType::Float,
        FieldKind::Int => ColumnType::Int,
        FieldKind::Text => ColumnType::Text,
        FieldKind::Timestamp | FieldKind::TimestampTz => ColumnType::Timestamp,
        FieldKind::Uuid => ColumnType::Uuid,
        FieldKind::Unsupported(type_name) => {
            return Err(CodecError::UnsupportedType {
                type_name: type_name.to_string(),
            });
        }
    };

    Ok(ty)
}

/// Convert a semantic value into its wire form. Total over `Value`.
#[must_use]
pub fn to_wire(value: &Value) -> CqlValue {
    match value {
        Value::BigInt(v) => CqlValue::BigInt(*v),
        Value::Boolean(v) => CqlValue::Boolean(*v),
        Value::Double(v) => CqlValue::Double(*v),
        Value::Float(v) => CqlValue::Float(*v),
        Value::Int(v) => CqlValue::Int(*v),
        Value::Null => CqlValue::Null,
        Value::Text(v) => CqlValue::Text(v.clone()),
        Value::Timestamp(v) => CqlValue::Timestamp(v.timestamp_millis()),
        Value::TimestampTz(v) => CqlValue::Timestamp(v.timestamp_millis()),
        Value::Uuid(v) => CqlValue::Uuid(*v),
    }
}

/// Check a semantic value against a column's field type and convert it to
/// wire form, widening Int→BigInt and Float→Double where needed.
pub fn bind_value(value: &Value, ty: FieldType) -> Result<CqlValue, CodecError> {
    let expected = ty.kind;
    column_type(expected)?;

    let wire = match (expected, value) {
        (_, Value::Null) if ty.nullable => CqlValue::Null,
        (_, Value::Null) => return Err(CodecError::UnexpectedNull { expected }),

        (FieldKind::BigInt, Value::Int(v)) => CqlValue::BigInt(i64::from(*v)),
        (FieldKind::Double, Value::Float(v)) => CqlValue::Double(f64::from(*v)),
        (FieldKind::Timestamp | FieldKind::TimestampTz, Value::Timestamp(_) | Value::TimestampTz(_))
        | (FieldKind::BigInt, Value::BigInt(_))
        | (FieldKind::Boolean, Value::Boolean(_))
        | (FieldKind::Double, Value::Double(_))
        | (FieldKind::Float, Value::Float(_))
        | (FieldKind::Int, Value::Int(_))
        | (FieldKind::Text, Value::Text(_))
        | (FieldKind::Uuid, Value::Uuid(_)) => to_wire(value),

        _ => {
            return Err(CodecError::TypeMismatch {
                expected,
                found: value.tag(),
            });
        }
    };

    Ok(wire)
}

/// Convert a wire value read from a column back into a semantic value.
pub fn from_wire(value: CqlValue, ty: FieldType) -> Result<Value, CodecError> {
    let expected = ty.kind;
    column_type(expected)?;

    let semantic = match (expected, value) {
        (_, CqlValue::Null) if ty.nullable => Value::Null,
        (_, CqlValue::Null) => return Err(CodecError::UnexpectedNull { expected }),

        (FieldKind::BigInt, CqlValue::BigInt(v)) => Value::BigInt(v),
        (FieldKind::BigInt, CqlValue::Int(v)) => Value::BigInt(i64::from(v)),
        (FieldKind::Boolean, CqlValue::Boolean(v)) => Value::Boolean(v),
        (FieldKind::Double, CqlValue::Double(v)) => Value::Double(v),
        (FieldKind::Double, CqlValue::Float(v)) => Value::Double(f64::from(v)),
        (FieldKind::Float, CqlValue::Float(v)) => Value::Float(v),
        (FieldKind::Int, CqlValue::Int(v)) => Value::Int(v),
        (FieldKind::Text, CqlValue::Text(v)) => Value::Text(v),
        (FieldKind::Timestamp, CqlValue::Timestamp(millis)) => {
            Value::Timestamp(timestamp_from_millis(millis)?)
        }
        (FieldKind::TimestampTz, CqlValue::Timestamp(millis)) => {
            Value::TimestampTz(timestamp_from_millis(millis)?.fixed_offset())
        }
        (FieldKind::Uuid, CqlValue::Uuid(v)) => Value::Uuid(v),

        (_, other) => {
            return Err(CodecError::TypeMismatch {
                expected,
                found: other.tag(),
            });
        }
    };

    Ok(semantic)
}

fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>, CodecError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(CodecError::TimestampOutOfRange { millis })
}
