use crate::value::{CqlValue, Value};

///
/// ValueTag
///
/// Stable value-variant tag shared by the semantic and wire value enums.
/// Used for diagnostics and for codec mismatch reporting.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    BigInt = 1,
    Boolean = 2,
    Double = 3,
    Float = 4,
    Int = 5,
    Null = 6,
    Text = 7,
    Timestamp = 8,
    TimestampTz = 9,
    Uuid = 10,
}

impl ValueTag {
    /// Stable byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BigInt => "BigInt",
            Self::Boolean => "Boolean",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::Int => "Int",
            Self::Null => "Null",
            Self::Text => "Text",
            Self::Timestamp => "Timestamp",
            Self::TimestampTz => "TimestampTz",
            Self::Uuid => "Uuid",
        }
    }
}

impl std::fmt::Display for ValueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[must_use]
pub(super) const fn value_tag(value: &Value) -> ValueTag {
    match value {
        Value::BigInt(_) => ValueTag::BigInt,
        Value::Boolean(_) => ValueTag::Boolean,
        Value::Double(_) => ValueTag::Double,
        Value::Float(_) => ValueTag::Float,
        Value::Int(_) => ValueTag::Int,
        Value::Null => ValueTag::Null,
        Value::Text(_) => ValueTag::Text,
        Value::Timestamp(_) => ValueTag::Timestamp,
        Value::TimestampTz(_) => ValueTag::TimestampTz,
        Value::Uuid(_) => ValueTag::Uuid,
    }
}

// The wire enum has a single timestamp variant; offsets do not survive storage.
#[must_use]
pub(super) const fn cql_value_tag(value: &CqlValue) -> ValueTag {
    match value {
        CqlValue::BigInt(_) => ValueTag::BigInt,
        CqlValue::Boolean(_) => ValueTag::Boolean,
        CqlValue::Double(_) => ValueTag::Double,
        CqlValue::Float(_) => ValueTag::Float,
        CqlValue::Int(_) => ValueTag::Int,
        CqlValue::Null => ValueTag::Null,
        CqlValue::Text(_) => ValueTag::Text,
        CqlValue::Timestamp(_) => ValueTag::Timestamp,
        CqlValue::Uuid(_) => ValueTag::Uuid,
    }
}
