mod tag;


use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

// re-exports
pub use tag::ValueTag;

///
/// Value
///
/// Semantic field value as seen by entity code.
/// Variants mirror the closed set of supported field kinds.
///
/// Null        → the field's value is Option::None (an absent column).
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    BigInt(i64),
    Boolean(bool),
    Double(f64),
    Float(f32),
    Int(i32),
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    /// Timezone-aware timestamp; the offset is not preserved by storage.
    TimestampTz(DateTime<FixedOffset>),
    Uuid(Uuid),
}

impl Value {
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::value_tag(self)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

///
/// CqlValue
///
/// Wire value exchanged with the session.
/// Timestamps travel as milliseconds since the Unix epoch, which is the
/// native resolution of the store's `timestamp` column.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CqlValue {
    BigInt(i64),
    Boolean(bool),
    Double(f64),
    Float(f32),
    Int(i32),
    Null,
    Text(String),
    Timestamp(i64),
    Uuid(Uuid),
}

impl CqlValue {
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::cql_value_tag(self)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
