use crate::{
    codec::CodecError,
    model::{FieldKind, FieldType},
    value::Value,
};
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

///
/// FieldValue
///
/// Conversion between a Rust field type and the semantic `Value`.
///
/// `FIELD_TYPE` feeds the static entity model; a type may report
/// `FieldKind::Unsupported` to opt out of storage, which is rejected when a
/// repository is built for an entity containing it.
///

pub trait FieldValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CodecError>;
}

// Scalar impls: one exact variant, plus any lossless widening sources.
// `copy` types are read out of `self` directly; the rest are cloned.
macro_rules! impl_field_value {
    (copy $ty:ty, $kind:ident, $variant:ident $(, $wide:ident => $conv:expr)*) => {
        impl_field_value!(@impl $ty, $kind, $variant, |this| *this $(, $wide => $conv)*);
    };
    (clone $ty:ty, $kind:ident, $variant:ident $(, $wide:ident => $conv:expr)*) => {
        impl_field_value!(@impl $ty, $kind, $variant, |this| this.clone() $(, $wide => $conv)*);
    };
    (@impl $ty:ty, $kind:ident, $variant:ident, |$this:ident| $read:expr $(, $wide:ident => $conv:expr)*) => {
        impl FieldValue for $ty {
            const FIELD_TYPE: FieldType = FieldType::required(FieldKind::$kind);

            fn to_value(&self) -> Value {
                let $this = self;
                Value::$variant($read)
            }

            fn from_value(value: Value) -> Result<Self, CodecError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    $( Value::$wide(v) => Ok($conv(v)), )*
                    Value::Null => Err(CodecError::UnexpectedNull {
                        expected: FieldKind::$kind,
                    }),
                    other => Err(CodecError::TypeMismatch {
                        expected: FieldKind::$kind,
                        found: other.tag(),
                    }),
                }
            }
        }
    };
}

impl_field_value!(clone String, Text, Text);
impl_field_value!(copy Uuid, Uuid, Uuid);
impl_field_value!(copy i32, Int, Int);
impl_field_value!(copy i64, BigInt, BigInt, Int => i64::from);
impl_field_value!(copy bool, Boolean, Boolean);
impl_field_value!(copy f64, Double, Double, Float => f64::from);
impl_field_value!(copy f32, Float, Float);
impl_field_value!(copy DateTime<Utc>, Timestamp, Timestamp,
    TimestampTz => |v: DateTime<FixedOffset>| v.with_timezone(&Utc));
impl_field_value!(copy DateTime<FixedOffset>, TimestampTz, TimestampTz,
    Timestamp => |v: DateTime<Utc>| v.fixed_offset());

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE.nullable();

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
