use crate::{
    codec::{self, CodecError},
    error::Error,
    schema::EntityDescriptor,
    traits::{EntityKind, FieldValue},
    value::{CqlValue, Value},
};
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

///
/// Key
///
/// Partition-key lookup argument.
///
/// - `Scalar`: the value of a single-column partition key
/// - `Composite`: one value per partition-key column, in rank order
/// - `Entity`: an entity instance; its partition-key fields are used
///

#[derive(Debug)]
pub enum Key<'a, E> {
    Scalar(Value),
    Composite(Vec<Value>),
    Entity(&'a E),
}

impl<'a, E> Key<'a, E> {
    #[must_use]
    pub const fn entity(entity: &'a E) -> Self {
        Self::Entity(entity)
    }

    #[must_use]
    pub fn composite(values: impl IntoIterator<Item = Value>) -> Self {
        Self::Composite(values.into_iter().collect())
    }
}

impl<E: EntityKind> Key<'_, E> {
    /// Resolve into wire values bound in partition-key rank order.
    pub(crate) fn bind(self, descriptor: &EntityDescriptor) -> Result<Vec<CqlValue>, Error> {
        let values = match self {
            Self::Scalar(value) => vec![value],
            Self::Composite(values) => values,
            Self::Entity(entity) => {
                let fields = entity.to_field_values();
                descriptor
                    .partition_key_indexes()
                    .iter()
                    .map(|&index| {
                        fields.get(index).cloned().ok_or(CodecError::ValueCount {
                            expected: descriptor.columns().len(),
                            found: fields.len(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let expected = descriptor.partition_key_len();
        if values.len() != expected {
            return Err(Error::KeyShapeMismatch {
                expected,
                found: values.len(),
            });
        }

        let bound = values
            .iter()
            .zip(descriptor.partition_keys())
            .map(|(value, column)| {
                // partition-key columns never accept null, whatever the field type
                if value.is_null() {
                    return Err(CodecError::UnexpectedNull {
                        expected: column.ty.kind,
                    }
                    .in_column(&column.column));
                }

                codec::bind_value(value, column.ty).map_err(|err| err.in_column(&column.column))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bound)
    }
}

impl<E> From<Value> for Key<'_, E> {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl<E> From<Vec<Value>> for Key<'_, E> {
    fn from(values: Vec<Value>) -> Self {
        Self::Composite(values)
    }
}

impl<E> From<&str> for Key<'_, E> {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::Text(value.to_string()))
    }
}

macro_rules! impl_scalar_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<E> From<$ty> for Key<'_, E> {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_value())
                }
            }
        )*
    };
}

impl_scalar_key!(
    String,
    Uuid,
    i32,
    i64,
    bool,
    f64,
    f32,
    DateTime<Utc>,
    DateTime<FixedOffset>,
);

macro_rules! impl_tuple_key {
    ($($ty:ident => $var:ident),+) => {
        impl<E, $($ty: FieldValue),+> From<($($ty,)+)> for Key<'_, E> {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                Self::Composite(vec![$($var.to_value()),+])
            }
        }
    };
}

impl_tuple_key!(A => a, B => b);
impl_tuple_key!(A => a, B => b, C => c);
impl_tuple_key!(A => a, B => b, C => c, D => d);
