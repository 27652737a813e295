//! Hand-written entities shared by unit tests.

use crate::{
    codec::CodecError,
    model::{EntityModel, FieldModel},
    traits::{EntityKind, FieldValue, decode_field},
    value::Value,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

///
/// User
/// Single-column partition key, keyspace from the session.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct User {
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) user_id: Uuid,
}

impl User {
    pub(crate) fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            user_id: Uuid::new_v4(),
        }
    }
}

impl EntityKind for User {
    const MODEL: &'static EntityModel = &EntityModel {
        path: "test_fixtures::User",
        table: "users",
        keyspace: None,
        fields: &[
            FieldModel {
                name: "email",
                column: None,
                ty: <String as FieldValue>::FIELD_TYPE,
                partition_key: Some(0),
            },
            FieldModel {
                name: "name",
                column: None,
                ty: <String as FieldValue>::FIELD_TYPE,
                partition_key: None,
            },
            FieldModel {
                name: "user_id",
                column: None,
                ty: <Uuid as FieldValue>::FIELD_TYPE,
                partition_key: None,
            },
        ],
    };

    fn to_field_values(&self) -> Vec<Value> {
        vec![
            self.email.to_value(),
            self.name.to_value(),
            self.user_id.to_value(),
        ]
    }

    fn from_field_values(values: Vec<Value>) -> Result<Self, CodecError> {
        let mut values = values.into_iter();

        Ok(Self {
            email: decode_field(Self::MODEL, 0, values.next())?,
            name: decode_field(Self::MODEL, 1, values.next())?,
            user_id: decode_field(Self::MODEL, 2, values.next())?,
        })
    }
}

///
/// Reading
/// Two-column partition key declared out of rank order, with a renamed
/// column, an optional column and a timestamp.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Reading {
    pub(crate) day: i32,
    pub(crate) sensor: String,
    pub(crate) value: f64,
    pub(crate) note: Option<String>,
    pub(crate) taken_at: DateTime<Utc>,
}

impl Reading {
    pub(crate) fn new(sensor: &str, day: i32, value: f64) -> Self {
        Self {
            day,
            sensor: sensor.to_string(),
            value,
            note: None,
            taken_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000 + i64::from(day))
                .unwrap(),
        }
    }
}

impl EntityKind for Reading {
    const MODEL: &'static EntityModel = &EntityModel {
        path: "test_fixtures::Reading",
        table: "sensor_readings",
        keyspace: Some("telemetry"),
        fields: &[
            FieldModel {
                name: "day",
                column: None,
                ty: <i32 as FieldValue>::FIELD_TYPE,
                partition_key: Some(1),
            },
            FieldModel {
                name: "sensor",
                column: Some("sensor_id"),
                ty: <String as FieldValue>::FIELD_TYPE,
                partition_key: Some(0),
            },
            FieldModel {
                name: "value",
                column: None,
                ty: <f64 as FieldValue>::FIELD_TYPE,
                partition_key: None,
            },
            FieldModel {
                name: "note",
                column: None,
                ty: <Option<String> as FieldValue>::FIELD_TYPE,
                partition_key: None,
            },
            FieldModel {
                name: "taken_at",
                column: Some("takenAt"),
                ty: <DateTime<Utc> as FieldValue>::FIELD_TYPE,
                partition_key: None,
            },
        ],
    };

    fn to_field_values(&self) -> Vec<Value> {
        vec![
            self.day.to_value(),
            self.sensor.to_value(),
            self.value.to_value(),
            self.note.to_value(),
            self.taken_at.to_value(),
        ]
    }

    fn from_field_values(values: Vec<Value>) -> Result<Self, CodecError> {
        let mut values = values.into_iter();

        Ok(Self {
            day: decode_field(Self::MODEL, 0, values.next())?,
            sensor: decode_field(Self::MODEL, 1, values.next())?,
            value: decode_field(Self::MODEL, 2, values.next())?,
            note: decode_field(Self::MODEL, 3, values.next())?,
            taken_at: decode_field(Self::MODEL, 4, values.next())?,
        })
    }
}
