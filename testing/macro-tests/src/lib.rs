//! Entities declared through `#[derive(Entity)]`, shared by the integration
//! tests in `tests/`.

use chrono::{DateTime, FixedOffset, Utc};
use cqlmap::prelude::*;
use uuid::Uuid;

///
/// User
///

#[derive(Clone, Debug, Entity, PartialEq)]
#[cql(table = "users")]
pub struct User {
    #[cql(partition_key)]
    pub email: String,
    pub name: String,
    pub user_id: Uuid,
}

impl User {
    #[must_use]
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            user_id: Uuid::new_v4(),
        }
    }
}

///
/// Measurement
/// Composite partition key declared out of rank order, every supported
/// column type, and a field that is never persisted.
///

#[derive(Clone, Debug, Entity, PartialEq)]
#[cql(table = "measurements", keyspace = "telemetry")]
pub struct Measurement {
    #[cql(partition_key = 1)]
    pub day: i32,
    #[cql(partition_key = 0, name = "station-id")]
    pub station: String,
    pub reading: f64,
    pub peak: Option<f32>,
    pub samples: i64,
    pub calibrated: bool,
    pub batch: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
    #[cql(name = "localTime")]
    pub local_time: DateTime<FixedOffset>,
    #[cql(skip)]
    pub cached_label: Option<String>,
}

impl Measurement {
    #[must_use]
    pub fn new(station: &str, day: i32) -> Self {
        let recorded_at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000 + i64::from(day))
            .unwrap_or_default();

        Self {
            day,
            station: station.to_string(),
            reading: f64::from(day) * 0.5,
            peak: None,
            samples: i64::from(day) * 1_000,
            calibrated: day % 2 == 0,
            batch: None,
            recorded_at,
            local_time: recorded_at.fixed_offset(),
            cached_label: None,
        }
    }
}

///
/// Tag
/// Raw-identifier field stored under its bare name, keyed with a negative rank.
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[cql(table = "tags", keyspace = "app")]
pub struct Tag {
    #[cql(partition_key)]
    pub id: i32,
    #[cql(partition_key = -1)]
    pub scope: String,
    pub r#type: String,
}

///
/// Orphan
/// No partition key; a repository for it cannot be built.
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[cql(table = "orphans", keyspace = "app")]
pub struct Orphan {
    pub label: String,
}

///
/// Clash
/// Two fields mapped onto the same stored column.
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[cql(table = "clashes", keyspace = "app")]
pub struct Clash {
    #[cql(partition_key)]
    pub id: i64,
    #[cql(name = "id")]
    pub other: i64,
}
