use chrono::{DateTime, FixedOffset, Utc};
use cqlmap::prelude::*;
use uuid::Uuid;

#[derive(Entity)]
#[cql(table = "events", keyspace = "audit")]
struct Event {
    #[cql(partition_key = 2)]
    seq: i64,
    #[cql(partition_key, name = "tenantId")]
    tenant: Uuid,
    #[cql(partition_key = 1)]
    bucket: i32,
    kind: Option<String>,
    ratio: f32,
    score: Option<f64>,
    flagged: bool,
    at: DateTime<Utc>,
    local: Option<DateTime<FixedOffset>>,
    #[cql(skip)]
    scratch: Vec<u8>,
}

fn main() {
    use cqlmap::traits::EntityKind;

    assert_eq!(Event::MODEL.fields.len(), 9);
    assert_eq!(Event::MODEL.fields[1].column_name(), "tenantId");
}
