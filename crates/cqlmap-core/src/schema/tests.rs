use crate::{
    error::Error,
    model::{EntityModel, FieldKind, FieldModel, FieldType},
    schema::{EntityDescriptor, SchemaError},
    test_fixtures::{Reading, User},
    traits::EntityKind,
};

const TEXT: FieldType = FieldType::required(FieldKind::Text);

const fn field(name: &'static str, partition_key: Option<i32>) -> FieldModel {
    FieldModel {
        name,
        column: None,
        ty: TEXT,
        partition_key,
    }
}

#[test]
fn single_key_entity_resolves_session_keyspace() {
    let descriptor = EntityDescriptor::derive_from(User::MODEL, Some("app")).unwrap();

    assert_eq!(descriptor.keyspace(), "app");
    assert_eq!(descriptor.table(), "users");
    assert_eq!(
        descriptor
            .columns()
            .iter()
            .map(|c| c.column.as_str())
            .collect::<Vec<_>>(),
        ["email", "name", "user_id"]
    );
    assert_eq!(descriptor.partition_key_indexes(), &[0]);
}

#[test]
fn declared_keyspace_wins_over_session_default() {
    let descriptor = EntityDescriptor::derive_from(Reading::MODEL, Some("app")).unwrap();

    assert_eq!(descriptor.keyspace(), "telemetry");
}

#[test]
fn partition_keys_follow_rank_not_declaration() {
    let descriptor = EntityDescriptor::derive_from(Reading::MODEL, None).unwrap();

    let keys: Vec<_> = descriptor
        .partition_keys()
        .map(|c| c.column.as_str())
        .collect();
    assert_eq!(keys, ["sensor_id", "day"]);
    assert_eq!(descriptor.partition_key_len(), 2);
}

#[test]
fn equal_ranks_fall_back_to_declaration_order() {
    static MODEL: EntityModel = EntityModel {
        path: "Tied",
        table: "tied",
        keyspace: Some("ks"),
        fields: &[field("b", Some(0)), field("a", Some(0)), field("c", None)],
    };

    let descriptor = EntityDescriptor::derive_from(&MODEL, None).unwrap();
    assert_eq!(descriptor.partition_key_indexes(), &[0, 1]);
}

#[test]
fn zero_partition_key_fields_fail() {
    static MODEL: EntityModel = EntityModel {
        path: "NoKey",
        table: "no_key",
        keyspace: Some("ks"),
        fields: &[field("a", None), field("b", None)],
    };

    let err = EntityDescriptor::derive_from(&MODEL, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::MissingPartitionKey { entity: "NoKey" })
    ));
}

#[test]
fn missing_keyspace_everywhere_fails() {
    let err = EntityDescriptor::derive_from(User::MODEL, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::MissingKeyspace { .. })
    ));

    let err = EntityDescriptor::derive_from(User::MODEL, Some("")).unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::MissingKeyspace { .. })
    ));
}

#[test]
fn colliding_column_names_fail() {
    static MODEL: EntityModel = EntityModel {
        path: "Dup",
        table: "dup",
        keyspace: Some("ks"),
        fields: &[
            field("id", Some(0)),
            FieldModel {
                name: "other",
                column: Some("id"),
                ty: TEXT,
                partition_key: None,
            },
        ],
    };

    let err = EntityDescriptor::derive_from(&MODEL, None).unwrap_err();
    let Error::Schema(SchemaError::DuplicateColumn {
        column,
        first,
        second,
    }) = err
    else {
        panic!("expected DuplicateColumn, got {err:?}");
    };
    assert_eq!((column.as_str(), first, second), ("id", "id", "other"));
}

#[test]
fn bare_names_collide_case_insensitively() {
    static MODEL: EntityModel = EntityModel {
        path: "Folded",
        table: "folded",
        keyspace: Some("ks"),
        fields: &[field("Name", Some(0)), field("name", None)],
    };

    let err = EntityDescriptor::derive_from(&MODEL, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::DuplicateColumn { .. })
    ));
}

#[test]
fn quoted_names_are_case_sensitive() {
    static MODEL: EntityModel = EntityModel {
        path: "Quoted",
        table: "quoted",
        keyspace: Some("ks"),
        fields: &[field("user_Id", Some(0)), field("user_id", None)],
    };

    assert!(EntityDescriptor::derive_from(&MODEL, None).is_ok());
}

#[test]
fn unsupported_field_type_fails_at_construction() {
    static MODEL: EntityModel = EntityModel {
        path: "Priced",
        table: "priced",
        keyspace: Some("ks"),
        fields: &[
            field("sku", Some(0)),
            FieldModel {
                name: "price",
                column: None,
                ty: FieldType::required(FieldKind::Unsupported("Decimal")),
                partition_key: None,
            },
        ],
    };

    let err = EntityDescriptor::derive_from(&MODEL, None).unwrap_err();
    let Error::UnsupportedType { field, type_name } = err else {
        panic!("expected UnsupportedType, got {err:?}");
    };
    assert_eq!((field.as_str(), type_name.as_str()), ("price", "Decimal"));
}

#[test]
fn empty_table_and_column_names_fail() {
    static NO_TABLE: EntityModel = EntityModel {
        path: "NoTable",
        table: "",
        keyspace: Some("ks"),
        fields: &[field("id", Some(0))],
    };
    static EMPTY_COLUMN: EntityModel = EntityModel {
        path: "EmptyColumn",
        table: "t",
        keyspace: Some("ks"),
        fields: &[FieldModel {
            name: "id",
            column: Some(""),
            ty: TEXT,
            partition_key: Some(0),
        }],
    };

    assert!(matches!(
        EntityDescriptor::derive_from(&NO_TABLE, None),
        Err(Error::Schema(SchemaError::MissingTable { .. }))
    ));
    assert!(matches!(
        EntityDescriptor::derive_from(&EMPTY_COLUMN, None),
        Err(Error::Schema(SchemaError::EmptyColumnName { field: "id" }))
    ));
}
