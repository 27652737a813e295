use cqlmap::{
    codec::CodecError,
    model::{EntityModel, FieldModel},
    prelude::*,
    traits::{EntityKind, FieldValue, decode_field},
};

// Implementing the trait by hand is the explicit alternative to the derive.
struct Tag {
    label: String,
}

impl EntityKind for Tag {
    const MODEL: &'static EntityModel = &EntityModel {
        path: "ui::Tag",
        table: "tags",
        keyspace: Some("app"),
        fields: &[FieldModel {
            name: "label",
            column: None,
            ty: <String as FieldValue>::FIELD_TYPE,
            partition_key: Some(0),
        }],
    };

    fn to_field_values(&self) -> Vec<Value> {
        vec![self.label.to_value()]
    }

    fn from_field_values(values: Vec<Value>) -> Result<Self, CodecError> {
        let mut values = values.into_iter();

        Ok(Self {
            label: decode_field(Self::MODEL, 0, values.next())?,
        })
    }
}

fn main() {
    let tag = Tag {
        label: "x".to_string(),
    };
    assert_eq!(tag.to_field_values().len(), 1);
}
