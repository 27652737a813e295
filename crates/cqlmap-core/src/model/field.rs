///
/// FieldModel
/// Runtime field metadata for one persisted field.
///

#[derive(Debug)]
pub struct FieldModel {
    /// Rust field name.
    pub name: &'static str,
    /// Stored column name override.
    pub column: Option<&'static str>,
    pub ty: FieldType,
    /// Partition-key rank; `None` for regular columns.
    pub partition_key: Option<i32>,
}

impl FieldModel {
    /// Stored column name: the override if present, else the field name.
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        self.column.unwrap_or(self.name)
    }
}

///
/// FieldType
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldType {
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldType {
    #[must_use]
    pub const fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    #[must_use]
    pub const fn nullable(self) -> Self {
        Self {
            kind: self.kind,
            nullable: true,
        }
    }
}

///
/// FieldKind
///
/// Closed set of semantic field kinds the codec can store.
/// `Unsupported` is a marker for field types with no column mapping; it is
/// rejected when a repository is constructed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    BigInt,
    Boolean,
    Double,
    Float,
    Int,
    Text,
    Timestamp,
    TimestampTz,
    Uuid,
    Unsupported(&'static str),
}

impl FieldKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BigInt => "BigInt",
            Self::Boolean => "Boolean",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::Int => "Int",
            Self::Text => "Text",
            Self::Timestamp => "Timestamp",
            Self::TimestampTz => "TimestampTz",
            Self::Uuid => "Uuid",
            Self::Unsupported(type_name) => type_name,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
