use proc_macro::TokenStream;

mod entity;

/// Derive `EntityKind` for a struct with named fields.
///
/// ```ignore
/// #[derive(Entity)]
/// #[cql(table = "users", keyspace = "app")]
/// struct User {
///     #[cql(partition_key)]
///     email: String,
///     #[cql(name = "display_name")]
///     name: String,
///     #[cql(skip)]
///     cached: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(cql))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
