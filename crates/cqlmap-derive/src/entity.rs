use darling::{Error as DarlingError, FromDeriveInput, FromField, FromMeta, ast::Data};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, ExprLit, ExprUnary, Generics, Ident, Lit, Type, UnOp, ext::IdentExt};

///
/// EntityInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(cql), supports(struct_named))]
struct EntityInput {
    ident: Ident,
    generics: Generics,
    data: Data<(), EntityField>,

    table: String,

    #[darling(default)]
    keyspace: Option<String>,
}

///
/// EntityField
///

#[derive(Debug, FromField)]
#[darling(attributes(cql))]
struct EntityField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    partition_key: Option<PartitionRank>,

    #[darling(default)]
    name: Option<String>,

    #[darling(default)]
    skip: bool,
}

impl EntityField {
    fn validate(&self) -> Result<(), DarlingError> {
        if self.skip && (self.partition_key.is_some() || self.name.is_some()) {
            return Err(DarlingError::custom(
                "a skipped field cannot be a partition key or carry a column name",
            )
            .with_span(&self.ty));
        }

        Ok(())
    }
}

///
/// PartitionRank
/// `partition_key` alone means rank 0; `partition_key = N` sets the rank.
/// Ranks only order the key columns, so negative values are accepted.
///

#[derive(Clone, Copy, Debug)]
struct PartitionRank(i32);

impl FromMeta for PartitionRank {
    fn from_word() -> Result<Self, DarlingError> {
        Ok(Self(0))
    }

    fn from_value(value: &Lit) -> Result<Self, DarlingError> {
        match value {
            Lit::Int(int) => int
                .base10_parse()
                .map(Self)
                .map_err(|err| DarlingError::custom(err).with_span(int)),
            _ => Err(DarlingError::unexpected_lit_type(value)),
        }
    }

    fn from_expr(expr: &Expr) -> Result<Self, DarlingError> {
        match expr {
            Expr::Lit(ExprLit { lit, .. }) => Self::from_value(lit),
            Expr::Group(group) => Self::from_expr(&group.expr),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: operand,
                ..
            }) => match operand.as_ref() {
                Expr::Lit(ExprLit {
                    lit: Lit::Int(int), ..
                }) => format!("-{}", int.base10_digits())
                    .parse()
                    .map(Self)
                    .map_err(|err| DarlingError::custom(err).with_span(int)),
                _ => Err(DarlingError::unexpected_expr_type(expr)),
            },
            _ => Err(DarlingError::unexpected_expr_type(expr)),
        }
    }
}

// derive_entity
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream, DarlingError> {
    let entity = EntityInput::from_derive_input(input)?;
    let Data::Struct(fields) = &entity.data else {
        return Err(
            DarlingError::custom("Entity can only be derived for structs with named fields")
                .with_span(&entity.ident),
        );
    };

    let mut errors = DarlingError::accumulator();
    for field in fields.iter() {
        if let Err(err) = field.validate() {
            errors.push(err);
        }
    }
    errors.finish()?;

    let ident = &entity.ident;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();
    let path = ident.unraw().to_string();
    let table = &entity.table;
    let keyspace = option_str(entity.keyspace.as_deref());

    let stored: Vec<_> = fields.iter().filter(|field| !field.skip).collect();

    let models = stored.iter().map(|field| {
        let name = field_name(field);
        let column = option_str(field.name.as_deref());
        let ty = &field.ty;
        let partition_key = match field.partition_key {
            Some(PartitionRank(rank)) => quote!(Some(#rank)),
            None => quote!(None),
        };

        quote! {
            ::cqlmap::model::FieldModel {
                name: #name,
                column: #column,
                ty: <#ty as ::cqlmap::traits::FieldValue>::FIELD_TYPE,
                partition_key: #partition_key,
            }
        }
    });

    let to_values = stored.iter().map(|field| {
        let field_ident = &field.ident;
        quote!(::cqlmap::traits::FieldValue::to_value(&self.#field_ident))
    });

    let mut index = 0_usize;
    let assignments = fields.iter().map(|field| {
        let field_ident = &field.ident;
        if field.skip {
            quote!(#field_ident: ::core::default::Default::default())
        } else {
            let current = index;
            index += 1;
            quote! {
                #field_ident: ::cqlmap::traits::decode_field(Self::MODEL, #current, values.next())?
            }
        }
    });
    let assignments: Vec<_> = assignments.collect();

    Ok(quote! {
        impl #impl_generics ::cqlmap::traits::EntityKind for #ident #ty_generics #where_clause {
            const MODEL: &'static ::cqlmap::model::EntityModel = &::cqlmap::model::EntityModel {
                path: ::core::concat!(::core::module_path!(), "::", #path),
                table: #table,
                keyspace: #keyspace,
                fields: &[#(#models),*],
            };

            fn to_field_values(&self) -> ::std::vec::Vec<::cqlmap::value::Value> {
                ::std::vec![#(#to_values),*]
            }

            fn from_field_values(
                values: ::std::vec::Vec<::cqlmap::value::Value>,
            ) -> ::core::result::Result<Self, ::cqlmap::codec::CodecError> {
                #[allow(unused_mut, unused_variables)]
                let mut values = values.into_iter();

                ::core::result::Result::Ok(Self {
                    #(#assignments),*
                })
            }
        }
    })
}

fn field_name(field: &EntityField) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default()
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}

///
/// TESTS
///
