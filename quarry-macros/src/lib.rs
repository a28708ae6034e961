mod decode_column;
mod decode_table;

use decode_column::{ColumnMetadata, decode_column};
use decode_table::decode_table;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Error, Fields, ItemStruct, Result, parse_macro_input};

/// Implements `quarry::Entity` for a struct with named fields.
///
/// ```ignore
/// #[derive(Default, Entity)]
/// #[quarry(name = "product")]
/// struct Product {
///     #[quarry(primary_key, auto_increment)]
///     id: Option<i64>,
///     #[quarry(not_null, unique)]
///     name: String,
///     #[quarry(name = "unit_price", type = "REAL", not_null)]
///     price: f64,
///     #[quarry(references = ("user", "id"))]
///     owner: Option<i64>,
///     #[quarry(skip)]
///     cached: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    entity_impl(&item)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn field_def(column: &ColumnMetadata) -> TokenStream2 {
    let ColumnMetadata {
        name,
        column_name,
        storage_type,
        nullable,
        unique,
        primary_key,
        auto_increment,
        ..
    } = column;
    let references = match &column.references {
        Some((table, column)) => quote!(Some((#table, #column))),
        None => quote!(None),
    };
    quote! {
        ::quarry::FieldDef {
            name: #name,
            column_name: #column_name,
            storage_type: #storage_type,
            nullable: #nullable,
            unique: #unique,
            primary_key: #primary_key,
            auto_increment: #auto_increment,
            references: #references,
        }
    }
}

fn entity_impl(item: &ItemStruct) -> Result<TokenStream2> {
    let Fields::Named(fields) = &item.fields else {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity can only be derived for structs with named fields",
        ));
    };
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let table_name = decode_table(item)?.name;
    let columns = fields
        .named
        .iter()
        .map(decode_column)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|v| !v.skip)
        .collect::<Vec<_>>();
    let len = columns.len();
    let defs = columns.iter().map(field_def);
    let names = columns.iter().map(|v| &v.name).collect::<Vec<_>>();
    let idents = columns.iter().map(|v| &v.ident).collect::<Vec<_>>();
    Ok(quote! {
        impl #impl_generics ::quarry::Entity for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            fn field_defs() -> &'static [::quarry::FieldDef] {
                static FIELDS: [::quarry::FieldDef; #len] = [#(#defs),*];
                &FIELDS
            }

            #[allow(unused_mut)]
            fn values(&self) -> ::quarry::ValueSet {
                let mut values = ::quarry::ValueSet::new();
                #(
                    values.push(
                        #names,
                        ::quarry::AsValue::as_value(::std::clone::Clone::clone(&self.#idents)),
                    );
                )*
                values
            }

            #[allow(unused_variables)]
            fn assign(&mut self, field: &str, value: ::quarry::Value) -> ::quarry::Result<()> {
                match field {
                    #(#names => self.#idents = ::quarry::AsValue::try_from_value(value)?,)*
                    _ => {}
                }
                Ok(())
            }
        }
    })
}
