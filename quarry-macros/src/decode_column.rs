use quarry_core::decode_type;
use quote::ToTokens;
use syn::{Error, Field, Ident, LitStr, Result, Token, ext::IdentExt, parenthesized};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) column_name: String,
    pub(crate) storage_type: String,
    pub(crate) nullable: bool,
    pub(crate) unique: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) references: Option<(String, String)>,
    pub(crate) skip: bool,
}

/// Read the `#[quarry(...)]` attributes of a field. The storage type is
/// inferred from the Rust type when not declared; declared types are passed
/// through as written and validated when the descriptor is resolved.
pub(crate) fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "Entity fields must be named"));
    };
    let name = ident.unraw().to_string();
    let mut storage_type = None;
    let mut metadata = ColumnMetadata {
        ident,
        column_name: name.clone(),
        name,
        storage_type: String::new(),
        nullable: true,
        unique: false,
        primary_key: false,
        auto_increment: false,
        references: None,
        skip: false,
    };
    for attr in field.attrs.iter().filter(|v| v.path().is_ident("quarry")) {
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                metadata.column_name = arg.value()?.parse::<LitStr>()?.value();
            } else if arg.path.is_ident("type") {
                storage_type = Some(arg.value()?.parse::<LitStr>()?.value());
            } else if arg.path.is_ident("primary_key") {
                metadata.primary_key = true;
            } else if arg.path.is_ident("auto_increment") {
                metadata.auto_increment = true;
            } else if arg.path.is_ident("unique") {
                metadata.unique = true;
            } else if arg.path.is_ident("not_null") {
                metadata.nullable = false;
            } else if arg.path.is_ident("skip") {
                metadata.skip = true;
            } else if arg.path.is_ident("references") {
                let value = arg.value()?;
                let content;
                parenthesized!(content in value);
                let table = content.parse::<LitStr>()?.value();
                content.parse::<Token![,]>()?;
                let column = content.parse::<LitStr>()?.value();
                metadata.references = Some((table, column));
            } else {
                return Err(arg.error(format!(
                    "unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                )));
            }
            Ok(())
        })?;
    }
    if metadata.skip {
        return Ok(metadata);
    }
    metadata.storage_type = match storage_type {
        Some(v) => v,
        None => decode_type(&field.ty)
            .storage_type
            .map(|v| v.as_str().to_string())
            .ok_or_else(|| {
                Error::new_spanned(
                    &field.ty,
                    format!(
                        "cannot infer the storage type of `{}`, declare it like: `#[quarry(type = \"BLOB\")]`",
                        field.ty.to_token_stream()
                    ),
                )
            })?,
    };
    Ok(metadata)
}
