use crate::{StorageType, matches_path};
use syn::{GenericArgument, PathArguments, Type, TypePath, TypeSlice};

/// Storage type inferred from a Rust field type, used by the derive macro when
/// a field carries no explicit `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDecoded {
    /// `None` when the type has no natural storage class.
    pub storage_type: Option<StorageType>,
}

fn first_generic(path: &syn::Path) -> Option<&Type> {
    let PathArguments::AngleBracketed(arguments) = &path.segments.last()?.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|v| match v {
        GenericArgument::Type(v) => Some(v),
        _ => None,
    })
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(TypePath { path, .. }) if path.is_ident("u8"))
}

fn storage_type_of(ty: &Type) -> Option<StorageType> {
    match ty {
        Type::Path(TypePath { path, .. }) => {
            if let Some(ident) = path.get_ident() {
                let name = ident.to_string();
                match name.as_str() {
                    "bool" | "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" => {
                        return Some(StorageType::Integer);
                    }
                    "f32" | "f64" => return Some(StorageType::Real),
                    "str" => return Some(StorageType::Text),
                    _ => {}
                }
            }
            if matches_path(path, &["std", "string", "String"]) {
                Some(StorageType::Text)
            } else if matches_path(path, &["quarry", "Value"]) {
                Some(StorageType::Any)
            } else if matches_path(path, &["std", "vec", "Vec"]) {
                first_generic(path)
                    .filter(|v| is_u8(v))
                    .map(|_| StorageType::Blob)
            } else if matches_path(path, &["std", "option", "Option"])
                || matches_path(path, &["std", "boxed", "Box"])
            {
                first_generic(path).and_then(storage_type_of)
            } else {
                None
            }
        }
        Type::Slice(TypeSlice { elem, .. }) if is_u8(elem) => Some(StorageType::Blob),
        Type::Group(v) => storage_type_of(&v.elem),
        Type::Paren(v) => storage_type_of(&v.elem),
        _ => None,
    }
}

/// Infer the storage class of a field type. `Option` and `Box` are looked
/// through. Nullability is not inferred, fields are nullable unless declared
/// `not_null`.
pub fn decode_type(ty: &Type) -> TypeDecoded {
    TypeDecoded {
        storage_type: storage_type_of(ty),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_type;
    use crate::StorageType;
    use syn::{Type, parse_quote};

    fn decoded(ty: Type) -> Option<StorageType> {
        decode_type(&ty).storage_type
    }

    #[test]
    fn scalars() {
        assert_eq!(decoded(parse_quote!(i64)), Some(StorageType::Integer));
        assert_eq!(decoded(parse_quote!(bool)), Some(StorageType::Integer));
        assert_eq!(decoded(parse_quote!(f32)), Some(StorageType::Real));
        assert_eq!(decoded(parse_quote!(String)), Some(StorageType::Text));
        assert_eq!(decoded(parse_quote!(Box<str>)), Some(StorageType::Text));
        assert_eq!(decoded(parse_quote!(quarry::Value)), Some(StorageType::Any));
    }

    #[test]
    fn blobs_and_wrappers() {
        assert_eq!(decoded(parse_quote!(Vec<u8>)), Some(StorageType::Blob));
        assert_eq!(decoded(parse_quote!(Box<[u8]>)), Some(StorageType::Blob));
        assert_eq!(
            decoded(parse_quote!(Option<Vec<u8>>)),
            Some(StorageType::Blob)
        );
        assert_eq!(
            decoded(parse_quote!(std::option::Option<i32>)),
            Some(StorageType::Integer)
        );
        assert_eq!(decoded(parse_quote!(Vec<i32>)), None);
        assert_eq!(decoded(parse_quote!(u64)), None);
    }
}
