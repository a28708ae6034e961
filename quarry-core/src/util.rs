use crate::{Error, Result};
use std::{cmp::min, ffi::CString};
use syn::Path;

/// True when the trailing segments of `path` match `expect`, so `Option`,
/// `std::option::Option` and `::std::option::Option` all match `["std", "option", "Option"]`.
pub fn matches_path(path: &Path, expect: &[&str]) -> bool {
    let len = min(path.segments.len(), expect.len());
    path.segments
        .iter()
        .rev()
        .take(len)
        .map(|v| &v.ident)
        .eq(expect.iter().rev().take(len))
}

/// Write `values` into `out` through `f`, putting `separator` between the
/// items that actually wrote something.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

pub fn as_c_string<S: Into<Vec<u8>>>(value: S) -> Result<CString> {
    CString::new(value).map_err(|e| {
        Error::msg(format!(
            "String contains a nul byte at position {}",
            e.nul_position()
        ))
    })
}

/// Formats a possibly long SQL text for logs and error contexts.
#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {{
        let end = $query
            .char_indices()
            .nth(497)
            .map_or($query.len(), |(i, _)| i);
        format!(
            "{}{}\n",
            &$query[..end].trim_end(),
            if end < $query.len() { "..." } else { "" },
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::{matches_path, separated_by};

    #[test]
    fn separator_only_between_written_items() {
        let mut out = String::from("(");
        separated_by(
            &mut out,
            ["a", "", "b", "c"],
            |out, v| out.push_str(v),
            ", ",
        );
        assert_eq!(out, "(a, b, c");
    }

    #[test]
    fn path_suffix_matching() {
        let path: syn::Path = syn::parse_quote!(std::option::Option);
        assert!(matches_path(&path, &["std", "option", "Option"]));
        let path: syn::Path = syn::parse_quote!(Option);
        assert!(matches_path(&path, &["std", "option", "Option"]));
        let path: syn::Path = syn::parse_quote!(my::Option);
        assert!(!matches_path(&path, &["std", "option", "Option"]));
    }
}
