//! Rust source generation for existing tables.

use crate::ColumnInfo;
use convert_case::{Case, Casing};
use std::fmt::Write;

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "try", "type", "unsafe", "use", "where", "while", "yield",
];

/// Rust field type for a declared column type, `None` when it maps to `Value`.
fn rust_type(column_type: &str) -> Option<&'static str> {
    match column_type.trim().to_ascii_uppercase().as_str() {
        "TEXT" => Some("String"),
        "INTEGER" | "INT" => Some("i64"),
        "REAL" => Some("f64"),
        "BLOB" => Some("Vec<u8>"),
        _ => None,
    }
}

fn field_name(column: &str) -> String {
    let name = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_case(Case::Snake);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Source of a `#[derive(Entity)]` struct mapping `table` with the given columns.
pub fn entity_source(table: &str, columns: &[ColumnInfo]) -> String {
    let mut out = String::with_capacity(128 + columns.len() * 64);
    let struct_name = field_name(table).to_case(Case::Pascal);
    let _ = writeln!(out, "#[derive(Debug, Default, Clone, PartialEq, Entity)]");
    let _ = writeln!(out, "#[quarry(name = {:?})]", table);
    let _ = writeln!(out, "pub struct {} {{", struct_name);
    for column in columns {
        let name = field_name(&column.name);
        let ty = rust_type(&column.column_type);
        let mut attributes = Vec::new();
        if name != column.name {
            attributes.push(format!("name = {:?}", column.name));
        }
        if ty.is_none() {
            attributes.push("type = \"ANY\"".into());
        }
        if column.primary_key {
            attributes.push("primary_key".into());
        }
        if !column.nullable {
            attributes.push("not_null".into());
        }
        if !attributes.is_empty() {
            let _ = writeln!(out, "    #[quarry({})]", attributes.join(", "));
        }
        let ty = match ty {
            Some(ty) if column.nullable => format!("Option<{}>", ty),
            Some(ty) => ty.into(),
            None => "Value".into(),
        };
        let _ = writeln!(out, "    pub {}: {},", name, ty);
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::entity_source;
    use crate::ColumnInfo;
    use indoc::indoc;

    fn column(id: i64, name: &str, column_type: &str, nullable: bool, pk: bool) -> ColumnInfo {
        ColumnInfo {
            id,
            name: name.into(),
            column_type: column_type.into(),
            nullable,
            primary_key: pk,
        }
    }

    #[test]
    fn renders_struct() {
        let source = entity_source(
            "order_line",
            &[
                column(0, "id", "INTEGER", true, true),
                column(1, "Product Name", "TEXT", false, false),
                column(2, "type", "int", false, false),
                column(3, "weight", "REAL", true, false),
                column(4, "picture", "BLOB", true, false),
                column(5, "extra", "", true, false),
            ],
        );
        assert_eq!(
            source,
            indoc! {r#"
                #[derive(Debug, Default, Clone, PartialEq, Entity)]
                #[quarry(name = "order_line")]
                pub struct OrderLine {
                    #[quarry(primary_key)]
                    pub id: Option<i64>,
                    #[quarry(name = "Product Name", not_null)]
                    pub product_name: String,
                    #[quarry(name = "type", not_null)]
                    pub type_: i64,
                    pub weight: Option<f64>,
                    pub picture: Option<Vec<u8>>,
                    #[quarry(type = "ANY")]
                    pub extra: Value,
                }
            "#}
        );
    }
}
