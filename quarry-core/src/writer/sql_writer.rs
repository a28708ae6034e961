use crate::{
    EntityDescriptor, FieldDescriptor, ForeignKey, StorageType, Value, separated_by,
    writer::{Context, Fragment},
};

/// Keywords the store reserves, sorted, upper case.
pub const RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS", "ASC",
    "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
    "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT",
    "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP", "EACH",
    "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL",
    "FILTER", "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED", "GLOB",
    "GROUP", "GROUPS", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED",
    "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "KEY",
    "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO", "NOT", "NOTHING",
    "NOTNULL", "NULL", "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER", "OTHERS", "OUTER", "OVER",
    "PARTITION", "PLAN", "PRAGMA", "PRECEDING", "PRIMARY", "QUERY", "RAISE", "RANGE",
    "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE", "RESTRICT",
    "RETURNING", "RIGHT", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SELECT", "SET", "TABLE",
    "TEMP", "TEMPORARY", "THEN", "TIES", "TO", "TRANSACTION", "TRIGGER", "UNBOUNDED", "UNION",
    "UNIQUE", "UPDATE", "USING", "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN", "WHERE",
    "WINDOW", "WITH", "WITHOUT",
];

/// Column name and the value it is compared with or assigned.
pub type ColumnValue<'a> = (&'a str, &'a Value);

/// Dialect printer turning descriptors and column/value pairs into SQL text.
///
/// Values never appear in the text: each one is written as a placeholder and
/// pushed to `params`, in the same order as the placeholders.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Append the `STRICT` table option to `CREATE TABLE`.
    fn strict_tables(&self) -> bool {
        false
    }

    fn is_reserved_word(&self, value: &str) -> bool {
        RESERVED_WORDS
            .binary_search(&value.to_ascii_uppercase().as_str())
            .is_ok()
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Plain identifiers that are not keywords go bare, anything else is quoted.
    fn write_identifier(&self, context: &mut Context, out: &mut String, value: &str) {
        let mut chars = value.chars();
        let plain = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain && !self.is_reserved_word(value) {
            out.push_str(value);
        } else {
            self.write_identifier_quoted(context, out, value);
        }
    }

    fn write_column_type(&self, _context: &mut Context, out: &mut String, value: &StorageType) {
        out.push_str(value.as_str());
    }

    /// Write a positional placeholder and bind `value` to it.
    fn write_placeholder(
        &self,
        _context: &mut Context,
        out: &mut String,
        params: &mut Vec<Value>,
        value: &Value,
    ) {
        out.push('?');
        params.push(value.clone());
    }

    /// `column = ?`, or `column IS NULL` when a NULL is compared.
    fn write_column_value(
        &self,
        context: &mut Context,
        out: &mut String,
        params: &mut Vec<Value>,
        (column, value): ColumnValue,
    ) {
        self.write_identifier(context, out, column);
        if context.fragment.is_condition() && value.is_null() {
            out.push_str(" IS NULL");
        } else {
            out.push_str(" = ");
            self.write_placeholder(context, out, params, value);
        }
    }

    /// Conjunction of the conditions, preceded by ` WHERE `. Writes nothing without conditions.
    fn write_where(
        &self,
        context: &mut Context,
        out: &mut String,
        params: &mut Vec<Value>,
        conditions: &[ColumnValue],
    ) {
        if conditions.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        separated_by(
            out,
            conditions,
            |out, v| self.write_column_value(context, out, params, *v),
            " AND ",
        );
    }

    /// Emit CREATE TABLE with column clauses followed by foreign keys.
    fn write_create_table(&self, out: &mut String, descriptor: &EntityDescriptor) {
        let mut context = Context::new(Fragment::SqlCreateTable);
        out.reserve(64 + descriptor.fields.len() * 48);
        out.push_str("CREATE TABLE ");
        self.write_identifier(&mut context, out, &descriptor.table_name);
        out.push_str(" (\n");
        separated_by(
            out,
            &descriptor.fields,
            |out, v| self.write_create_table_column_fragment(&mut context, out, v),
            ",\n",
        );
        {
            let mut context = context.switch_fragment(Fragment::SqlCreateTableForeignKey);
            for field in &descriptor.fields {
                if let Some(references) = &field.references {
                    out.push_str(",\n");
                    self.write_create_table_foreign_key(
                        &mut context,
                        out,
                        &field.column_name,
                        references,
                    );
                }
            }
        }
        out.push_str("\n)");
        if self.strict_tables() {
            out.push_str(" STRICT");
        }
        out.push(';');
    }

    /// `<column> <TYPE>[ UNIQUE][ NOT NULL][ PRIMARY KEY[ AUTOINCREMENT]]`
    fn write_create_table_column_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        field: &FieldDescriptor,
    ) {
        self.write_identifier(context, out, &field.column_name);
        out.push(' ');
        self.write_column_type(context, out, &field.storage_type);
        if field.unique {
            out.push_str(" UNIQUE");
        }
        if !field.nullable {
            out.push_str(" NOT NULL");
        }
        if field.primary_key {
            out.push_str(" PRIMARY KEY");
            if field.auto_increment {
                out.push_str(" AUTOINCREMENT");
            }
        }
    }

    fn write_create_table_foreign_key(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &str,
        references: &ForeignKey,
    ) {
        out.push_str("FOREIGN KEY(");
        self.write_identifier(context, out, column);
        out.push_str(") REFERENCES ");
        self.write_identifier(context, out, &references.table);
        out.push('(');
        self.write_identifier(context, out, &references.column);
        out.push(')');
    }

    fn write_drop_table(&self, out: &mut String, table: &str, if_exists: bool) {
        let mut context = Context::new(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier(&mut context, out, table);
    }

    /// `INSERT INTO t(a, b) VALUES(?, ?)`, or `DEFAULT VALUES` without columns.
    fn write_insert(
        &self,
        out: &mut String,
        params: &mut Vec<Value>,
        table: &str,
        columns: &[ColumnValue],
    ) {
        let mut context = Context::new(Fragment::SqlInsertInto);
        out.reserve(32 + columns.len() * 24);
        out.push_str("INSERT INTO ");
        self.write_identifier(&mut context, out, table);
        if columns.is_empty() {
            out.push_str(" DEFAULT VALUES");
            return;
        }
        out.push('(');
        separated_by(
            out,
            columns,
            |out, (column, _)| self.write_identifier(&mut context, out, column),
            ", ",
        );
        out.push_str(") VALUES(");
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
            separated_by(
                out,
                columns,
                |out, (_, value)| self.write_placeholder(&mut context, out, params, value),
                ", ",
            );
        }
        out.push(')');
    }

    /// `SELECT * FROM t[ WHERE ...]`
    fn write_select(
        &self,
        out: &mut String,
        params: &mut Vec<Value>,
        table: &str,
        conditions: &[ColumnValue],
    ) {
        let mut context = Context::new(Fragment::SqlSelectFrom);
        out.reserve(32 + conditions.len() * 24);
        out.push_str("SELECT * FROM ");
        self.write_identifier(&mut context, out, table);
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlSelectWhere),
            out,
            params,
            conditions,
        );
    }

    /// `UPDATE t SET a = ?, b = ? WHERE ...`
    fn write_update(
        &self,
        out: &mut String,
        params: &mut Vec<Value>,
        table: &str,
        assignments: &[ColumnValue],
        conditions: &[ColumnValue],
    ) {
        let mut context = Context::new(Fragment::SqlUpdate);
        out.reserve(32 + (assignments.len() + conditions.len()) * 24);
        out.push_str("UPDATE ");
        self.write_identifier(&mut context, out, table);
        out.push_str(" SET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            separated_by(
                out,
                assignments,
                |out, v| self.write_column_value(&mut context, out, params, *v),
                ", ",
            );
        }
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlUpdateWhere),
            out,
            params,
            conditions,
        );
    }

    /// `DELETE FROM t WHERE ...`
    fn write_delete(
        &self,
        out: &mut String,
        params: &mut Vec<Value>,
        table: &str,
        conditions: &[ColumnValue],
    ) {
        let mut context = Context::new(Fragment::SqlDeleteFrom);
        out.reserve(32 + conditions.len() * 24);
        out.push_str("DELETE FROM ");
        self.write_identifier(&mut context, out, table);
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
            out,
            params,
            conditions,
        );
    }
}

/// Dialect neutral writer, tables are created without `STRICT`.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{GenericSqlWriter, RESERVED_WORDS, SqlWriter};
    use crate::{
        Value,
        writer::{Context, Fragment},
    };

    #[test]
    fn reserved_words_are_sorted() {
        assert!(RESERVED_WORDS.windows(2).all(|v| v[0] < v[1]));
    }

    #[test]
    fn identifiers() {
        let writer = GenericSqlWriter::new();
        let mut context = Context::default();
        let mut out = String::new();
        for v in ["price", "_x1", "order", "Select", "two words", "a\"b", "1abc", "ünï"] {
            writer.write_identifier(&mut context, &mut out, v);
            out.push(' ');
        }
        assert_eq!(
            out,
            r#"price _x1 "order" "Select" "two words" "a""b" "1abc" "ünï" "#
        );
    }

    #[test]
    fn null_comparison_depends_on_fragment() {
        let writer = GenericSqlWriter::new();
        let null = Value::Null;
        let (mut out, mut params) = (String::new(), Vec::new());
        let mut context = Context::new(Fragment::SqlUpdateSet);
        writer.write_column_value(&mut context, &mut out, &mut params, ("a", &null));
        out.push(' ');
        let mut condition = context.switch_fragment(Fragment::SqlUpdateWhere);
        writer.write_column_value(&mut condition, &mut out, &mut params, ("a", &null));
        assert_eq!(out, "a = ? a IS NULL");
        assert_eq!(params, [Value::Null]);
        assert_eq!(context.fragment, Fragment::SqlUpdateSet);
    }

    #[test]
    fn statements() {
        let writer = GenericSqlWriter::new();
        let name = Value::from("widget");
        let price = Value::from(9.99);
        let null = Value::Null;

        let (mut out, mut params) = (String::new(), Vec::new());
        writer.write_insert(&mut out, &mut params, "product", &[("name", &name), ("price", &null)]);
        assert_eq!(out, "INSERT INTO product(name, price) VALUES(?, ?)");
        assert_eq!(params, [name.clone(), Value::Null]);

        let (mut out, mut params) = (String::new(), Vec::new());
        writer.write_insert(&mut out, &mut params, "product", &[]);
        assert_eq!(out, "INSERT INTO product DEFAULT VALUES");
        assert!(params.is_empty());

        let (mut out, mut params) = (String::new(), Vec::new());
        writer.write_select(&mut out, &mut params, "product", &[("name", &name), ("id", &null)]);
        assert_eq!(out, "SELECT * FROM product WHERE name = ? AND id IS NULL");
        assert_eq!(params, [name.clone()]);

        let (mut out, mut params) = (String::new(), Vec::new());
        writer.write_update(
            &mut out,
            &mut params,
            "product",
            &[("price", &price), ("name", &null)],
            &[("name", &name), ("id", &null)],
        );
        assert_eq!(
            out,
            "UPDATE product SET price = ?, name = ? WHERE name = ? AND id IS NULL"
        );
        assert_eq!(params, [price.clone(), Value::Null, name.clone()]);

        let (mut out, mut params) = (String::new(), Vec::new());
        writer.write_delete(&mut out, &mut params, "order", &[("id", &null)]);
        assert_eq!(out, r#"DELETE FROM "order" WHERE id IS NULL"#);
        assert!(params.is_empty());

        let mut out = String::new();
        writer.write_drop_table(&mut out, "product", true);
        assert_eq!(out, "DROP TABLE IF EXISTS product");
    }
}
