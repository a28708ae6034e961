use indoc::indoc;
use quarry::{ColumnInfo, Entity, Executor, primary_key, scaffold::entity_source};

pub fn introspection<E: Executor>(executor: &mut E) {
    let tables = executor.list_tables().expect("Failed to list the tables");
    for table in ["product", "user", "role", "gadget", "setting"] {
        assert!(
            tables.iter().any(|v| v == table),
            "Table `{}` is missing from {:?}",
            table,
            tables
        );
    }
    assert!(!tables.iter().any(|v| v.starts_with("sqlite_")));

    let columns = executor
        .list_columns("role")
        .expect("Failed to list the columns of role");
    assert_eq!(
        columns,
        [
            ColumnInfo {
                id: 0,
                name: "id".into(),
                column_type: "INTEGER".into(),
                nullable: true,
                primary_key: true,
            },
            ColumnInfo {
                id: 1,
                name: "user".into(),
                column_type: "INTEGER".into(),
                nullable: false,
                primary_key: false,
            },
            ColumnInfo {
                id: 2,
                name: "name".into(),
                column_type: "TEXT".into(),
                nullable: false,
                primary_key: false,
            },
        ]
    );
    assert_eq!(
        entity_source("role", &columns),
        indoc! {r#"
            #[derive(Debug, Default, Clone, PartialEq, Entity)]
            #[quarry(name = "role")]
            pub struct Role {
                #[quarry(primary_key)]
                pub id: Option<i64>,
                #[quarry(not_null)]
                pub user: i64,
                #[quarry(not_null)]
                pub name: String,
            }
        "#}
    );
    let columns = executor
        .list_columns("setting")
        .expect("Failed to list the columns of setting");
    assert_eq!(
        entity_source("setting", &columns),
        indoc! {r#"
            #[derive(Debug, Default, Clone, PartialEq, Entity)]
            #[quarry(name = "setting")]
            pub struct Setting {
                pub name: Option<String>,
                #[quarry(type = "ANY")]
                pub content: Value,
            }
        "#}
    );
    assert!(
        executor
            .list_columns("missing_table")
            .expect("Failed to list the columns of a missing table")
            .is_empty()
    );

    // Primary keys
    assert_eq!(
        executor
            .introspect_primary_key("gadget")
            .expect("Failed to introspect gadget"),
        Some("code".into())
    );
    assert_eq!(
        executor
            .introspect_primary_key("setting")
            .expect("Failed to introspect setting"),
        None
    );
    assert_eq!(
        primary_key(executor, "user", None).expect("Failed to resolve the key of user"),
        "id"
    );
    let descriptor = crate::membership::Role::descriptor().expect("Role is well formed");
    assert_eq!(
        primary_key(executor, "role", Some(descriptor)).expect("Failed to resolve the key of role"),
        "id"
    );
}
