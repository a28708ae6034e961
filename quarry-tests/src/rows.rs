use crate::silent_logs;
use quarry::{Executor, MappingError, Value, ValueSet, primary_key};

pub fn rows<E: Executor>(executor: &mut E) {
    executor
        .execute("DROP TABLE IF EXISTS setting".into())
        .expect("Failed to drop setting");
    executor
        .execute("CREATE TABLE setting (name TEXT, content)".into())
        .expect("Failed to create setting");

    // Insert
    let result = executor
        .insert_row(
            "setting",
            &ValueSet::new().with("name", "theme").with("content", "dark"),
        )
        .expect("Failed to insert theme");
    assert_eq!(result.rows_affected, 1);
    assert_eq!(result.last_affected_id, Some(1));
    executor
        .insert_row(
            "setting",
            &ValueSet::new().with("name", "size").with("content", 12),
        )
        .expect("Failed to insert size");
    let result = executor
        .insert_row("setting", &ValueSet::new())
        .expect("Failed to insert a default row");
    assert_eq!(result.rows_affected, 1);

    // Find
    let rows = executor
        .find_rows("setting", &ValueSet::new())
        .expect("Failed to find the settings");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].names(), ["name", "content"]);
    assert_eq!(rows[1].values(), [Value::Text("size".into()), Value::Integer(12)]);
    assert_eq!(rows[2].values(), [Value::Null, Value::Null]);
    let theme = executor
        .find_one_row("setting", &ValueSet::new().with("name", "theme"))
        .expect("Failed to find theme")
        .expect("Theme exists");
    assert_eq!(theme.get_column("content"), Some(&Value::Text("dark".into())));
    let error = silent_logs! {
        executor.find_one_row("setting", &ValueSet::new()).unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::MultipleRows { .. })
    ));
    let by_rowid = executor
        .find_rows("setting", &ValueSet::new().with("rowid", 2))
        .expect("Failed to find by rowid");
    assert_eq!(by_rowid.len(), 1);
    assert_eq!(by_rowid[0].get_column("name"), Some(&Value::Text("size".into())));

    // Update
    let result = executor
        .update_rows(
            "setting",
            &ValueSet::new().with("content", "light"),
            &ValueSet::new().with("name", "theme"),
        )
        .expect("Failed to update theme");
    assert_eq!(result.rows_affected, 1);
    let error = silent_logs! {
        executor
            .update_rows("setting", &ValueSet::new().with("content", 1), &ValueSet::new())
            .unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::EmptyCondition { .. })
    ));

    // Delete
    let error = silent_logs! {
        executor.delete_rows("setting", &ValueSet::new()).unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::EmptyCondition { .. })
    ));
    let result = executor
        .delete_rows("setting", &ValueSet::new().with("name", Value::Null))
        .expect("Failed to delete the default row");
    assert_eq!(result.rows_affected, 1);
    let rows = executor
        .find_rows("setting", &ValueSet::new())
        .expect("Failed to find the settings");
    assert_eq!(rows.len(), 2);

    // No declared key, rows are identified by rowid
    assert_eq!(
        primary_key(executor, "setting", None).expect("Failed to resolve the primary key"),
        "rowid"
    );
}
