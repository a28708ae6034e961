#[cfg(test)]
mod tests {
    use quarry::{Connection, Executor, MappingError, QueryResult, Statement, Value};
    use quarry_sqlite::SqliteConnection;
    use quarry_tests::{init_logs, silent_logs};
    use std::{
        fs,
        path::Path,
        sync::Mutex,
        time::{Duration, Instant},
    };

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH)).is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").is_err());
        }
    }

    #[test]
    fn in_memory_rows() {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        let results = connection
            .run(Statement::new(
                "SELECT ? AS a, ? AS b, ? AS c, ? AS d, ? AS e",
                vec![
                    7.into(),
                    2.5.into(),
                    "text".into(),
                    vec![1u8, 2, 3].into(),
                    Value::Null,
                ],
            ))
            .expect("Failed to run the query")
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to read the rows");
        let [QueryResult::Row(row)] = results.as_slice() else {
            panic!("Expected exactly one row, got {:?}", results);
        };
        assert_eq!(row.names(), ["a", "b", "c", "d", "e"]);
        assert_eq!(
            row.values(),
            [
                Value::Integer(7),
                Value::Real(2.5),
                Value::Text("text".into()),
                Value::Blob(Box::new([1, 2, 3])),
                Value::Null,
            ]
        );
    }

    #[test]
    fn empty_blob_and_unicode() {
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        let row = connection
            .fetch(Statement::new(
                "SELECT ? AS empty, ? AS word",
                vec![Vec::<u8>::new().into(), "gestão ✓".into()],
            ))
            .expect("Failed to run the query")
            .next()
            .expect("Expected a row")
            .expect("Failed to read the row");
        assert_eq!(row.get_column("empty"), Some(&Value::Blob(Box::new([]))));
        assert_eq!(row.get_column("word"), Some(&Value::Text("gestão ✓".into())));
    }

    #[test]
    fn one_statement_at_a_time() {
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        silent_logs! {
            assert!(connection.execute("SELECT 1; SELECT 2;".into()).is_err());
            assert!(connection.execute("   ".into()).is_err());
            assert!(connection.execute(Statement::new("SELECT ?", vec![])).is_err());
        }
        connection
            .execute("SELECT 1;  \n".into())
            .expect("A trailing semicolon is fine");
    }

    #[test]
    fn store_errors_carry_the_code() {
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection
            .execute("CREATE TABLE tag (label TEXT UNIQUE)".into())
            .expect("Failed to create the table");
        let affected = connection
            .execute(Statement::new(
                "INSERT INTO tag(label) VALUES(?)",
                vec!["red".into()],
            ))
            .expect("Failed to insert");
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, Some(1));
        let error = silent_logs! {
            connection
                .execute(Statement::new(
                    "INSERT INTO tag(label) VALUES(?)",
                    vec!["red".into()],
                ))
                .unwrap_err()
        };
        assert!(matches!(
            MappingError::of(&error),
            Some(MappingError::Store { code: 19, .. })
        ));
        let error = silent_logs! {
            connection.execute("SELEC 1".into()).unwrap_err()
        };
        assert!(matches!(
            MappingError::of(&error),
            Some(MappingError::Store { code: 1, .. })
        ));
    }

    #[test]
    fn ddl_reports_no_change() {
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection
            .execute("CREATE TABLE item (name TEXT)".into())
            .expect("Failed to create the table");
        connection
            .execute(Statement::new(
                "INSERT INTO item(name) VALUES(?)",
                vec!["a".into()],
            ))
            .expect("Failed to insert");
        let affected = connection
            .execute("CREATE TABLE other (name TEXT)".into())
            .expect("Failed to create the table");
        assert_eq!(affected.rows_affected, 0);
        assert_eq!(affected.last_affected_id, None);
        let affected = connection
            .execute("UPDATE item SET name = 'b'".into())
            .expect("Failed to update");
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, None);
    }

    #[test]
    fn locked_database_fails_after_the_busy_timeout() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/locked.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        let url = format!("sqlite://{}?mode=rwc", DB_PATH);
        let mut holder = SqliteConnection::connect(&url).expect("Could not open the database");
        holder
            .execute("CREATE TABLE counter (value INTEGER)".into())
            .expect("Failed to create the table");
        holder
            .execute("BEGIN IMMEDIATE".into())
            .expect("Failed to take the write lock");

        let mut waiter = SqliteConnection::connect(&url).expect("Could not open the database");
        waiter
            .set_busy_timeout(Duration::from_millis(200))
            .expect("Failed to set the busy timeout");
        let start = Instant::now();
        let error = silent_logs! {
            waiter
                .execute("INSERT INTO counter(value) VALUES (1)".into())
                .unwrap_err()
        };
        let elapsed = start.elapsed();
        assert!(
            matches!(
                MappingError::of(&error),
                Some(MappingError::Store { code: 5, .. })
            ),
            "Expected SQLITE_BUSY, got {:#}",
            error
        );
        assert!(elapsed >= Duration::from_millis(150), "Gave up after {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "Waited {:?}", elapsed);

        holder
            .execute("COMMIT".into())
            .expect("Failed to release the write lock");
        let affected = waiter
            .execute("INSERT INTO counter(value) VALUES (1)".into())
            .expect("The lock is free again");
        assert_eq!(affected.rows_affected, 1);
    }
}
