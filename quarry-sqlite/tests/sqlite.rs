#[cfg(test)]
mod tests {
    use quarry::Driver;
    use quarry_sqlite::SqliteDriver;
    use quarry_tests::{execute_tests, init_logs};
    use std::{fs, path::Path, sync::Mutex};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn sqlite() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/tests.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH).expect(
                format!("Failed to remove existing test database file {}", DB_PATH).as_str(),
            );
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        let driver = SqliteDriver::get_instance();
        let connection = driver
            .connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        execute_tests(connection);
    }

    #[test]
    fn sqlite_in_memory() {
        init_logs();
        let connection = SqliteDriver::get_instance()
            .connect("sqlite://:memory:")
            .expect("Could not open the database");
        execute_tests(connection);
    }
}
