#[cfg(test)]
mod tests {
    use rowkit_core::{BindMap, Connection, Database, Executor, Query, binds};
    use rowkit_sqlite::SQLiteConnection;
    use rowkit_tests::{init_logs, silent_logs};
    use std::{path::Path, sync::Mutex};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn create_database() {
        init_logs();
        let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join("creation.sqlite");
        let db_path = path.to_str().expect("Non UTF-8 temporary path");
        let _guard = MUTEX.lock().unwrap();
        if path.exists() {
            fs::remove_file(&path)
                .await
                .expect("Failed to remove the test database file");
        }
        SQLiteConnection::connect(&format!("sqlite://{}?mode=rwc", db_path))
            .await
            .expect("Could not open the database");
        assert!(path.exists(), "Database file should be created after connection");
        SQLiteConnection::connect(&format!("sqlite://{}?mode=ro", db_path))
            .await
            .expect("Could not open the database");
        fs::remove_file(&path)
            .await
            .expect("Failed to remove the test database file");
        silent_logs! {
            assert!(
                SQLiteConnection::connect(&format!("sqlite://{}?mode=ro", db_path))
                    .await
                    .is_err(),
                "Read only connection to a missing file must fail"
            );
        }
    }

    #[tokio::test]
    async fn wrong_url() {
        init_logs();
        silent_logs! {
            assert!(SQLiteConnection::connect("postgres://localhost:5432").await.is_err());
            assert!(Database::<SQLiteConnection>::connect("mysql://db/shop").await.is_err());
        }
    }

    #[tokio::test]
    async fn statements() {
        init_logs();
        let mut connection = SQLiteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        connection
            .execute(Query::new("CREATE TABLE t (a INTEGER, b TEXT)"))
            .await
            .expect("Failed to create the table");
        let affected = connection
            .execute(Query::new("INSERT INTO t VALUES (?, ?)").with_binds(binds! { "x" => 1, "y" => "one" }))
            .await
            .expect("Failed to insert with positional parameters");
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, Some(1));
        let affected = connection
            .execute(Query::new("INSERT INTO t VALUES (:a, @b);").with_binds(binds! { "a" => 2, "b" => "two" }))
            .await
            .expect("Failed to insert with named parameters");
        assert_eq!(affected.last_affected_id, Some(2));
        let row = connection
            .fetch_one(Query::new("SELECT b FROM t WHERE a = ?2").with_binds(binds! { "unused" => 0, "a" => 2 }))
            .await
            .expect("Failed to query")
            .expect("Missing row");
        assert_eq!(row.get::<String>("b").unwrap(), "two");

        silent_logs! {
            assert!(
                connection
                    .execute(Query::new("INSERT INTO t VALUES (:a, :b)").with_binds(binds! { "a" => 3 }))
                    .await
                    .is_err(),
                "Missing parameter values must fail"
            );
            assert!(
                connection
                    .execute(Query::new("SELECT 1; SELECT 2").with_binds(BindMap::new()))
                    .await
                    .is_err(),
                "Multiple statements must fail"
            );
            assert!(connection.execute(Query::new("   ")).await.is_err());
        }
    }
}
