use crate::silent_logs;
use rowkit::{BindMap, Connection, Database, FailureKind, Options, binds};
use std::sync::{Arc, Mutex};

pub async fn failures<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();
    let reports = Arc::new(Mutex::new(Vec::<(FailureKind, String)>::new()));
    let sink = reports.clone();
    database.set_error_handler(move |failure: &rowkit::Failure| {
        sink.lock()
            .unwrap()
            .push((failure.kind, failure.to_string()))
    });

    silent_logs! {
        // Rejected by the database
        assert!(database.run("SELEC oops", &none).await.is_err());
        let failure = database.last_error().expect("Missing failure");
        assert_eq!(failure.kind, FailureKind::Statement);
        assert_eq!(failure.sql.as_deref(), Some("SELEC oops"));
        assert_eq!(database.last_query().map(|q| q.sql.as_str()), Some("SELEC oops"));

        let existing = database
            .query_row("SELECT id FROM users", &none)
            .await
            .expect("Failed to read a user")
            .expect("No user left")
            .get::<i64>("id")
            .expect("Failed to decode the id");
        assert!(database.last_error().is_none());
        assert!(
            database
                .insert("users", &binds! { "id" => existing, "name" => "Duplicate" })
                .await
                .is_err()
        );
        assert_eq!(database.last_error().map(|f| f.kind), Some(FailureKind::Statement));

        // Rejected before reaching the database
        assert!(database.delete("users", "   ", &none).await.is_err());
        let failure = database.last_error().expect("Missing failure");
        assert_eq!(failure.kind, FailureKind::Usage);
        assert!(failure.sql.is_none());
        assert!(database.last_query().is_none());

        assert!(
            database
                .update(
                    "users",
                    &binds! { "name" => "Eve" },
                    Some("name = :update_name"),
                    &binds! { "update_name" => "Annie" },
                )
                .await
                .is_err()
        );
        assert_eq!(database.last_error().map(|f| f.kind), Some(FailureKind::Usage));

        assert!(
            database
                .select("missing_table", &binds! { "id" => 1 }, None)
                .await
                .is_err()
        );
        assert_eq!(database.last_error().map(|f| f.kind), Some(FailureKind::Usage));
        assert!(!database.registry().contains("missing_table"));

        database.set_options(Options::strict());
        assert!(
            database
                .insert("users", &binds! { "name" => "Eve", "nickname" => "E" })
                .await
                .is_err()
        );
        let failure = database.last_error().expect("Missing failure");
        assert_eq!(failure.kind, FailureKind::Usage);
        assert!(failure.message().contains("nickname"));
        database.set_options(Options::default());
    }

    let reports = reports.lock().unwrap();
    assert_eq!(
        reports.iter().map(|(kind, _)| *kind).collect::<Vec<_>>(),
        [
            FailureKind::Statement,
            FailureKind::Statement,
            FailureKind::Usage,
            FailureKind::Usage,
            FailureKind::Usage,
            FailureKind::Usage,
        ]
    );
    assert!(reports[0].1.contains("Query: SELEC oops"));
    assert!(reports[0].1.contains("Called from"));
    assert!(reports[1].1.contains(":name = 'Duplicate'"));

    // A successful call clears the last error
    database
        .query("SELECT 1 AS one", &none)
        .await
        .expect("Failed to run a trivial query");
    assert!(database.last_error().is_none());
}
