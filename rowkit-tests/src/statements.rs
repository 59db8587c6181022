use crate::dialect;
use rowkit::{BindMap, Connection, Database, Outcome, Value, binds};

pub async fn statements<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();

    // Setup
    database
        .run("DROP TABLE IF EXISTS notes", &none)
        .await
        .expect("Failed to drop the notes table");
    let create = dialect(
        database,
        "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT, stars INT DEFAULT 0)",
        "CREATE TABLE notes (id BIGINT AUTO_INCREMENT PRIMARY KEY, body TEXT, stars INT DEFAULT 0)",
    );
    database
        .run(create, &none)
        .await
        .expect("Failed to create the notes table");

    // Full statements passed through
    let first = database
        .insert(
            "INSERT INTO notes (body, stars) VALUES (:body, :stars)",
            &binds! { "body" => "first", "stars" => 3 },
        )
        .await
        .expect("Failed to insert through a statement");
    assert!(first > 0);
    assert_eq!(
        database.last_query().unwrap().sql,
        "INSERT INTO notes (body, stars) VALUES (:body, :stars)"
    );
    let second = database
        .insert("notes", &BindMap::new())
        .await
        .expect("Failed to insert the default values");
    assert!(second > first);
    let affected = database
        .update(
            "  update notes SET stars = stars + :extra WHERE id = :id",
            &binds! { "extra" => 2 },
            None,
            &binds! { "id" => first },
        )
        .await
        .expect("Failed to update through a statement");
    assert_eq!(affected, 1);
    let row = database
        .query_row("SELECT stars FROM notes WHERE id = :id", &binds! { "id" => first })
        .await
        .expect("Failed to read the stars")
        .expect("Missing note");
    assert_eq!(row.get::<i64>("stars").unwrap(), 5);

    // Update without condition touches every row
    let affected = database
        .update("notes", &binds! { "body" => "same" }, None, &none)
        .await
        .expect("Failed to update every note");
    assert_eq!(affected, 2);

    // Run, shaped by the statement kind
    let outcome = database
        .run(
            "INSERT INTO notes (body) VALUES (:body)",
            &binds! { "body" => "third" },
        )
        .await
        .expect("Failed to run an insert");
    let Outcome::Inserted(third) = outcome else {
        panic!("Expected an inserted identity, found {:?}", outcome);
    };
    assert!(third > second);
    assert_eq!(
        database
            .run("UPDATE notes SET stars = 1 WHERE stars = 0", &none)
            .await,
        Ok(Outcome::Affected(2))
    );
    let Ok(Outcome::Rows(rows)) = database
        .run("SELECT id, body FROM notes ORDER BY id", &none)
        .await
    else {
        panic!("Expected rows");
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].get::<String>("body").unwrap(), "third");
    assert_eq!(rows[0].names(), ["id", "body"]);

    let rows = database
        .query(
            "SELECT body FROM notes WHERE stars >= :min ORDER BY id",
            &binds! { ":min" => 1 },
        )
        .await
        .expect("Failed to query the notes");
    assert_eq!(rows.len(), 3);
    assert_eq!(
        database
            .query_row("SELECT * FROM notes WHERE id = :id", &binds! { "id" => -1 })
            .await,
        Ok(None)
    );

    // Delete passed through, keyword case and leading whitespace do not matter
    let affected = database
        .delete(
            "\n  DeLeTe FROM notes WHERE id = :id",
            "",
            &binds! { "id" => second },
        )
        .await
        .expect("Failed to delete through a statement");
    assert_eq!(affected, 1);
    let affected = database
        .delete("notes", "id > :id", &binds! { "id" => Value::Int64(0) })
        .await
        .expect("Failed to delete the notes");
    assert_eq!(affected, 2);
}
