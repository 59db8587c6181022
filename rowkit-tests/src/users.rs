use crate::dialect;
use rowkit::{BindMap, Connection, Database, FieldType, Value, binds};

pub async fn users<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();

    // Setup
    database
        .run("DROP TABLE IF EXISTS users", &none)
        .await
        .expect("Failed to drop the users table");
    let create = dialect(
        database,
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(20), active TINYINT)",
        "CREATE TABLE users (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(20), active TINYINT)",
    );
    database
        .run(create, &none)
        .await
        .expect("Failed to create the users table");

    // Registration
    let table = database.register("users").await.expect("Failed to register users");
    assert_eq!(table.primary_key.as_deref(), Some("id"));
    assert_eq!(
        table.fields.keys().collect::<Vec<_>>(),
        ["id", "name", "active"]
    );
    assert_eq!(table.field("id").map(|f| f.ty), Some(FieldType::Int));
    assert_eq!(table.field("name").map(|f| f.ty), Some(FieldType::String));
    assert_eq!(table.field("active").map(|f| f.ty), Some(FieldType::Bool));

    // Insert
    let ann = database
        .insert("users", &binds! { "name" => "Ann", "active" => 1 })
        .await
        .expect("Failed to insert Ann");
    assert!(ann > 0);
    let query = database.last_query().expect("Missing last query");
    assert_eq!(query.binds.names().collect::<Vec<_>>(), ["name", "active"]);
    let bob = database
        .insert(
            "users",
            &binds! { "name" => "Bob", "active" => false, "nickname" => "B" },
        )
        .await
        .expect("Failed to insert Bob");
    assert_ne!(ann, bob);
    assert!(!database.last_query().unwrap().binds.contains("nickname"));

    // Find
    let row = database
        .find("users", ann)
        .await
        .expect("Failed to find Ann")
        .expect("Ann is missing");
    assert_eq!(row.get_column("id"), Some(&Value::Int64(ann)));
    assert_eq!(row.get_column("name"), Some(&Value::Varchar("Ann".into())));
    assert_eq!(row.get_column("active"), Some(&Value::Boolean(true)));
    let row = database
        .find("users", bob)
        .await
        .expect("Failed to find Bob")
        .expect("Bob is missing");
    assert_eq!(row.get::<bool>("active").unwrap(), false);
    assert_eq!(database.find("users", 9999).await, Ok(None));

    // Update
    let affected = database
        .update(
            "users",
            &binds! { "name" => "Annie" },
            Some("id = :id"),
            &binds! { "id" => ann },
        )
        .await
        .expect("Failed to update Ann");
    assert_eq!(affected, 1);
    let affected = database
        .update(
            "users",
            &binds! { "active" => true },
            Some("active = :active"),
            &binds! { "active" => false },
        )
        .await
        .expect("Failed to update the inactive users");
    assert_eq!(affected, 1, "Only Bob was inactive");

    // Select
    let rows = database
        .select("users", &binds! { "active" => true }, None)
        .await
        .expect("Failed to select the active users");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.get_column("active") == Some(&Value::Boolean(true))));
    let rows = database
        .select("users", &binds! { "name" => "Annie" }, Some(1))
        .await
        .expect("Failed to select Annie");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<i64>("id").unwrap(), ann);
    let rows = database
        .select("users", &binds! { "name" => Value::Null }, None)
        .await
        .expect("Failed to select the users without a name");
    assert!(rows.is_empty());

    // Delete
    let affected = database
        .delete("users", "id = :id", &binds! { "id" => bob })
        .await
        .expect("Failed to delete Bob");
    assert_eq!(affected, 1);
    assert_eq!(database.find("users", bob).await, Ok(None));
}
