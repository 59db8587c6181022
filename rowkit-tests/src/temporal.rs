use crate::dialect;
use rowkit::{BindMap, Connection, Database, FieldType, Value, binds};
use time::{PrimitiveDateTime, macros::datetime};

pub async fn temporal<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();

    // Setup
    database
        .run("DROP TABLE IF EXISTS events", &none)
        .await
        .expect("Failed to drop the events table");
    let create = dialect(
        database,
        "CREATE TABLE events (id INTEGER PRIMARY KEY, title VARCHAR(40), happened DATETIME, amount DECIMAL(10,2))",
        "CREATE TABLE events (id INT AUTO_INCREMENT PRIMARY KEY, title VARCHAR(40), happened DATETIME, amount DECIMAL(10,2))",
    );
    database
        .run(create, &none)
        .await
        .expect("Failed to create the events table");
    let table = database.register("events").await.expect("Failed to register events");
    assert_eq!(table.field("happened").map(|f| f.ty), Some(FieldType::DateTime));
    assert_eq!(table.field("amount").map(|f| f.ty), Some(FieldType::Float));

    // DateTime values are not coerced, they decode through AsValue
    let happened = datetime!(2025-03-14 10:20:30);
    let id = database
        .insert(
            "events",
            &binds! { "title" => "launch", "happened" => happened, "amount" => 12.5 },
        )
        .await
        .expect("Failed to insert the event");
    let row = database
        .find("events", id)
        .await
        .expect("Failed to find the event")
        .expect("The event is missing");
    assert_eq!(row.get::<PrimitiveDateTime>("happened").unwrap(), happened);
    assert_eq!(row.get_column("amount"), Some(&Value::Float64(12.5)));
    let rows = database
        .select("events", &binds! { "happened" => happened }, None)
        .await
        .expect("Failed to select by timestamp");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String>("title").unwrap(), "launch");
}
