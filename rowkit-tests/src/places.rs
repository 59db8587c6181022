use rowkit::{BindMap, Connection, Database, FailureKind, FieldType, binds};

/// Spatial columns, only engines with geometry support run this.
pub async fn places<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();

    // Setup
    database
        .run("DROP TABLE IF EXISTS places", &none)
        .await
        .expect("Failed to drop the places table");
    database
        .run(
            "CREATE TABLE places (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(40), location POINT)",
            &none,
        )
        .await
        .expect("Failed to create the places table");
    let table = database.register("places").await.expect("Failed to register places");
    assert_eq!(table.field("location").map(|f| f.ty), Some(FieldType::Spatial));

    // Spatial values are SQL expressions written in the statement
    let id = database
        .insert(
            "places",
            &binds! { "name" => "Harbor", "location" => "ST_GeomFromText('POINT(1 2)')" },
        )
        .await
        .expect("Failed to insert the place");
    let query = database.last_query().expect("Missing last query");
    assert!(query.sql.contains("ST_GeomFromText('POINT(1 2)')"));
    assert!(!query.binds.contains("location"));
    database
        .update(
            "places",
            &binds! { "location" => "ST_GeomFromText('POINT(3 4)')" },
            Some("id = :id"),
            &binds! { "id" => id },
        )
        .await
        .expect("Failed to move the place");
    let row = database
        .query_row(
            "SELECT ST_AsText(location) AS wkt FROM places WHERE id = :id",
            &binds! { "id" => id },
        )
        .await
        .expect("Failed to read the location")
        .expect("The place is missing");
    assert_eq!(row.get::<String>("wkt").unwrap(), "POINT(3 4)");

    crate::silent_logs! {
        assert!(
            database
                .insert("places", &binds! { "name" => "Nowhere", "location" => 12 })
                .await
                .is_err()
        );
    }
    assert_eq!(database.last_error().map(|f| f.kind), Some(FailureKind::Usage));
}
