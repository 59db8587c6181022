#[cfg(test)]
mod tests {
    use rowkit_core::{
        BindMap, FieldDef, FieldType, GenericSqlWriter, SqlWriter, UsageError, Value,
    };

    fn field(name: &str, ty: FieldType) -> FieldDef {
        FieldDef {
            name: name.into(),
            ty,
            native: String::new(),
            primary_key: false,
        }
    }

    #[test]
    fn identifiers_and_values() {
        let writer = GenericSqlWriter::new();
        let mut out = String::new();
        writer.write_identifier_quoted(&mut out, r#"we"ird"#);
        assert_eq!(out, r#""we""ird""#);
        let mut out = String::new();
        writer.write_value(&mut out, &Value::Varchar("O'Hara".into()));
        assert_eq!(out, "'O''Hara'");
        let mut out = String::new();
        writer.write_value(&mut out, &Value::Boolean(true));
        assert_eq!(out, "true");
    }

    #[test]
    fn insert() {
        let writer = GenericSqlWriter::new();
        let name = field("name", FieldType::String);
        let active = field("active", FieldType::Bool);
        let (ann, one) = (Value::from("Ann"), Value::from(1));
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer
            .write_insert(&mut sql, &mut binds, "users", &[(&name, &ann), (&active, &one)])
            .unwrap();
        assert_eq!(sql, r#"INSERT INTO "users" ("name", "active") VALUES (:name, :active)"#);
        assert_eq!(binds.names().collect::<Vec<_>>(), ["name", "active"]);
        assert_eq!(binds.get(":active"), Some(&Value::Int64(1)));
    }

    #[test]
    fn insert_default_values() {
        let writer = GenericSqlWriter::new();
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer.write_insert(&mut sql, &mut binds, "counters", &[]).unwrap();
        assert_eq!(sql, r#"INSERT INTO "counters" DEFAULT VALUES"#);
        assert!(binds.is_empty());
    }

    #[test]
    fn insert_spatial_inline() {
        let writer = GenericSqlWriter::new();
        let name = field("name", FieldType::String);
        let location = field("location", FieldType::Spatial);
        let point = Value::from("ST_GeomFromText('POINT(1 2)')");
        let shop = Value::from("Shop");
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer
            .write_insert(
                &mut sql,
                &mut binds,
                "places",
                &[(&name, &shop), (&location, &point)],
            )
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "places" ("name", "location") VALUES (:name, ST_GeomFromText('POINT(1 2)'))"#
        );
        assert_eq!(binds.len(), 1);
        assert!(!binds.contains("location"));

        let mut sql = String::new();
        let error = writer
            .write_insert(
                &mut sql,
                &mut BindMap::new(),
                "places",
                &[(&location, &Value::Int64(4))],
            )
            .unwrap_err();
        assert!(error.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn update() {
        let writer = GenericSqlWriter::new();
        let name = field("name", FieldType::String);
        let active = field("active", FieldType::Bool);
        let (bob, zero) = (Value::from("Bob"), Value::from(false));
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer
            .write_update(
                &mut sql,
                &mut binds,
                "users",
                &[(&name, &bob), (&active, &zero)],
                Some("id = :id"),
            )
            .unwrap();
        assert_eq!(
            sql,
            r#"UPDATE "users" SET "name" = :update_name, "active" = :update_active WHERE id = :id"#
        );
        assert_eq!(binds.names().collect::<Vec<_>>(), ["update_name", "update_active"]);

        for condition in [None, Some(""), Some("   ")] {
            let mut sql = String::new();
            writer
                .write_update(&mut sql, &mut BindMap::new(), "users", &[(&name, &bob)], condition)
                .unwrap();
            assert_eq!(sql, r#"UPDATE "users" SET "name" = :update_name"#);
        }

        let error = writer
            .write_update(&mut String::new(), &mut BindMap::new(), "users", &[], None)
            .unwrap_err();
        assert!(error.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn delete() {
        let writer = GenericSqlWriter::new();
        let mut sql = String::new();
        writer.write_delete(&mut sql, "users", "id = :id").unwrap();
        assert_eq!(sql, r#"DELETE FROM "users" WHERE id = :id"#);
        let error = writer
            .write_delete(&mut String::new(), "users", " ")
            .unwrap_err();
        assert!(error.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn select() {
        let writer = GenericSqlWriter::new();
        let name = field("name", FieldType::String);
        let email = field("email", FieldType::String);
        let (ann, null) = (Value::from("Ann"), Value::Null);
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer
            .write_select(
                &mut sql,
                &mut binds,
                "users",
                &[(&name, &ann), (&email, &null)],
                Some(10),
            )
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT * FROM "users" WHERE "name" = :name AND "email" IS NULL LIMIT 10"#
        );
        assert_eq!(binds.names().collect::<Vec<_>>(), ["name"]);

        let mut sql = String::new();
        writer
            .write_select(&mut sql, &mut BindMap::new(), "users", &[], None)
            .unwrap();
        assert_eq!(sql, r#"SELECT * FROM "users""#);
    }
}
