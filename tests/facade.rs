#[cfg(test)]
mod tests {
    use rowkit::{
        BindMap, ConnectionConfig, FieldDef, FieldType, GenericSqlWriter, Options, SqlWriter,
        StatementKind, TableDef, UnknownFields, Value,
    };
    use time::macros::datetime;

    fn users() -> TableDef {
        TableDef::new(
            "users",
            [
                ("id", FieldType::Int, "INT(11)", true),
                ("name", FieldType::String, "VARCHAR(20)", false),
                ("active", FieldType::Bool, "TINYINT(1)", false),
                ("seen", FieldType::DateTime, "DATETIME", false),
            ]
            .into_iter()
            .map(|(name, ty, native, primary_key)| FieldDef {
                name: name.into(),
                ty,
                native: native.into(),
                primary_key,
            }),
        )
    }

    #[test]
    fn build_statements() {
        let users = users();
        let fields = BindMap::new()
            .with("name", "Ann")
            .with("active", true)
            .with("seen", datetime!(2025-01-02 03:04:05))
            .with("nickname", "annie");
        let resolved = users
            .resolve(&fields, Options::default().unknown_fields)
            .expect("Unknown fields are skipped by default");
        assert_eq!(resolved.len(), 3);

        let writer = GenericSqlWriter::new();
        let mut sql = String::new();
        let mut binds = BindMap::new();
        writer
            .write_insert(&mut sql, &mut binds, &users.name, &resolved)
            .expect("Insert statement");
        assert_eq!(
            sql,
            r#"INSERT INTO "users" ("name", "active", "seen") VALUES (:name, :active, :seen)"#
        );
        assert_eq!(StatementKind::detect(&sql), StatementKind::Insert);
        assert_eq!(binds.len(), 3);
        assert_eq!(
            binds.get(":seen").and_then(Value::temporal_text).as_deref(),
            Some("2025-01-02 03:04:05")
        );

        assert!(
            users
                .resolve(&fields, Options::strict().unknown_fields)
                .is_err()
        );
        assert_eq!(Options::strict().unknown_fields, UnknownFields::Reject);
    }

    #[test]
    fn coerce_values() {
        let users = users();
        assert_eq!(users.primary_key.as_deref(), Some("id"));
        assert_eq!(
            FieldType::Bool.coerce(Value::Int64(1)).ok(),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            FieldType::Int.coerce(Value::Varchar("42".into())).ok(),
            Some(Value::Int64(42))
        );
        assert_eq!(FieldType::Float.coerce(Value::Null).ok(), Some(Value::Null));
    }

    #[test]
    fn connection_urls() {
        assert_eq!(
            ConnectionConfig::new("sqlite", ":memory:").url().ok().as_deref(),
            Some("sqlite://:memory:")
        );
        assert_eq!(
            ConnectionConfig::new("mysql", "rowkit")
                .host("localhost")
                .port(3306)
                .url()
                .ok()
                .as_deref(),
            Some("mysql://localhost:3306/rowkit")
        );
    }
}
