#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use rowkit_core::{
        FieldDef, FieldType, RowLabeled, TableDef, UnknownFields, UsageError, Value, binds,
    };
    use std::sync::Arc;
    use time::macros::datetime;

    const TYPES: &[(&str, FieldType)] = &[
        ("int", FieldType::Int),
        ("tinyint", FieldType::Bool),
        ("double", FieldType::Float),
        ("datetime", FieldType::DateTime),
        ("point", FieldType::Spatial),
    ];

    fn field(name: &str, ty: FieldType, primary_key: bool) -> FieldDef {
        FieldDef {
            name: name.into(),
            ty,
            native: ty.to_string(),
            primary_key,
        }
    }

    fn users() -> TableDef {
        TableDef::new(
            "users",
            [
                field("id", FieldType::Int, true),
                field("name", FieldType::String, false),
                field("active", FieldType::Bool, false),
                field("created", FieldType::DateTime, false),
            ],
        )
    }

    #[test]
    fn classify() {
        assert_eq!(FieldType::normalize_native(" VARCHAR(20)"), "varchar");
        assert_eq!(FieldType::normalize_native("int(11) unsigned"), "int");
        assert_eq!(FieldType::classify("TINYINT(1)", TYPES), FieldType::Bool);
        assert_eq!(FieldType::classify("INT", TYPES), FieldType::Int);
        assert_eq!(FieldType::classify("point", TYPES), FieldType::Spatial);
        assert_eq!(FieldType::classify("jsonb", TYPES), FieldType::String);
        assert_eq!(FieldType::classify("", TYPES), FieldType::String);
    }

    #[test]
    fn coerce_null() {
        for ty in [
            FieldType::String,
            FieldType::Int,
            FieldType::Bool,
            FieldType::Float,
            FieldType::DateTime,
            FieldType::Spatial,
        ] {
            assert_eq!(ty.coerce(Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn coerce_string() {
        let ty = FieldType::String;
        assert_eq!(ty.coerce(Value::Int64(5)).unwrap(), Value::Varchar("5".into()));
        assert_eq!(ty.coerce(Value::Boolean(true)).unwrap(), Value::Varchar("true".into()));
        assert_eq!(
            ty.coerce(Value::Blob(b"Ann"[..].into())).unwrap(),
            Value::Varchar("Ann".into())
        );
        assert!(ty.coerce(Value::Blob([0xc3, 0x28][..].into())).is_err());
    }

    #[test]
    fn coerce_int() {
        let ty = FieldType::Int;
        assert_eq!(ty.coerce(Value::UInt64(7)).unwrap(), Value::Int64(7));
        assert_eq!(ty.coerce(Value::Boolean(true)).unwrap(), Value::Int64(1));
        assert_eq!(ty.coerce(Value::Float64(3.0)).unwrap(), Value::Int64(3));
        assert_eq!(ty.coerce(Value::Varchar(" -12 ".into())).unwrap(), Value::Int64(-12));
        assert!(ty.coerce(Value::Float64(3.5)).is_err());
        assert!(ty.coerce(Value::Float64(1e30)).is_err());
        assert!(ty.coerce(Value::Float64(-1e30)).is_err());
        assert!(ty.coerce(Value::Float64(f64::INFINITY)).is_err());
        assert_eq!(
            ty.coerce(Value::Float64(-9007199254740992.0)).unwrap(),
            Value::Int64(-9007199254740992)
        );
        assert!(ty.coerce(Value::UInt64(u64::MAX)).is_err());
        assert!(ty.coerce(Value::Varchar("twelve".into())).is_err());
    }

    #[test]
    fn coerce_bool() {
        let ty = FieldType::Bool;
        assert_eq!(ty.coerce(Value::Int64(1)).unwrap(), Value::Boolean(true));
        assert_eq!(ty.coerce(Value::Int64(0)).unwrap(), Value::Boolean(false));
        assert_eq!(ty.coerce(Value::Varchar("TRUE".into())).unwrap(), Value::Boolean(true));
        assert_eq!(ty.coerce(Value::Varchar("0".into())).unwrap(), Value::Boolean(false));
        assert_eq!(ty.coerce(Value::Blob([1][..].into())).unwrap(), Value::Boolean(true));
        assert!(ty.coerce(Value::Varchar("maybe".into())).is_err());
        assert!(ty.coerce(Value::Float64(1.0)).is_err());
    }

    #[test]
    fn coerce_float_and_passthrough() {
        assert_eq!(FieldType::Float.coerce(Value::Int64(2)).unwrap(), Value::Float64(2.0));
        assert_eq!(
            FieldType::Float.coerce(Value::Varchar("2.5".into())).unwrap(),
            Value::Float64(2.5)
        );
        let text = Value::Varchar("2025-01-01 00:00:00".into());
        assert_eq!(FieldType::DateTime.coerce(text.clone()).unwrap(), text);
        let stamp = Value::Timestamp(datetime!(2025-01-01 0:00));
        assert_eq!(FieldType::DateTime.coerce(stamp.clone()).unwrap(), stamp);
        let blob = Value::Blob([0, 1, 2][..].into());
        assert_eq!(FieldType::Spatial.coerce(blob.clone()).unwrap(), blob);
    }

    #[test]
    fn table_def() {
        let table = users();
        assert_eq!(table.primary_key.as_deref(), Some("id"));
        assert_eq!(table.primary_key_def().map(|v| v.ty), Some(FieldType::Int));
        assert_eq!(
            table.fields.keys().collect::<Vec<_>>(),
            ["id", "name", "active", "created"]
        );
        let no_key = TableDef::new("log", [field("line", FieldType::String, false)]);
        assert_eq!(no_key.primary_key, None);
        let empty = TableDef {
            name: "empty".into(),
            primary_key: None,
            fields: IndexMap::new(),
        };
        assert!(empty.primary_key_def().is_none());
    }

    #[test]
    fn resolve_fields() {
        let table = users();
        let fields = binds! { "name" => "Ann", "nickname" => "A", "active" => 1 };
        let resolved = table.resolve(&fields, UnknownFields::Skip).unwrap();
        assert_eq!(
            resolved.iter().map(|(f, _)| f.name.as_str()).collect::<Vec<_>>(),
            ["name", "active"]
        );
        let error = table.resolve(&fields, UnknownFields::Reject).unwrap_err();
        assert!(error.downcast_ref::<UsageError>().is_some());
        assert!(error.to_string().contains("`nickname`"));
    }

    #[test]
    fn coerce_row() {
        let table = users();
        let row = RowLabeled::new(
            Arc::from(["id".to_string(), "active".into(), "extra".into()]),
            [Value::Varchar("3".into()), Value::Int64(1), Value::Int64(9)].into(),
        );
        let row = table.coerce_row(row).unwrap();
        assert_eq!(row.get_column("id"), Some(&Value::Int64(3)));
        assert_eq!(row.get_column("active"), Some(&Value::Boolean(true)));
        assert_eq!(row.get_column("extra"), Some(&Value::Int64(9)));
        assert_eq!(row.get::<bool>("active").unwrap(), true);
        assert!(row.get::<i64>("missing").is_err());
        let broken = RowLabeled::new(
            Arc::from(["active".to_string()]),
            [Value::Varchar("perhaps".into())].into(),
        );
        assert!(table.coerce_row(broken).is_err());
    }
}
