use rowkit_core::SqlWriter;

/// MySQL dialect: `` `quoted` `` identifiers and `() VALUES ()` for inserts without fields.
#[derive(Default)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" () VALUES ()");
    }
}

#[cfg(test)]
mod tests {
    use crate::MySQLSqlWriter;
    use rowkit_core::{BindMap, FieldDef, FieldType, SqlWriter, Value};

    fn field(name: &str, ty: FieldType) -> FieldDef {
        FieldDef {
            name: name.into(),
            ty,
            native: String::new(),
            primary_key: false,
        }
    }

    #[test]
    fn mysql_statements() {
        let writer = MySQLSqlWriter::default();
        let mut out = String::new();
        writer.write_identifier_quoted(&mut out, "odd`name");
        assert_eq!(out, "`odd``name`");

        let mut out = String::new();
        let mut binds = BindMap::new();
        writer
            .write_insert(&mut out, &mut binds, "notes", &[])
            .expect("Empty insert");
        assert_eq!(out, "INSERT INTO `notes` () VALUES ()");
        assert!(binds.is_empty());

        let name = field("name", FieldType::String);
        let location = field("location", FieldType::Spatial);
        let ann = Value::Varchar("Ann".into());
        let point = Value::Varchar("ST_GeomFromText('POINT(1 2)')".into());
        let mut out = String::new();
        writer
            .write_insert(&mut out, &mut binds, "places", &[(&name, &ann), (&location, &point)])
            .expect("Insert with a spatial field");
        assert_eq!(
            out,
            "INSERT INTO `places` (`name`, `location`) VALUES (:name, ST_GeomFromText('POINT(1 2)'))"
        );
        assert_eq!(binds.get("name"), Some(&ann));
        assert!(!binds.contains("location"));
    }
}
