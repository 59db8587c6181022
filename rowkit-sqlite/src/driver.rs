use crate::{SQLiteConnection, SQLiteSqlWriter};
use rowkit_core::{BindMap, Driver, FieldType, Query, SqlWriter};

/// Native type names, as declared in `CREATE TABLE`, mapped to their coarse type.
pub const SQLITE_TYPES: &[(&str, FieldType)] = &[
    ("integer", FieldType::Int),
    ("int", FieldType::Int),
    ("bigint", FieldType::Int),
    ("smallint", FieldType::Int),
    ("mediumint", FieldType::Int),
    ("int2", FieldType::Int),
    ("int8", FieldType::Int),
    ("tinyint", FieldType::Bool),
    ("bool", FieldType::Bool),
    ("boolean", FieldType::Bool),
    ("real", FieldType::Float),
    ("float", FieldType::Float),
    ("double", FieldType::Float),
    ("double precision", FieldType::Float),
    ("numeric", FieldType::Float),
    ("decimal", FieldType::Float),
    ("date", FieldType::DateTime),
    ("datetime", FieldType::DateTime),
    ("timestamp", FieldType::DateTime),
    ("time", FieldType::DateTime),
    ("geometry", FieldType::Spatial),
    ("point", FieldType::Spatial),
    ("linestring", FieldType::Spatial),
    ("polygon", FieldType::Spatial),
    ("multipoint", FieldType::Spatial),
    ("multilinestring", FieldType::Spatial),
    ("multipolygon", FieldType::Spatial),
    ("geometrycollection", FieldType::Spatial),
];

#[derive(Debug, Default)]
pub struct SQLiteDriver {}

impl SQLiteDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for SQLiteDriver {
    type Connection = SQLiteConnection;
    type SqlWriter = SQLiteSqlWriter;

    const NAME: &'static str = "sqlite";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> SQLiteSqlWriter {
        SQLiteSqlWriter {}
    }

    fn field_type(&self, native: &str) -> FieldType {
        FieldType::classify(native, SQLITE_TYPES)
    }

    fn columns_query(&self, table: &str) -> Query {
        let mut sql = String::from("PRAGMA table_info(");
        self.sql_writer().write_identifier_quoted(&mut sql, table);
        sql.push(')');
        Query::new(sql).with_binds(BindMap::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::SQLiteDriver;
    use rowkit_core::{Driver, FieldType};

    #[test]
    fn field_types() {
        let driver = SQLiteDriver::new();
        assert_eq!(driver.field_type("INTEGER"), FieldType::Int);
        assert_eq!(driver.field_type("REAL"), FieldType::Float);
        assert_eq!(driver.field_type("TINYINT(1)"), FieldType::Bool);
        assert_eq!(driver.field_type("VARCHAR(20)"), FieldType::String);
        assert_eq!(driver.field_type("TEXT"), FieldType::String);
        assert_eq!(driver.field_type("BLOB"), FieldType::String);
        assert_eq!(driver.field_type("Double Precision"), FieldType::Float);
        assert_eq!(driver.field_type("DATETIME"), FieldType::DateTime);
        assert_eq!(driver.field_type("POINT"), FieldType::Spatial);
        assert_eq!(driver.field_type(""), FieldType::String);
    }

    #[test]
    fn columns_query() {
        let query = SQLiteDriver::new().columns_query(r#"my"table"#);
        assert_eq!(query.sql, r#"PRAGMA table_info("my""table")"#);
        assert!(query.binds.is_empty());
    }
}
