use crate::{MySQLConnection, MySQLSqlWriter};
use rowkit_core::{BindMap, Driver, FieldType, Query};

/// `information_schema.COLUMNS.DATA_TYPE` names mapped to their coarse type.
pub const MYSQL_TYPES: &[(&str, FieldType)] = &[
    ("tinyint", FieldType::Bool),
    ("bit", FieldType::Bool),
    ("bool", FieldType::Bool),
    ("boolean", FieldType::Bool),
    ("smallint", FieldType::Int),
    ("mediumint", FieldType::Int),
    ("int", FieldType::Int),
    ("integer", FieldType::Int),
    ("bigint", FieldType::Int),
    ("year", FieldType::Int),
    ("float", FieldType::Float),
    ("double", FieldType::Float),
    ("real", FieldType::Float),
    ("decimal", FieldType::Float),
    ("numeric", FieldType::Float),
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
    ("geomcollection", FieldType::Spatial),
];

const COLUMNS_QUERY: &str = "SELECT COLUMN_NAME AS name, DATA_TYPE AS type, COLUMN_KEY = 'PRI' AS pk \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = :table \
    ORDER BY ORDINAL_POSITION";

#[derive(Debug, Default)]
pub struct MySQLDriver {}

impl MySQLDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mysql";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> MySQLSqlWriter {
        MySQLSqlWriter {}
    }

    fn field_type(&self, native: &str) -> FieldType {
        FieldType::classify(native, MYSQL_TYPES)
    }

    fn columns_query(&self, table: &str) -> Query {
        Query::new(COLUMNS_QUERY).with_binds(BindMap::new().with("table", table))
    }
}

#[cfg(test)]
mod tests {
    use crate::MySQLDriver;
    use rowkit_core::{Driver, FieldType, Value};

    #[test]
    fn field_types() {
        let driver = MySQLDriver::new();
        assert_eq!(driver.field_type("tinyint"), FieldType::Bool);
        assert_eq!(driver.field_type("TINYINT(1)"), FieldType::Bool);
        assert_eq!(driver.field_type("int"), FieldType::Int);
        assert_eq!(driver.field_type("bigint"), FieldType::Int);
        assert_eq!(driver.field_type("decimal"), FieldType::Float);
        assert_eq!(driver.field_type("varchar"), FieldType::String);
        assert_eq!(driver.field_type("json"), FieldType::String);
        assert_eq!(driver.field_type("datetime"), FieldType::DateTime);
        assert_eq!(driver.field_type("point"), FieldType::Spatial);
    }

    #[test]
    fn columns_query() {
        let query = MySQLDriver::new().columns_query("users");
        assert!(query.sql.contains("information_schema.COLUMNS"));
        assert!(query.sql.contains(":table"));
        assert_eq!(query.binds.get("table"), Some(&Value::Varchar("users".into())));
    }
}
