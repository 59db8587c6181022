use crate::{Connection, FieldType, Query, SqlWriter};

pub trait Driver: Send + Sync {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    /// Driver identifier, also the URL scheme.
    const NAME: &'static str;

    fn get_instance() -> Self;
    fn sql_writer(&self) -> Self::SqlWriter;

    /// Coarse type of a native column type as reported by introspection.
    fn field_type(&self, native: &str) -> FieldType;

    /// Query listing the columns of `table`, one row per column with the labels `name`, `type`
    /// and `pk` (non-zero for primary key columns).
    fn columns_query(&self, table: &str) -> Query;
}
