use rowkit_core::SqlWriter;

/// SQLite dialect: `"quoted"` identifiers, `DEFAULT VALUES` inserts, booleans stored as integers.
pub struct SQLiteSqlWriter {}

impl SqlWriter for SQLiteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }
}
