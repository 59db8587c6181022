use crate::{BindMap, FieldDef, FieldType, Result, UsageError, Value, separated_by};
use std::fmt::Write;
use time::{Date, Time};

/// Dialect aware SQL text generation.
///
/// Default methods produce ANSI flavored SQL with `"quoted"` identifiers and `:name`
/// placeholders, drivers override what their engine spells differently.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_placeholder(&self, out: &mut String, name: &str) {
        out.push(':');
        out.push_str(name);
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => self.write_value_none(out),
            Value::Boolean(v) => self.write_value_bool(out, *v),
            Value::Int64(v) => drop(write!(out, "{}", v)),
            Value::UInt64(v) => drop(write!(out, "{}", v)),
            Value::Float64(v) => drop(write!(out, "{:?}", v)),
            Value::Decimal(v) => drop(write!(out, "{}", v)),
            Value::Varchar(v) => self.write_value_string(out, v),
            Value::Blob(v) => self.write_value_blob(out, v),
            Value::Date(v) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(v) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(v) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push(' ');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL")
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize])
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
    }

    /// Spatial values are SQL expressions (`ST_GeomFromText('POINT(1 2)')`) written verbatim.
    fn write_spatial(&self, out: &mut String, field: &FieldDef, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_value_none(out),
            Value::Varchar(v) if !v.trim().is_empty() => out.push_str(v),
            _ => {
                return Err(UsageError::new(format!(
                    "Spatial field `{}` expects an SQL expression, found {}",
                    field.name,
                    value.kind()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Writes either the inlined spatial expression or the placeholder `:name`, recording the
    /// value in `binds`.
    fn write_field_value(
        &self,
        out: &mut String,
        binds: &mut BindMap,
        name: &str,
        field: &FieldDef,
        value: &Value,
    ) -> Result<()> {
        if field.ty == FieldType::Spatial {
            return self.write_spatial(out, field, value);
        }
        self.write_placeholder(out, name);
        binds.insert(name, value.clone());
        Ok(())
    }

    fn write_insert(
        &self,
        out: &mut String,
        binds: &mut BindMap,
        table: &str,
        fields: &[(&FieldDef, &Value)],
    ) -> Result<()> {
        out.push_str("INSERT INTO ");
        self.write_identifier_quoted(out, table);
        if fields.is_empty() {
            self.write_insert_default_values(out);
            return Ok(());
        }
        out.push_str(" (");
        separated_by(
            out,
            fields,
            |out, (field, _)| self.write_identifier_quoted(out, &field.name),
            ", ",
        );
        out.push_str(") VALUES (");
        let mut result = Ok(());
        separated_by(
            out,
            fields,
            |out, (field, value)| {
                if result.is_ok() {
                    result = self.write_field_value(out, binds, &field.name, field, value);
                }
            },
            ", ",
        );
        out.push(')');
        result
    }

    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" DEFAULT VALUES");
    }

    fn write_update(
        &self,
        out: &mut String,
        binds: &mut BindMap,
        table: &str,
        fields: &[(&FieldDef, &Value)],
        condition: Option<&str>,
    ) -> Result<()> {
        if fields.is_empty() {
            return Err(UsageError::new(format!(
                "Nothing to update in table `{}`: no field of the table was provided",
                table
            ))
            .into());
        }
        out.push_str("UPDATE ");
        self.write_identifier_quoted(out, table);
        out.push_str(" SET ");
        let mut result = Ok(());
        separated_by(
            out,
            fields,
            |out, (field, value)| {
                if result.is_ok() {
                    self.write_identifier_quoted(out, &field.name);
                    out.push_str(" = ");
                    result = self.write_field_value(
                        out,
                        binds,
                        &format!("update_{}", field.name),
                        field,
                        value,
                    );
                }
            },
            ", ",
        );
        result?;
        if let Some(condition) = condition.filter(|v| !v.trim().is_empty()) {
            out.push_str(" WHERE ");
            out.push_str(condition);
        }
        Ok(())
    }

    fn write_delete(&self, out: &mut String, table: &str, condition: &str) -> Result<()> {
        if condition.trim().is_empty() {
            return Err(UsageError::new(format!(
                "Refusing to delete from `{}` without a WHERE clause",
                table
            ))
            .into());
        }
        out.push_str("DELETE FROM ");
        self.write_identifier_quoted(out, table);
        out.push_str(" WHERE ");
        out.push_str(condition);
        Ok(())
    }

    /// `SELECT *` filtered by equality on every field, `NULL` values become `IS NULL`.
    fn write_select(
        &self,
        out: &mut String,
        binds: &mut BindMap,
        table: &str,
        filter: &[(&FieldDef, &Value)],
        limit: Option<u32>,
    ) -> Result<()> {
        out.push_str("SELECT * FROM ");
        self.write_identifier_quoted(out, table);
        if !filter.is_empty() {
            out.push_str(" WHERE ");
            let mut result = Ok(());
            separated_by(
                out,
                filter,
                |out, (field, value)| {
                    if result.is_err() {
                        return;
                    }
                    self.write_identifier_quoted(out, &field.name);
                    if value.is_null() {
                        out.push_str(" IS NULL");
                    } else {
                        out.push_str(" = ");
                        result = self.write_field_value(out, binds, &field.name, field, value);
                    }
                },
                " AND ",
            );
            result?;
        }
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {}", limit);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
