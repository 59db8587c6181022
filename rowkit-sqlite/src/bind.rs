use crate::error_message_from_ptr;
use libsqlite3_sys::*;
use rowkit_core::{BindMap, Error, Result, Value, truncate_long};
use rust_decimal::prelude::ToPrimitive;
use std::{
    ffi::{CStr, c_int},
    os::raw::{c_char, c_void},
};

/// Binds every parameter of `statement` from `binds`.
///
/// Named parameters (`:name`, `@name`, `$name`) are looked up by name, `?NNN` and bare `?` by
/// position. Values in `binds` the statement does not use are ignored.
pub(crate) fn bind_parameters(statement: *mut sqlite3_stmt, binds: &BindMap) -> Result<()> {
    unsafe {
        sqlite3_clear_bindings(statement);
        let count = sqlite3_bind_parameter_count(statement);
        let mut position = 0;
        for index in 1..=count {
            let name = sqlite3_bind_parameter_name(statement, index);
            let value = if name.is_null() {
                position += 1;
                binds.get_index(position - 1).map(|(_, v)| v).ok_or_else(|| {
                    Error::msg(format!("No value for the positional parameter {}", index))
                })?
            } else {
                let name = CStr::from_ptr(name).to_str()?;
                let value = match name.strip_prefix('?') {
                    Some(number) => number
                        .parse::<usize>()
                        .ok()
                        .and_then(|v| binds.get_index(v.checked_sub(1)?))
                        .map(|(_, v)| v),
                    None => binds.get(&name[1..]),
                };
                value.ok_or_else(|| {
                    Error::msg(format!("No value for the parameter `{}`", name))
                })?
            };
            bind_value(statement, index, value)?;
        }
    }
    Ok(())
}

pub(crate) fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: &Value) -> Result<()> {
    unsafe {
        let bind_text = |v: &str| {
            sqlite3_bind_text(
                statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        };
        let rc = match value {
            Value::Null => sqlite3_bind_null(statement, index),
            Value::Boolean(v) => sqlite3_bind_int(statement, index, *v as c_int),
            Value::Int64(v) => sqlite3_bind_int64(statement, index, *v),
            Value::UInt64(v) => {
                let Ok(v) = sqlite3_int64::try_from(*v) else {
                    return Err(Error::msg(format!(
                        "Cannot bind u64 value `{}` into sqlite integer because it's out of bounds",
                        v
                    )));
                };
                sqlite3_bind_int64(statement, index, v)
            }
            Value::Float64(v) => sqlite3_bind_double(statement, index, *v),
            Value::Decimal(v) => sqlite3_bind_double(
                statement,
                index,
                v.to_f64().ok_or_else(|| {
                    Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                })?,
            ),
            Value::Varchar(v) => bind_text(v),
            Value::Blob(v) => sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr() as *const c_void,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            Value::Date(..) | Value::Time(..) | Value::Timestamp(..) => {
                bind_text(&value.temporal_text().unwrap_or_default())
            }
        };
        if rc != SQLITE_OK {
            let db = sqlite3_db_handle(statement);
            let query = sqlite3_sql(statement);
            let error = Error::msg(error_message_from_ptr(&sqlite3_errmsg(db)).to_string())
                .context(format!(
                    "Cannot bind parameter {} to query:\n{}",
                    index,
                    truncate_long!(CStr::from_ptr(query).to_string_lossy())
                ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(())
    }
}
