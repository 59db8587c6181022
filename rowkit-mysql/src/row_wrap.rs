use crate::ValueWrap;
use mysql_async::{FromRowError, consts::ColumnType};
use rowkit_core::{Row, RowLabeled, RowNames, Value};

/// Refines a decoded value using the column type the server reported.
pub(crate) fn narrow(value: Value, column_type: ColumnType) -> Value {
    match (value, column_type) {
        // DATE columns arrive as a datetime at midnight.
        (Value::Timestamp(v), ColumnType::MYSQL_TYPE_DATE) => Value::Date(v.date()),
        // BIT(n) payloads are raw bytes, even when they happen to be valid UTF-8.
        (Value::Varchar(v), ColumnType::MYSQL_TYPE_BIT) => Value::Blob(v.into_bytes().into()),
        (v, _) => v,
    }
}

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns
            .iter()
            .map(|v| v.name_str().into_owned())
            .collect();
        let mut values = Vec::with_capacity(row.len());
        for (i, column) in columns.iter().enumerate() {
            let value = match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => v.0,
                Some(Err(..)) => return Err(FromRowError(row)),
                None => Value::Null,
            };
            values.push(narrow(value, column.column_type()));
        }
        let values: Row = values.into();
        Ok(RowWrap(RowLabeled::new(names, values)))
    }
}
