use crate::{GenericSqlWriter, SqlWriter};
use rust_decimal::Decimal;
use std::fmt::{self, Display};
use time::{Date, PrimitiveDateTime, Time};

/// Dynamically typed scalar moved between the caller, the statement builder and the drivers.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(..) => "Boolean",
            Value::Int64(..) => "Int64",
            Value::UInt64(..) => "UInt64",
            Value::Float64(..) => "Float64",
            Value::Decimal(..) => "Decimal",
            Value::Varchar(..) => "Varchar",
            Value::Blob(..) => "Blob",
            Value::Date(..) => "Date",
            Value::Time(..) => "Time",
            Value::Timestamp(..) => "Timestamp",
        }
    }

    /// Text form of temporal values as stored by engines without native date types.
    pub fn temporal_text(&self) -> Option<String> {
        let writer = GenericSqlWriter::new();
        let mut out = String::new();
        match self {
            Value::Date(v) => writer.write_value_date(&mut out, v),
            Value::Time(v) => writer.write_value_time(&mut out, v),
            Value::Timestamp(v) => {
                writer.write_value_date(&mut out, &v.date());
                out.push(' ');
                writer.write_value_time(&mut out, &v.time());
            }
            _ => return None,
        }
        Some(out)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        GenericSqlWriter::new().write_value(&mut out, self);
        f.write_str(&out)
    }
}
