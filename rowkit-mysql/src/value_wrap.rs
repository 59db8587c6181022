use rowkit_core::Value;
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(v),
                Err(e) => Value::Blob(e.into_bytes().into()),
            },
            mysql_async::Value::Int(v) => Value::Int64(v),
            mysql_async::Value::UInt(v) => Value::UInt64(v),
            mysql_async::Value::Float(v) => Value::Float64(v as f64),
            mysql_async::Value::Double(v) => Value::Float64(v),
            mysql_async::Value::Date(year, month, day, hour, minute, second, microsecond) => {
                let month = match Month::try_from(month) {
                    Ok(v) => v,
                    Err(..) => return Err(mysql_async::FromValueError(value)),
                };
                let Ok(date) = Date::from_calendar_date(year as _, month, day) else {
                    return Err(mysql_async::FromValueError(value));
                };
                let Ok(time) = Time::from_hms_micro(hour, minute, second, microsecond) else {
                    return Err(mysql_async::FromValueError(value));
                };
                Value::Timestamp(PrimitiveDateTime::new(date, time))
            }
            mysql_async::Value::Time(negative, days, hours, minutes, seconds, micro) => {
                match Time::from_hms_micro(hours, minutes, seconds, micro) {
                    Ok(time) if !negative && days == 0 => Value::Time(time),
                    _ => Value::Varchar(format!(
                        "{}{:02}:{:02}:{:02}.{:06}",
                        if negative { "-" } else { "" },
                        days as u64 * 24 + hours as u64,
                        minutes,
                        seconds,
                        micro
                    )),
                }
            }
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = rowkit_core::Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        Ok(match value.0 {
            Value::Null => MySQLValue::NULL,
            Value::Boolean(v) => MySQLValue::from(v),
            Value::Int64(v) => MySQLValue::from(v),
            Value::UInt64(v) => MySQLValue::from(v),
            Value::Float64(v) => MySQLValue::from(v),
            Value::Decimal(v) => MySQLValue::from(v),
            Value::Varchar(v) => MySQLValue::from(v),
            Value::Blob(v) => MySQLValue::from(v.into_vec()),
            Value::Date(v) => MySQLValue::from(v),
            Value::Time(v) => MySQLValue::from(v),
            Value::Timestamp(v) => {
                if !(0..=9999).contains(&v.year()) {
                    return Err(Self::Error::msg(format!(
                        "Date {} is out of range for MySQL",
                        v
                    )));
                }
                MySQLValue::Date(
                    v.year() as _,
                    v.month().into(),
                    v.day(),
                    v.hour(),
                    v.minute(),
                    v.second(),
                    v.microsecond(),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ValueWrap;
    use rowkit_core::Value;
    use time::macros::{datetime, time};

    #[test]
    fn from_mysql() {
        let convert = |v: mysql_async::Value| ValueWrap::try_from(v).map(|v| v.0).ok();
        assert_eq!(convert(mysql_async::Value::NULL), Some(Value::Null));
        assert_eq!(
            convert(mysql_async::Value::Bytes(b"Ann".to_vec())),
            Some(Value::Varchar("Ann".into()))
        );
        assert_eq!(
            convert(mysql_async::Value::Bytes(vec![0xff, 0x00])),
            Some(Value::Blob([0xff, 0x00][..].into()))
        );
        assert_eq!(convert(mysql_async::Value::Int(-3)), Some(Value::Int64(-3)));
        assert_eq!(convert(mysql_async::Value::Float(0.5)), Some(Value::Float64(0.5)));
        assert_eq!(
            convert(mysql_async::Value::Date(2025, 3, 14, 10, 20, 30, 0)),
            Some(Value::Timestamp(datetime!(2025-03-14 10:20:30)))
        );
        assert_eq!(convert(mysql_async::Value::Date(2025, 13, 1, 0, 0, 0, 0)), None);
        assert_eq!(
            convert(mysql_async::Value::Time(false, 0, 1, 2, 3, 0)),
            Some(Value::Time(time!(1:02:03)))
        );
        assert_eq!(
            convert(mysql_async::Value::Time(true, 1, 2, 0, 0, 0)),
            Some(Value::Varchar("-26:00:00.000000".into()))
        );
    }

    #[test]
    fn to_mysql() {
        let convert = |v: Value| mysql_async::Value::try_from(ValueWrap(v)).ok();
        assert_eq!(convert(Value::Null), Some(mysql_async::Value::NULL));
        assert_eq!(convert(Value::Int64(7)), Some(mysql_async::Value::Int(7)));
        assert_eq!(
            convert(Value::Varchar("Ann".into())),
            Some(mysql_async::Value::Bytes(b"Ann".to_vec()))
        );
        assert_eq!(
            convert(Value::Timestamp(datetime!(2025-03-14 10:20:30.000001))),
            Some(mysql_async::Value::Date(2025, 3, 14, 10, 20, 30, 1))
        );
    }
}
