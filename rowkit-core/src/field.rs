use crate::{
    AsValue, BindMap, Error, Result, RowLabeled, UnknownFields, UsageError, Value, truncate_long,
};
use indexmap::IndexMap;
use std::fmt::{self, Display};

/// Coarse column type, the reduced vocabulary used to decide binding and coercion.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[default]
    String,
    Int,
    Bool,
    Float,
    DateTime,
    /// Geometry columns, values are SQL expressions inlined into the statement.
    Spatial,
}

impl FieldType {
    /// Lower-cased native type name without any parenthesized suffix: `VARCHAR(20)` -> `varchar`.
    pub fn normalize_native(native: &str) -> String {
        let base = native.split('(').next().unwrap_or_default();
        base.trim().to_ascii_lowercase()
    }

    /// Looks up `native` in a driver type table, unmatched types are [`FieldType::String`].
    pub fn classify(native: &str, table: &[(&str, FieldType)]) -> FieldType {
        let native = Self::normalize_native(native);
        table
            .iter()
            .find_map(|(name, ty)| (*name == native).then_some(*ty))
            .unwrap_or_default()
    }

    /// Converts a fetched value into the canonical variant of this type.
    ///
    /// `Null` always stays `Null`, `DateTime` and `Spatial` values pass through unchanged.
    pub fn coerce(self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let fail = |value: &Value| {
            Error::msg(format!(
                "Cannot coerce {} value `{}` into a {} field",
                value.kind(),
                truncate_long!(value.to_string()),
                self
            ))
        };
        Ok(match self {
            FieldType::String => match value {
                Value::Varchar(..) => value,
                Value::Boolean(v) => Value::Varchar(v.to_string()),
                Value::Int64(v) => Value::Varchar(v.to_string()),
                Value::UInt64(v) => Value::Varchar(v.to_string()),
                Value::Float64(v) => Value::Varchar(v.to_string()),
                Value::Decimal(v) => Value::Varchar(v.to_string()),
                Value::Blob(..) => Value::Varchar(
                    String::try_from_value(value.clone()).map_err(|e| e.context(fail(&value)))?,
                ),
                _ => {
                    if let Some(text) = value.temporal_text() {
                        Value::Varchar(text)
                    } else {
                        return Err(fail(&value));
                    }
                }
            },
            FieldType::Int => Value::Int64(match value {
                Value::Float64(v)
                    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
                {
                    v as i64
                }
                Value::Float64(..) => return Err(fail(&value)),
                _ => i64::try_from_value(value.clone()).map_err(|e| e.context(fail(&value)))?,
            }),
            FieldType::Bool => Value::Boolean(match value {
                Value::Boolean(v) => v,
                Value::Int64(v) => v != 0,
                Value::UInt64(v) => v != 0,
                Value::Varchar(ref v) => match v.trim() {
                    "1" => true,
                    "0" => false,
                    v if v.eq_ignore_ascii_case("true") => true,
                    v if v.eq_ignore_ascii_case("false") => false,
                    _ => return Err(fail(&value)),
                },
                Value::Blob(ref v) if v.len() == 1 => v[0] != 0,
                _ => return Err(fail(&value)),
            }),
            FieldType::Float => Value::Float64(
                f64::try_from_value(value.clone()).map_err(|e| e.context(fail(&value)))?,
            ),
            FieldType::DateTime | FieldType::Spatial => value,
        })
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::String => "String",
            FieldType::Int => "Int",
            FieldType::Bool => "Bool",
            FieldType::Float => "Float",
            FieldType::DateTime => "DateTime",
            FieldType::Spatial => "Spatial",
        })
    }
}

/// Column metadata derived from driver introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// Native type as reported by the driver.
    pub native: String,
    pub primary_key: bool,
}

/// Registered table: its fields in column order and the primary key.
///
/// Immutable once built, shared as `Arc<TableDef>` through the [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    /// First column flagged as primary key by the driver.
    pub primary_key: Option<String>,
    pub fields: IndexMap<String, FieldDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        let fields: IndexMap<_, _> = fields.into_iter().map(|f| (f.name.clone(), f)).collect();
        let primary_key = fields.values().find(|f| f.primary_key).map(|f| f.name.clone());
        Self {
            name: name.into(),
            primary_key,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn primary_key_def(&self) -> Option<&FieldDef> {
        self.primary_key.as_deref().and_then(|v| self.field(v))
    }

    /// Pairs every input field with its definition, in input order.
    ///
    /// Fields the table does not have are dropped with a warning, or rejected with a
    /// [`UsageError`] under [`UnknownFields::Reject`].
    pub fn resolve<'a>(
        &'a self,
        fields: &'a BindMap,
        unknown: UnknownFields,
    ) -> Result<Vec<(&'a FieldDef, &'a Value)>> {
        let mut result = Vec::with_capacity(fields.len());
        let mut missing = Vec::new();
        for (name, value) in fields.iter() {
            match self.field(name) {
                Some(def) => result.push((def, value)),
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            let message = format!(
                "Table `{}` has no field named {}",
                self.name,
                missing
                    .iter()
                    .map(|v| format!("`{}`", v))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            match unknown {
                UnknownFields::Skip => log::warn!("{}, ignoring it", message),
                UnknownFields::Reject => return Err(UsageError::new(message).into()),
            }
        }
        Ok(result)
    }

    /// Coerces every column of `row` that is a field of this table, other columns pass through.
    pub fn coerce_row(&self, mut row: RowLabeled) -> Result<RowLabeled> {
        for (label, value) in row.labels.iter().zip(row.values.iter_mut()) {
            if let Some(def) = self.field(label) {
                *value = def.ty.coerce(std::mem::take(value)).map_err(|e| {
                    e.context(format!(
                        "While coercing column `{}` of table `{}`",
                        label, self.name
                    ))
                })?;
            }
        }
        Ok(row)
    }
}
