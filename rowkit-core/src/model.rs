use crate::{Connection, Database, Failed, Fields, Result, RowLabeled, Value};
use std::future::Future;

/// A typed record stored in one table, active record style.
///
/// ```ignore
/// struct User {
///     id: Option<i64>,
///     name: String,
///     active: bool,
/// }
///
/// impl Model for User {
///     fn table() -> &'static str {
///         "users"
///     }
///     fn from_row(row: &RowLabeled) -> Result<Self> {
///         Ok(Self {
///             id: row.get("id")?,
///             name: row.get("name")?,
///             active: row.get("active")?,
///         })
///     }
///     fn fields(&self) -> Fields {
///         binds! { "id" => self.id, "name" => self.name.clone(), "active" => self.active }
///     }
///     fn primary_key(&self) -> Option<Value> {
///         self.id.map(Into::into)
///     }
///     fn set_primary_key(&mut self, id: i64) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait Model: Sized {
    fn table() -> &'static str;

    fn from_row(row: &RowLabeled) -> Result<Self>;

    /// Field values of the record, the primary key included.
    fn fields(&self) -> Fields;

    /// `None` while the record was never saved.
    fn primary_key(&self) -> Option<Value>;

    fn set_primary_key(&mut self, id: i64);

    #[track_caller]
    fn find<C: Connection>(
        database: &mut Database<C>,
        id: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<Self>, Failed>> {
        database.load::<Self>(id)
    }

    #[track_caller]
    fn save<C: Connection>(
        &mut self,
        database: &mut Database<C>,
    ) -> impl Future<Output = Result<(), Failed>> {
        database.save(self)
    }

    #[track_caller]
    fn delete<C: Connection>(
        &self,
        database: &mut Database<C>,
    ) -> impl Future<Output = Result<u64, Failed>> {
        database.remove(self)
    }
}
