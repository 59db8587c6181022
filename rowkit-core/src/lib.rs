mod as_value;
mod bind_map;
mod config;
mod connection;
mod database;
mod driver;
mod executor;
mod failure;
mod field;
mod model;
mod query;
mod registry;
mod sql_writer;
mod statement_kind;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use bind_map::*;
pub use config::*;
pub use connection::*;
pub use database::*;
pub use driver::*;
pub use executor::*;
pub use failure::*;
pub use field::*;
pub use model::*;
pub use query::*;
pub use registry::*;
pub use sql_writer::*;
pub use statement_kind::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T, E = Error> = anyhow::Result<T, E>;
pub type Error = anyhow::Error;
