use crate::{Executor, Result};
use std::future::Future;

pub trait Connection: Executor + Sized {
    /// Establish a connection to the given URL, `<driver>://...`.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;
}
