mod failures;
mod places;
mod products;
mod statements;
mod temporal;
mod users;

use crate::{
    failures::failures, places::places, products::products, statements::statements,
    temporal::temporal, users::users,
};
use log::LevelFilter;
use rowkit::{Connection, Database, Driver};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(connection: C) {
    let mut database = Database::new(connection);
    users(&mut database).await;
    statements(&mut database).await;
    products(&mut database).await;
    temporal(&mut database).await;
    if is_mysql(&database) {
        places(&mut database).await;
    }
    failures(&mut database).await;
}

/// True when running against the MySQL driver.
pub(crate) fn is_mysql<C: Connection>(_database: &Database<C>) -> bool {
    <C::Driver as Driver>::NAME == "mysql"
}

/// Picks the DDL spelling of the driver under test.
pub(crate) fn dialect<'a, C: Connection>(
    database: &Database<C>,
    sqlite: &'a str,
    mysql: &'a str,
) -> &'a str {
    if is_mysql(database) { mysql } else { sqlite }
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
