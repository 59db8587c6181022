use crate::{MySQLDriver, RowWrap, ValueWrap};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, Params, prelude::Queryable};
use rowkit_core::{
    BindMap, Connection, Context, Driver, Error, Executor, Query, QueryResult, Result,
    RowsAffected, StatementKind,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{collections::HashMap, sync::Arc};
use url::Url;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

/// Parameters for `sql`: named when the statement spells `:name` placeholders, otherwise
/// positional in bind order.
fn params(sql: &str, binds: &BindMap) -> Result<Params> {
    let named = binds
        .names()
        .any(|name| sql.contains(&format!(":{}", name)));
    let values = binds.iter().map(|(name, value)| {
        mysql_async::Value::try_from(ValueWrap(value.clone()))
            .with_context(|| format!("While binding `{}`", name))
            .map(|value| (name, value))
    });
    Ok(if named {
        Params::Named(
            values
                .map(|v| v.map(|(name, value)| (name.as_bytes().to_vec(), value)))
                .collect::<Result<HashMap<_, _>>>()?,
        )
    } else {
        Params::Positional(
            values
                .map(|v| v.map(|(_, value)| value))
                .collect::<Result<Vec<_>>>()?,
        )
    })
}

fn affected(kind: StatementKind, rows_affected: u64, last_insert_id: Option<u64>) -> RowsAffected {
    RowsAffected {
        rows_affected,
        last_affected_id: (kind == StatementKind::Insert)
            .then_some(last_insert_id)
            .flatten()
            .map(|v| v as _),
    }
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        let kind = query.kind();
        try_stream! {
            let mut rows = 0;
            if query.binds.is_empty() {
                let mut result = self.connection.query_iter(query.sql.as_str()).await?;
                while let Some(mut stream) = result.stream::<RowWrap>().await? {
                    while let Some(row) = stream.next().await.transpose()? {
                        rows += 1;
                        yield QueryResult::Row(row.0);
                    }
                }
                if rows == 0 && kind.is_modify() {
                    yield QueryResult::Affected(affected(
                        kind,
                        result.affected_rows(),
                        result.last_insert_id(),
                    ));
                }
            } else {
                let params = params(&query.sql, &query.binds)?;
                let mut result = self.connection.exec_iter(query.sql.as_str(), params).await?;
                while let Some(mut stream) = result.stream::<RowWrap>().await? {
                    while let Some(row) = stream.next().await.transpose()? {
                        rows += 1;
                        yield QueryResult::Row(row.0);
                    }
                }
                if rows == 0 && kind.is_modify() {
                    yield QueryResult::Affected(affected(
                        kind,
                        result.affected_rows(),
                        result.last_insert_id(),
                    ));
                }
            }
        }
        .map_err(move |e: Error| {
            let error = e.context(context.clone());
            log::error!("{:#}", error);
            error
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: &str) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <MySQLDriver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(url).with_context(context)?;
        let config = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(config).await.with_context(context)?;
        log::debug!("Connected to {}", truncate_long!(url.as_str()));
        Ok(MySQLConnection { connection })
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::params;
    use mysql_async::Params;
    use rowkit_core::BindMap;

    #[test]
    fn named_or_positional() {
        let binds = BindMap::new().with("name", "Ann").with("id", 1);
        let Params::Named(named) = params("SELECT * FROM `users` WHERE `id` = :id", &binds)
            .expect("Named params")
        else {
            panic!("Expected named params");
        };
        assert_eq!(named.len(), 2);
        assert_eq!(named.get(&b"id"[..]), Some(&mysql_async::Value::Int(1)));

        let Params::Positional(positional) =
            params("SELECT * FROM `users` WHERE `name` = ? AND `id` = ?", &binds)
                .expect("Positional params")
        else {
            panic!("Expected positional params");
        };
        assert_eq!(
            positional,
            vec![
                mysql_async::Value::Bytes(b"Ann".to_vec()),
                mysql_async::Value::Int(1)
            ]
        );
    }
}
