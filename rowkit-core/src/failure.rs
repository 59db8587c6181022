use crate::{BindMap, Error, truncate_long};
use std::{
    error,
    fmt::{self, Display},
    panic::Location,
};

/// A call that is malformed on the caller side and never reaches the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl error::Error for UsageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected by the driver or the database: syntax, constraints, connectivity, introspection.
    Statement,
    /// Rejected before reaching the driver, see [`UsageError`].
    Usage,
}

/// Everything known about a failed call: the error, the statement, its binds and the call site.
#[derive(Debug)]
pub struct Failure {
    pub kind: FailureKind,
    pub error: Error,
    /// Statement text, absent when the failure happened before one was built.
    pub sql: Option<String>,
    pub binds: BindMap,
    pub location: &'static Location<'static>,
}

impl Failure {
    pub fn new(
        error: Error,
        sql: Option<String>,
        binds: BindMap,
        location: &'static Location<'static>,
    ) -> Self {
        let kind = if error.downcast_ref::<UsageError>().is_some() {
            FailureKind::Usage
        } else {
            FailureKind::Statement
        };
        Self {
            kind,
            error,
            sql,
            binds,
            location,
        }
    }

    /// The error message without the diagnostic context.
    pub fn message(&self) -> String {
        format!("{:#}", self.error)
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;
        if let Some(sql) = &self.sql {
            write!(f, "\nQuery: {}", truncate_long!(sql))?;
        }
        if !self.binds.is_empty() {
            write!(f, "\nBindings: {}", self.binds)?;
        }
        write!(f, "\nCalled from {}", self.location)
    }
}

/// Failure sentinel returned by [`crate::Database`] operations.
///
/// The failure itself was already logged, reported to the error handler and stored as the
/// database's last error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

impl Display for Failed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("The database operation failed")
    }
}

impl error::Error for Failed {}

/// Receives every [`Failure`] once, right after it happened.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, failure: &Failure);
}

impl<F: Fn(&Failure) + Send + Sync> ErrorHandler for F {
    fn handle(&self, failure: &Failure) {
        self(failure)
    }
}
