use thiserror::Error;

/// Failure to read a duration string such as `10s` or `250ms`.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("'{0}' is not a duration, expected a number followed by a unit (e.g. 10s)")]
    Syntax(String),
    #[error("Unit '{0}' not supported")]
    UnitNotSupported(String),
    #[error("Duration '{0}' is too large")]
    Overflow(String),
}
