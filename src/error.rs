//! Unified error type.

use std::fmt;

/// A boxed error from anywhere in the middleware chain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by azref's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures (binding to a port, accepting a connection) and
/// middleware that refuses to produce a response at all.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Middleware(BoxError),
}

impl Error {
    /// Wraps an arbitrary error raised by a middleware.
    pub fn middleware(e: impl Into<BoxError>) -> Self {
        Self::Middleware(e.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Middleware(e) => write!(f, "middleware: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Middleware(e) => Some(e.as_ref()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_layer() {
        let io = Error::from(std::io::Error::other("boom"));
        assert_eq!(io.to_string(), "io: boom");

        let mw = Error::middleware("denied");
        assert_eq!(mw.to_string(), "middleware: denied");
    }

    #[test]
    fn source_is_the_wrapped_error() {
        let err = Error::middleware("denied");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("denied"));
    }
}
