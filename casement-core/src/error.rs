//! Common error types.

use std::{error, fmt};

/// The error type for when the OS cannot perform the requested operation.
///
/// Wraps the name of the native call that failed together with the error code
/// the OS reported for it. These calls are not treated as transient, so an
/// `OsError` is always propagated to the caller rather than retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsError {
    op: &'static str,
    code: i32,
}

impl OsError {
    /// Create a new [`OsError`] from the failed operation's name and the
    /// native error code.
    pub fn new(op: &'static str, code: i32) -> OsError {
        OsError { op, code }
    }

    /// The name of the native call that failed.
    pub fn operation(&self) -> &'static str {
        self.op
    }

    /// The native error code reported by the OS.
    pub fn code(&self) -> i32 {
        self.code
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} failed: os error {}", self.op, self.code)
    }
}

impl error::Error for OsError {}

/// The error type for when the requested operation is not supported by the
/// backend.
#[derive(Clone)]
pub struct NotSupportedError {
    _marker: (),
}

impl Default for NotSupportedError {
    fn default() -> Self {
        Self::new()
    }
}

impl NotSupportedError {
    /// Create a new [`NotSupportedError`].
    #[inline]
    pub fn new() -> NotSupportedError {
        NotSupportedError { _marker: () }
    }
}

impl fmt::Debug for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("NotSupportedError").finish()
    }
}

impl fmt::Display for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.pad("the requested operation is not supported by the backend")
    }
}

impl error::Error for NotSupportedError {}

/// An error that may be generated by any fallible subsystem operation.
#[derive(Debug)]
pub enum Error {
    /// The OS cannot perform the operation.
    Os(OsError),
    /// The subsystem was used after [`Context::shutdown`] was called.
    ///
    /// This is a caller bug rather than an environmental failure.
    ///
    /// [`Context::shutdown`]: crate::context::Context::shutdown
    NotInitialized,
    /// The operation is not supported by the backend.
    NotSupported(NotSupportedError),
}

impl From<OsError> for Error {
    fn from(value: OsError) -> Self {
        Self::Os(value)
    }
}

impl From<NotSupportedError> for Error {
    fn from(value: NotSupportedError) -> Self {
        Self::NotSupported(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Error::Os(e) => e.fmt(f),
            Error::NotInitialized => f.pad("the windowing context is not initialized"),
            Error::NotSupported(e) => e.fmt(f),
        }
    }
}

impl error::Error for Error {}
