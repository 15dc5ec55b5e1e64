use crate::{ErrorCode, Result};

/// Receives the failure of an operation as a code and a human-readable message.
///
/// Implemented for any `Fn(ErrorCode, &str)`.
pub trait ErrorHandler {
    /// Called once when an operation fails.
    fn on_error(&self, code: ErrorCode, message: &str);
}

/// Receives the success of an operation.
///
/// Implemented for any `Fn()`.
pub trait SuccessHandler {
    /// Called once when an operation succeeds.
    fn on_success(&self);
}

pub(crate) struct NoopErrorHandler;
impl ErrorHandler for NoopErrorHandler {
    fn on_error(&self, _code: ErrorCode, _message: &str) {}
}

pub(crate) struct NoopSuccessHandler;
impl SuccessHandler for NoopSuccessHandler {
    fn on_success(&self) {}
}

impl<T: Fn(ErrorCode, &str)> ErrorHandler for T {
    fn on_error(&self, code: ErrorCode, message: &str) {
        self(code, message);
    }
}

impl<T: Fn()> SuccessHandler for T {
    fn on_success(&self) {
        self();
    }
}

/// The pair of handlers attached to one request. Handlers that were not set are no-ops, so an
/// operation sent without handlers reports nothing.
pub(crate) struct Reporter<'a> {
    on_error: Box<dyn ErrorHandler + 'a>,
    on_success: Box<dyn SuccessHandler + 'a>,
}

impl<'a> Default for Reporter<'a> {
    fn default() -> Self {
        Reporter {
            on_error: Box::new(NoopErrorHandler),
            on_success: Box::new(NoopSuccessHandler),
        }
    }
}

impl<'a> Reporter<'a> {
    pub fn set_on_error(&mut self, handler: impl ErrorHandler + 'a) {
        self.on_error = Box::new(handler);
    }

    pub fn set_on_success(&mut self, handler: impl SuccessHandler + 'a) {
        self.on_success = Box::new(handler);
    }

    /// Invokes exactly one handler, exactly once. Consumes the reporter so it cannot fire twice.
    pub fn report(self, result: &Result<()>) {
        match result {
            Ok(()) => self.on_success.on_success(),
            Err(err) => self.on_error.on_error(err.code(), &err.to_string()),
        }
    }
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
