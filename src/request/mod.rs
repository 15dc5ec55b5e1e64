//! Request builders, one per operation.
//!
//! A builder collects the caller's raw input and handlers. Nothing is validated or sent until
//! [`send()`](Identify::send) is called, which runs the whole pipeline: initialization check,
//! validation, payload construction, dispatch, and reporting to exactly one handler.
use serde::Serialize;

use crate::{
    dispatcher::Endpoint, reporter::Reporter, validate::FieldWarning, Client, Error, Operation,
    Result,
};

/// Adds `on_error`, `on_success`, `error_handler` and `success_handler` to a request builder with
/// a `reporter` field.
macro_rules! handler_methods {
    ($builder:ident) => {
        impl<'a> $builder<'a> {
            /// Set the function called with the error code and message if the operation fails.
            pub fn on_error(mut self, on_error: impl Fn(crate::ErrorCode, &str) + 'a) -> Self {
                self.reporter.set_on_error(on_error);
                self
            }

            /// Set the function called if the operation succeeds.
            pub fn on_success(mut self, on_success: impl Fn() + 'a) -> Self {
                self.reporter.set_on_success(on_success);
                self
            }

            /// Set an [`ErrorHandler`](crate::ErrorHandler) called if the operation fails.
            pub fn error_handler(mut self, handler: impl crate::ErrorHandler + 'a) -> Self {
                self.reporter.set_on_error(handler);
                self
            }

            /// Set a [`SuccessHandler`](crate::SuccessHandler) called if the operation succeeds.
            pub fn success_handler(mut self, handler: impl crate::SuccessHandler + 'a) -> Self {
                self.reporter.set_on_success(handler);
                self
            }
        }
    };
}

mod alias;
mod identify;
mod subscription;
mod token;
mod track;

pub use alias::Alias;
pub use identify::Identify;
pub use subscription::Subscription;
pub use token::{DeviceToken, Platform, UnknownPlatform};
pub use track::Track;

/// A validated request, ready to be dispatched.
struct Prepared<P> {
    endpoint: Endpoint,
    payload: P,
    warnings: Vec<FieldWarning>,
}

impl<P> Prepared<P> {
    fn new(endpoint: Endpoint, payload: P) -> Self {
        Prepared {
            endpoint,
            payload,
            warnings: Vec::new(),
        }
    }

    fn with_warnings(mut self, warnings: Vec<FieldWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Runs one operation end to end and reports the outcome.
fn execute<P: Serialize>(
    client: Option<Client>,
    operation: Operation,
    reporter: Reporter<'_>,
    prepare: impl FnOnce() -> Result<Prepared<P>>,
) -> Result<()> {
    let result = run(client, operation, prepare);
    reporter.report(&result);
    result
}

fn run<P: Serialize>(
    client: Option<Client>,
    operation: Operation,
    prepare: impl FnOnce() -> Result<Prepared<P>>,
) -> Result<()> {
    let client = client.ok_or(Error::NotInitialized(operation))?;

    let prepared = prepare().map_err(|err| {
        log::debug!(target: "outbound", code = err.code(); "request failed validation: {err}");
        err
    })?;

    for warning in &prepared.warnings {
        log::warn!(target: "outbound", field = warning.field; "{warning}");
    }

    client.dispatch(prepared.endpoint, &prepared.payload)
}
