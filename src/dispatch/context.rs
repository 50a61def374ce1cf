//! Context passed to operation handlers.
//!
//! Carries the operation name, the positional string arguments and a
//! reference to the store the service was built with.

use crate::error::SettlementError;

/// The context passed to every operation handler.
///
/// Generic over `S`, the store type the service is configured with.
pub struct Context<'a, S> {
    operation: String,
    args: Vec<String>,
    store: &'a S,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(operation: String, args: Vec<String>, store: &'a S) -> Self {
        Self {
            operation,
            args,
            store,
        }
    }

    /// The operation name being handled.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// All positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True if exactly `count` arguments were supplied.
    pub fn has_arg_count(&self, count: usize) -> bool {
        self.args.len() == count
    }

    /// The argument at `index`, or `InvalidArgument` if missing.
    pub fn arg(&self, index: usize) -> Result<&str, SettlementError> {
        self.args.get(index).map(String::as_str).ok_or_else(|| {
            SettlementError::InvalidArgument(format!(
                "{}: missing argument {}",
                self.operation, index
            ))
        })
    }

    /// The store backing this service.
    pub fn store(&self) -> &S {
        self.store
    }
}
