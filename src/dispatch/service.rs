//! Service - operation registry and dispatch.
//!
//! `Service<S>` holds a store and two registries of named operation handlers:
//! `invoke` for operations that mutate the ledger and `query` for read-only
//! lookups. Each handler receives a `Context<S>` and returns the response
//! bytes, if any.
//!
//! ## Example
//!
//! ```ignore
//! use partner_settlement::dispatch::{Service, Surface};
//!
//! let service = Service::new(store)
//!     .operation(Surface::Query, "ping", |_ctx| Ok(Some(b"pong".to_vec())));
//!
//! let reply = service.query("ping", vec![])?;
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::Context;
use crate::error::SettlementError;

/// Which entry point an operation is reachable through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Mutating operations.
    Invoke,
    /// Read-only operations.
    Query,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Invoke => write!(f, "invoke"),
            Surface::Query => write!(f, "query"),
        }
    }
}

/// What a handler returns: response bytes, or nothing.
pub type HandlerResult = Result<Option<Vec<u8>>, SettlementError>;

type Guard<S> = Box<dyn Fn(&Context<S>) -> bool + Send + Sync>;
type Handle<S> = Box<dyn Fn(&Context<S>) -> HandlerResult + Send + Sync>;

/// A registered operation handler with optional guard.
struct OperationHandler<S> {
    guard: Option<Guard<S>>,
    handle: Handle<S>,
}

/// Routes named operations to handler functions.
pub struct Service<S> {
    store: S,
    handlers: HashMap<(Surface, String), OperationHandler<S>>,
}

impl<S: Send + Sync + 'static> Service<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            handlers: HashMap::new(),
        }
    }

    /// Register an operation handler on `surface`.
    ///
    /// Returns `self` for chaining.
    pub fn operation<F>(mut self, surface: Surface, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(
            (surface, name.to_string()),
            OperationHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register an operation handler with a guard.
    ///
    /// The guard runs before the handler. If it returns `false` the call
    /// fails with `InvalidArgument` and the handler never runs.
    pub fn operation_guarded<G, F>(mut self, surface: Surface, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<S>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<S>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(
            (surface, name.to_string()),
            OperationHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Check that every `(surface, name)` in `expected` has a handler.
    ///
    /// Call once at startup so a missing registration fails immediately
    /// instead of on the first request.
    pub fn validate(self, expected: &[(Surface, &str)]) -> Result<Self, SettlementError> {
        let missing: Vec<String> = expected
            .iter()
            .filter(|(surface, name)| !self.handlers.contains_key(&(*surface, name.to_string())))
            .map(|(surface, name)| format!("{}:{}", surface, name))
            .collect();

        if missing.is_empty() {
            Ok(self)
        } else {
            Err(SettlementError::InvalidArgument(format!(
                "operations not registered: {}",
                missing.join(", ")
            )))
        }
    }

    /// Run a mutating operation.
    pub fn invoke(&self, operation: &str, args: Vec<String>) -> HandlerResult {
        self.dispatch(Surface::Invoke, operation, args)
    }

    /// Run a read-only operation.
    pub fn query(&self, operation: &str, args: Vec<String>) -> HandlerResult {
        self.dispatch(Surface::Query, operation, args)
    }

    /// Dispatch an operation by surface and name.
    ///
    /// Unknown operations fail with `InvalidArgument`; they never succeed silently.
    pub fn dispatch(&self, surface: Surface, operation: &str, args: Vec<String>) -> HandlerResult {
        let handler = self
            .handlers
            .get(&(surface, operation.to_string()))
            .ok_or_else(|| {
                SettlementError::InvalidArgument(format!(
                    "unknown {} operation: {}",
                    surface, operation
                ))
            })?;

        tracing::debug!(%surface, operation, args = args.len(), "dispatching operation");
        let ctx = Context::new(operation.to_string(), args, &self.store);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(SettlementError::InvalidArgument(format!(
                    "{}: incorrect number of arguments ({} given)",
                    operation,
                    ctx.args().len()
                )));
            }
        }

        (handler.handle)(&ctx).map_err(|e| {
            tracing::warn!(%surface, operation, status = e.status_code(), error = %e, "operation failed");
            e
        })
    }

    /// Dispatch an `InvocationRequest`, returning an `InvocationResponse`.
    pub fn dispatch_request(&self, request: &InvocationRequest) -> InvocationResponse {
        match self.dispatch(request.surface, &request.operation, request.args.clone()) {
            Ok(body) => InvocationResponse {
                status: if body.is_some() { 200 } else { 204 },
                body,
                error: None,
            },
            Err(e) => InvocationResponse {
                status: e.status_code(),
                body: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Registered operation names on `surface`, sorted.
    pub fn operations(&self, surface: Surface) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlers
            .keys()
            .filter(|(s, _)| *s == surface)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// =============================================================================
// Request / Response types
// =============================================================================

/// An inbound operation call: a surface, an operation name, and positional string arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub surface: Surface,
    pub operation: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Result of dispatching an `InvocationRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// HTTP-style status code: 200 with a body, 204 without, error codes otherwise.
    pub status: u16,
    /// Response bytes, exactly as produced by the handler.
    pub body: Option<Vec<u8>>,
    pub error: Option<String>,
}
