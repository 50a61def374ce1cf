//! dispatch: the invocation surface of the settlement engine.
//!
//! Operations are called by name with a list of string arguments through one
//! of two entry points: `invoke` for operations that change the ledger and
//! `query` for read-only lookups.
//!
//! | Surface | Operation                 | Args                          |
//! |---------|---------------------------|-------------------------------|
//! | invoke  | `createInputTransaction`  | serialized `TransactionRecord`|
//! | invoke  | `deleteTransactionEntry`  | id                            |
//! | invoke  | `updateSettlementSummary` | serialized `SettlementDelta`  |
//! | query   | `getTransactionDetail`    | id                            |
//! | query   | `getSettlementSummary`    | id                            |
//!
//! ## Quick Start
//!
//! ```ignore
//! use partner_settlement::{dispatch::Service, InMemoryLedger, SettlementStore};
//!
//! let service = Service::settlement(SettlementStore::new(InMemoryLedger::new()))?;
//! service.invoke("createInputTransaction", vec![payload])?;
//! let bytes = service.query("getTransactionDetail", vec!["R1".into()])?;
//! ```

mod context;
pub mod handlers;
mod service;

pub use context::Context;
pub use service::{HandlerResult, InvocationRequest, InvocationResponse, Service, Surface};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register operation modules with a service using the handler convention.
///
/// Each module must export:
/// - `SURFACE: Surface`: `Invoke` or `Query`
/// - `OPERATION: &str`: the operation name
/// - `guard(ctx) -> bool`: argument validation
/// - `handle(ctx) -> HandlerResult`: the handler
///
/// # Example
/// ```ignore
/// let service = partner_settlement::register_operations!(
///     Service::new(store),
///     handlers::create_input_transaction,
///     handlers::get_transaction_detail,
/// );
/// ```
#[macro_export]
macro_rules! register_operations {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .operation_guarded(
                $($seg)::+::SURFACE,
                $($seg)::+::OPERATION,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
