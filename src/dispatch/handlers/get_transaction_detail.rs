//! Operation: getTransactionDetail
//!
//! Returns the stored bytes unmodified, or no body if the id was never written.

use crate::dispatch::{Context, HandlerResult, Surface};
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::store::SettlementStore;

pub const SURFACE: Surface = Surface::Query;
pub const OPERATION: &str = "getTransactionDetail";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_arg_count(1)
}

pub fn handle<L: Ledger, M: LockManager>(ctx: &Context<SettlementStore<L, M>>) -> HandlerResult {
    ctx.store().recorder().detail(ctx.arg(0)?)
}
