//! Operation: updateSettlementSummary
//!
//! Args: `[serialized SettlementDelta]`. The merged summary is only
//! observable through `getSettlementSummary`.

use crate::dispatch::{Context, HandlerResult, Surface};
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::store::SettlementStore;

pub const SURFACE: Surface = Surface::Invoke;
pub const OPERATION: &str = "updateSettlementSummary";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_arg_count(1)
}

pub fn handle<L: Ledger, M: LockManager>(ctx: &Context<SettlementStore<L, M>>) -> HandlerResult {
    ctx.store().aggregator().apply_json(ctx.arg(0)?)?;
    Ok(None)
}
