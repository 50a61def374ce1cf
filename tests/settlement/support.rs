//! Test fixtures and ledger doubles.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use partner_settlement::{
    ConversionRateInfo, InMemoryLedger, Ledger, LedgerError, SettlementDelta, TransactionRecord,
};
use rust_decimal::Decimal;

pub fn transaction(id: &str, amount: i64) -> TransactionRecord {
    TransactionRecord {
        roc_reference_number: id.into(),
        se_number: "S1".into(),
        transaction_amount: Decimal::from(amount),
        bgc_id: "BGC-7".into(),
        conversion_rate_info: ConversionRateInfo {
            conversion_rate: Decimal::new(15, 1),
            iso_currency: "USD".into(),
            conversion_slab_number: 1,
            conversion_slab_lower_threshold: Decimal::ZERO,
            conversion_slab_upper_threshold: Decimal::from(1000),
        },
    }
}

pub fn delta(id: &str, loyalty: i64, settlement: i64, currency: &str) -> SettlementDelta {
    SettlementDelta {
        summary_settlement_id: id.into(),
        loyalty_settlement_amount: Decimal::from(loyalty),
        settlement_amount: Decimal::from(settlement),
        iso_currency_loyalty: currency.into(),
        iso_currency: currency.into(),
    }
}

/// A ledger that fails selected calls on demand.
#[derive(Default)]
pub struct FaultyLedger {
    pub inner: InMemoryLedger,
    pub fail_get: AtomicBool,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
    pub puts: AtomicUsize,
}

impl FaultyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn unavailable(call: &str) -> LedgerError {
        LedgerError::Unavailable(format!("{} refused", call))
    }
}

impl Ledger for FaultyLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::unavailable("get"));
        }
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Self::unavailable("put"));
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable("delete"));
        }
        self.inner.delete(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Self::unavailable("compare_and_swap"));
        }
        self.inner.compare_and_swap(key, expected, value)
    }
}

/// A ledger that slips one foreign write in right after the next `get`,
/// simulating a concurrent writer between read and write.
#[derive(Default)]
pub struct RacingLedger {
    pub inner: InMemoryLedger,
    interference: Mutex<Option<Vec<u8>>>,
}

impl RacingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` to the key read by the next `get`.
    pub fn interfere_with(&self, value: Vec<u8>) {
        *self.interference.lock().unwrap() = Some(value);
    }
}

impl Ledger for RacingLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let current = self.inner.get(key)?;
        if let Some(value) = self.interference.lock().unwrap().take() {
            self.inner.put(key, value)?;
        }
        Ok(current)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.inner.delete(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.inner.compare_and_swap(key, expected, value)
    }
}
