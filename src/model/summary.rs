use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::SettlementError;
use crate::keys::KeySpace;
use crate::merge::Mergeable;

/// Running settlement totals for one summary settlement id.
///
/// Amounts only ever accumulate. Currencies are fixed by the first delta and
/// never overwritten by later merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    #[serde(alias = "SummarySettlementId")]
    pub summary_settlement_id: String,
    #[serde(alias = "LoyaltySettlementAmount")]
    pub loyalty_settlement_amount: Decimal,
    #[serde(alias = "ISOCurrencyLoyalty")]
    pub iso_currency_loyalty: String,
    #[serde(alias = "SettlementAmount")]
    pub settlement_amount: Decimal,
    #[serde(alias = "ISOCurrency")]
    pub iso_currency: String,
}

/// One incremental posting to be accumulated into a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDelta {
    #[serde(alias = "SummarySettlementId")]
    pub summary_settlement_id: String,
    #[serde(alias = "LoyaltySettlementAmount")]
    pub loyalty_settlement_amount: Decimal,
    #[serde(alias = "SettlementAmount")]
    pub settlement_amount: Decimal,
    #[serde(alias = "ISOCurrencyLoyalty")]
    pub iso_currency_loyalty: String,
    #[serde(alias = "ISOCurrency")]
    pub iso_currency: String,
}

impl SettlementSummary {
    /// The first state of a summary: exactly the incoming delta.
    pub fn from_delta(delta: &SettlementDelta) -> Self {
        Self {
            summary_settlement_id: delta.summary_settlement_id.clone(),
            loyalty_settlement_amount: delta.loyalty_settlement_amount,
            iso_currency_loyalty: delta.iso_currency_loyalty.clone(),
            settlement_amount: delta.settlement_amount,
            iso_currency: delta.iso_currency.clone(),
        }
    }

    /// Add the delta's amounts, keeping this summary's id and currencies.
    ///
    /// Fails with `Overflow` when either running total would leave the
    /// decimal range; `self` is consumed either way.
    pub fn absorb(self, delta: &SettlementDelta) -> Result<Self, SettlementError> {
        if delta.iso_currency != self.iso_currency
            || delta.iso_currency_loyalty != self.iso_currency_loyalty
        {
            tracing::warn!(
                summary_id = %self.summary_settlement_id,
                pinned_currency = %self.iso_currency,
                pinned_loyalty_currency = %self.iso_currency_loyalty,
                delta_currency = %delta.iso_currency,
                delta_loyalty_currency = %delta.iso_currency_loyalty,
                "delta currency differs from summary; amounts added without conversion"
            );
        }
        let loyalty_settlement_amount = self.add(
            "loyaltySettlementAmount",
            self.loyalty_settlement_amount,
            delta.loyalty_settlement_amount,
        )?;
        let settlement_amount = self.add(
            "settlementAmount",
            self.settlement_amount,
            delta.settlement_amount,
        )?;
        Ok(Self {
            loyalty_settlement_amount,
            settlement_amount,
            ..self
        })
    }

    fn add(&self, field: &'static str, total: Decimal, amount: Decimal) -> Result<Decimal, SettlementError> {
        total.checked_add(amount).ok_or_else(|| {
            tracing::warn!(
                summary_id = %self.summary_settlement_id,
                field,
                total = %total,
                amount = %amount,
                "settlement total overflowed"
            );
            SettlementError::Overflow {
                id: self.summary_settlement_id.clone(),
                field,
            }
        })
    }
}

impl Record for SettlementSummary {
    const SPACE: KeySpace = KeySpace::Summary;

    fn id(&self) -> &str {
        &self.summary_settlement_id
    }
}

impl Mergeable for SettlementSummary {
    type Delta = SettlementDelta;

    fn delta_id(delta: &SettlementDelta) -> &str {
        &delta.summary_settlement_id
    }

    fn create(delta: &SettlementDelta) -> Self {
        Self::from_delta(delta)
    }

    fn merge(self, delta: &SettlementDelta) -> Result<Self, SettlementError> {
        self.absorb(delta)
    }
}
