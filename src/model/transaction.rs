use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::keys::KeySpace;

/// A single partner transaction, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Record of charge reference number; the ledger key.
    #[serde(alias = "ROCReferenceNumber")]
    pub roc_reference_number: String,
    /// Service establishment number.
    #[serde(alias = "SENumber")]
    pub se_number: String,
    #[serde(alias = "TransactionAmount")]
    pub transaction_amount: Decimal,
    #[serde(alias = "BGCId")]
    pub bgc_id: String,
    #[serde(default, alias = "ConversionRateInfo")]
    pub conversion_rate_info: ConversionRateInfo,
}

/// Loyalty conversion rate data, carried through without being computed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRateInfo {
    #[serde(default, alias = "ConversionRate")]
    pub conversion_rate: Decimal,
    #[serde(default, alias = "ISOCurrency")]
    pub iso_currency: String,
    #[serde(default, alias = "ConversionSlabNumber")]
    pub conversion_slab_number: i64,
    #[serde(default, alias = "ConversionSlabLowerThreshold")]
    pub conversion_slab_lower_threshold: Decimal,
    #[serde(default, alias = "ConversionSlabUpperThreshold")]
    pub conversion_slab_upper_threshold: Decimal,
}

impl Record for TransactionRecord {
    const SPACE: KeySpace = KeySpace::Transaction;

    fn id(&self) -> &str {
        &self.roc_reference_number
    }
}
