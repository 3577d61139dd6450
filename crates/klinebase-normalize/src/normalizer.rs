//! The three-stage normalizer.

use klinebase_types::{Kline, KlineFrame, RawTable};
use std::sync::Arc;

use crate::{ModalDigitLength, NormalizeError, TimeUnitInference, coerce, repair};

/// Attaches `symbol` to normalized rows.
///
/// The resulting frame is indexed by `(symbol, timestamp)`. Rows keep their
/// archive order.
#[must_use]
pub fn assign_key(rows: Vec<Kline>, symbol: &str) -> KlineFrame {
    KlineFrame::new(symbol, rows)
}

/// Turns raw archive tables into keyed frames.
///
/// Cloning is cheap and shares the inference strategy.
#[derive(Debug, Clone)]
pub struct Normalizer {
    inference: Arc<dyn TimeUnitInference>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Creates a normalizer that infers epoch units by modal digit length.
    #[must_use]
    pub fn new() -> Self {
        Self::with_inference(ModalDigitLength)
    }

    /// Creates a normalizer with a custom time-unit inference strategy.
    #[must_use]
    pub fn with_inference(inference: impl TimeUnitInference + 'static) -> Self {
        Self {
            inference: Arc::new(inference),
        }
    }

    /// Runs coercion, repair and key assignment on `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Structural`] if a target column is missing.
    pub fn normalize(&self, raw: &RawTable, symbol: &str) -> Result<KlineFrame, NormalizeError> {
        let coerced = coerce(raw)?;
        let rows = repair(coerced, self.inference.as_ref());
        Ok(assign_key(rows, symbol))
    }
}
