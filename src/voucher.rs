use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub code: String,
    pub kind: String,
    pub price: u32,
    pub purchaser: String,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub redeemed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Valid(Voucher),
    Invalid(String),
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, CheckOutcome::Valid(_))
    }
}

/// The set of vouchers known to the dropzone, keyed by code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoucherBook {
    vouchers: HashMap<String, Voucher>,
}

impl VoucherBook {
    pub fn new(vouchers: Vec<Voucher>) -> VoucherBook {
        VoucherBook {
            vouchers: vouchers.into_iter().map(|v| (v.code.clone(), v)).collect(),
        }
    }

    pub fn check(&self, code: &str, on: NaiveDate) -> CheckOutcome {
        match self.vouchers.get(code) {
            None => CheckOutcome::Invalid(format!("voucher {} not found", code)),
            Some(v) if v.redeemed => CheckOutcome::Invalid(format!("voucher {} already redeemed", code)),
            Some(v) if v.valid_until < on => {
                CheckOutcome::Invalid(format!("voucher {} expired on {}", code, v.valid_until))
            }
            Some(v) => CheckOutcome::Valid(v.clone()),
        }
    }

    pub fn redeem(&mut self, code: &str) -> bool {
        match self.vouchers.get_mut(code) {
            Some(v) if !v.redeemed => {
                v.redeemed = true;
                true
            }
            _ => false,
        }
    }

    /// Vouchers in code order, for saving back to a scenario file.
    pub fn all(&self) -> Vec<Voucher> {
        let mut all: Vec<Voucher> = self.vouchers.values().cloned().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }
}

/// Latest-wins tracking for a voucher lookup tied to a code field. Every
/// new code entry begins a fresh generation; a result settling for an
/// older generation is discarded rather than overwriting the newer one.
/// Submission must hold while the current generation is unsettled.
#[derive(Debug, Default)]
pub struct CodeCheck {
    generation: u64,
    settled: Option<(u64, CheckOutcome)>,
}

impl CodeCheck {
    /// Starts a lookup for freshly entered input, superseding any lookup
    /// still in flight. Returns the generation token the result must
    /// carry to be accepted.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Delivers a lookup result. Stale generations are dropped; returns
    /// whether the result was accepted.
    pub fn settle(&mut self, generation: u64, outcome: CheckOutcome) -> bool {
        if generation != self.generation {
            return false;
        }
        self.settled = Some((generation, outcome));
        true
    }

    /// A lookup was started and its result has not arrived.
    pub fn is_pending(&self) -> bool {
        self.generation != 0
            && self.settled.as_ref().map(|(g, _)| *g) != Some(self.generation)
    }

    /// Outcome for the current generation only.
    pub fn outcome(&self) -> Option<&CheckOutcome> {
        self.settled
            .as_ref()
            .filter(|(g, _)| *g == self.generation)
            .map(|(_, o)| o)
    }
}
