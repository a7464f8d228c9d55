use std::fmt;

use crate::models::{InplayMatch, PriceLevel};

/// Displayed placeholder when no usable price exists
pub const SENTINEL: &str = "-";

/// Best available price on one side of a runner's book
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Known(f64),
    Unavailable,
}

impl Default for Price {
    fn default() -> Self {
        Price::Unavailable
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Known(p) => write!(f, "{:.2}", p),
            Price::Unavailable => f.write_str(SENTINEL),
        }
    }
}

/// Back/lay pair for one runner column group
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunnerPrices {
    pub back: Price,
    pub lay: Price,
}

/// Extract the six top-of-book prices for a match, ordered
/// runner1·back, runner1·lay, runner2·back, runner2·lay, runner3·back,
/// runner3·lay. Missing runners, missing sides, and zero/absent prices
/// all degrade to `Price::Unavailable`; this never fails.
pub fn extract_odds(m: &InplayMatch) -> [RunnerPrices; 3] {
    let mut out = [RunnerPrices::default(); 3];

    for (slot, runner) in out.iter_mut().zip(m.runners.iter()) {
        if let Some(ex) = &runner.ex {
            slot.back = best_price(&ex.back);
            slot.lay = best_price(&ex.lay);
        }
    }

    out
}

/// Best price of a side: the first level only, and only when it carries a
/// positive price
fn best_price(levels: &[PriceLevel]) -> Price {
    match levels.first().and_then(|level| level.price) {
        Some(p) if p > 0.0 => Price::Known(p),
        _ => Price::Unavailable,
    }
}
