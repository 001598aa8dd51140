//! Inbound commands from the presentation layer.
//!
//! Raw requests (a buy-amount selector holding "1", "10", "max", …) are
//! normalised here so the engine only ever sees well-formed values.

use crate::game::state::UpgradeKind;

/// How many levels a purchase asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseAmount {
    /// Exactly this many levels, all or nothing.
    Count(u32),
    /// As many levels as the current mass pays for.
    Max,
}

impl PurchaseAmount {
    /// Parse a buy-amount request. `"max"` selects max-buy; positive integers
    /// buy that many; anything else (negative, zero, garbage) becomes
    /// `Count(0)`, which the engine treats as a no-op.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("max") {
            return PurchaseAmount::Max;
        }
        match raw.parse::<i64>() {
            Ok(n) if n > 0 => PurchaseAmount::Count(u32::try_from(n).unwrap_or(u32::MAX)),
            _ => PurchaseAmount::Count(0),
        }
    }
}

impl Default for PurchaseAmount {
    fn default() -> Self {
        PurchaseAmount::Count(1)
    }
}

/// Everything the player can ask the engine to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Manual click on the core.
    Click,
    /// Buy levels of an upgrade.
    Purchase {
        kind: UpgradeKind,
        amount: PurchaseAmount,
    },
    /// Perform a Quantum Echo.
    Echo,
    /// Spend echo points on the echo multiplier.
    BuyEchoMultiplier,
}
