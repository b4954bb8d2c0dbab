use serde::{Deserialize, Serialize};

/// Bonding-curve pool status for a mint pair.
///
/// Derived from chain state on every trade attempt and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    pub exists: bool,
    pub is_complete: bool,
}

impl PoolState {
    pub fn missing() -> Self {
        Self::default()
    }

    /// Trades go to the curve only while the pool exists and has not completed
    pub fn accepts_curve_trades(&self) -> bool {
        self.exists && !self.is_complete
    }
}
