use crate::{FundamentalsSnapshot, PriceSeries, ScoringError};
use async_trait::async_trait;

/// Supplies historical price bars for a ticker. Owned by the caller;
/// the engine only consumes the returned series. An empty series is a
/// valid response and is treated as insufficient history, not an error.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, ScoringError>;
}

/// Supplies a fundamentals snapshot for a ticker. Any field may be
/// absent; a failed fetch degrades to an empty snapshot upstream.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(&self, symbol: &str)
        -> Result<FundamentalsSnapshot, ScoringError>;
}
