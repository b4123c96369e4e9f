use std::sync::Arc;

use scoring_core::{
    FundamentalsProvider, FundamentalsSnapshot, PriceHistoryProvider, ScoreOutcome,
    ScoreRecord, SkipReason,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::ScoringEngine;

/// Result of scanning a symbol list: the top-ranked score records,
/// best-first, plus the symbols that produced nothing and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub records: Vec<ScoreRecord>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl ScoringEngine {
    /// Score a list of symbols concurrently.
    ///
    /// Fan-out is bounded by `max_concurrency` because the providers,
    /// not the scoring math, are the bottleneck. A failed history fetch
    /// skips that symbol; a failed fundamentals fetch degrades to an
    /// empty snapshot. One bad symbol never aborts the batch, and the
    /// outcome does not depend on completion order. Records come back
    /// sorted best-first and truncated to the configured `top_n`.
    pub async fn scan(
        &self,
        symbols: &[String],
        prices: Arc<dyn PriceHistoryProvider>,
        fundamentals: Arc<dyn FundamentalsProvider>,
    ) -> BatchOutcome {
        tracing::info!(symbols = symbols.len(), "starting batch scan");

        let limiter = Arc::new(Semaphore::new(self.config().max_concurrency));
        let mut tasks = JoinSet::new();

        for symbol in symbols {
            let engine = self.clone();
            let prices = Arc::clone(&prices);
            let fundamentals = Arc::clone(&fundamentals);
            let limiter = Arc::clone(&limiter);
            let symbol = symbol.clone();

            tasks.spawn(async move {
                // The limiter is never closed; if it ever were, the task
                // just runs unbounded rather than panicking.
                let _permit = limiter.acquire_owned().await.ok();

                let series = match prices.fetch_history(&symbol).await {
                    Ok(series) => series,
                    Err(e) => {
                        tracing::warn!(symbol = %symbol, error = %e, "price history fetch failed");
                        return ScoreOutcome::Skipped {
                            symbol,
                            reason: SkipReason::ProviderFailure(e.to_string()),
                        };
                    }
                };

                let snapshot = match fundamentals.fetch_fundamentals(&symbol).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        tracing::warn!(
                            symbol = %symbol,
                            error = %e,
                            "fundamentals fetch failed, scoring on price action alone"
                        );
                        FundamentalsSnapshot::default()
                    }
                };

                engine.score_symbol(&symbol, &series, &snapshot)
            });
        }

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(ScoreOutcome::Scored(record)) => records.push(record),
                Ok(ScoreOutcome::Skipped { symbol, reason }) => skipped.push((symbol, reason)),
                Err(e) => tracing::error!(error = %e, "scoring task failed to join"),
            }
        }

        records.sort_by(|a, b| {
            b.final_score
                .cmp(&a.final_score)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        records.truncate(self.config().top_n);

        tracing::info!(
            scored = records.len(),
            skipped = skipped.len(),
            "batch scan complete"
        );

        BatchOutcome { records, skipped }
    }
}
