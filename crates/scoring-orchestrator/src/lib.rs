use fundamental_scoring::FundamentalScorer;
use scoring_core::{
    EngineConfig, FundamentalsSnapshot, PriceSeries, ScoreOutcome, ScoreRecord, ScoringError,
    SkipReason,
};
use technical_scoring::TechnicalScorer;

pub mod batch;
pub mod composite;

pub use batch::BatchOutcome;
pub use composite::composite_score;

/// Trading days in one and three months, used for the diagnostic
/// close-price ranges on the score record.
const RANGE_1M_BARS: usize = 22;
const RANGE_3M_BARS: usize = 66;

/// Per-symbol scoring pipeline: validate, score technicals, score
/// fundamentals, blend, emit. Holds no cross-call state, so one engine
/// can serve any number of concurrent scoring calls.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: EngineConfig,
    technical: TechnicalScorer,
    fundamental: FundamentalScorer,
}

impl ScoringEngine {
    /// Builds an engine from a validated configuration. Configuration
    /// errors abort here, before any symbol is processed.
    pub fn new(config: EngineConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        let technical = TechnicalScorer::new(config.params.clone(), config.weights.clone());
        Ok(Self {
            config,
            technical,
            fundamental: FundamentalScorer::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one symbol from already-fetched inputs.
    ///
    /// Never panics and never returns an error: data problems become a
    /// `Skipped` outcome so a batch caller can keep going. Only total
    /// absence of price history is fatal for the symbol; fundamentals
    /// degrade to documented defaults.
    pub fn score_symbol(
        &self,
        symbol: &str,
        series: &PriceSeries,
        fundamentals: &FundamentalsSnapshot,
    ) -> ScoreOutcome {
        if series.len() < self.config.min_history {
            tracing::warn!(
                symbol,
                have = series.len(),
                need = self.config.min_history,
                "skipping symbol, not enough usable bars"
            );
            return ScoreOutcome::Skipped {
                symbol: symbol.to_string(),
                reason: SkipReason::InsufficientHistory {
                    have: series.len(),
                    need: self.config.min_history,
                },
            };
        }

        let technical = match self.technical.score(series) {
            Ok(score) => score,
            Err(ScoringError::InsufficientHistory { have, need }) => {
                tracing::warn!(symbol, have, need, "skipping symbol, indicator windows do not fit");
                return ScoreOutcome::Skipped {
                    symbol: symbol.to_string(),
                    reason: SkipReason::InsufficientHistory { have, need },
                };
            }
            Err(e) => {
                // Anything else at this stage is a data defect, not a
                // reason to abort the batch.
                tracing::warn!(symbol, error = %e, "skipping symbol, technical scoring failed");
                return ScoreOutcome::Skipped {
                    symbol: symbol.to_string(),
                    reason: SkipReason::ProviderFailure(e.to_string()),
                };
            }
        };

        let fundamental = self.fundamental.score(fundamentals);
        let final_score =
            composite_score(technical.score, fundamental.score, &self.config.weights);

        tracing::debug!(
            symbol,
            technical = technical.score,
            fundamental = fundamental.score,
            final_score,
            rsi = technical.rsi,
            "symbol scored"
        );

        ScoreOutcome::Scored(ScoreRecord {
            symbol: symbol.to_string(),
            technical_score: technical.score,
            fundamental_score: fundamental.score,
            final_score,
            last_close: technical.last_close,
            rsi: Some(technical.rsi),
            sma: Some(technical.sma),
            macd_bullish: technical.macd_bullish,
            trailing_pe: fundamental.trailing_pe,
            range_1m: series.trailing_range(RANGE_1M_BARS),
            range_3m: series.trailing_range(RANGE_3M_BARS),
        })
    }
}
