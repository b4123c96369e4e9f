use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// A bar is usable only when close and volume are real numbers.
    /// Upstream feeds deliver NaN for halted or partially reported days.
    pub fn is_usable(&self) -> bool {
        self.close.is_finite() && self.volume.is_finite()
    }
}

/// Chronologically ordered price history with no duplicate timestamps.
///
/// The constructor enforces the invariants once so every downstream
/// computation can index freely: bars are sorted by timestamp, rows with
/// non-finite close/volume are dropped, and for duplicate timestamps the
/// first occurrence wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries(Vec<PriceBar>);

impl PriceSeries {
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.retain(PriceBar::is_usable);
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self(bars)
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.volume).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.0.last().map(|b| b.close)
    }

    pub fn last_volume(&self) -> Option<f64> {
        self.0.last().map(|b| b.volume)
    }

    /// Low/high of the last `window` closes, or None when the series is shorter.
    pub fn trailing_range(&self, window: usize) -> Option<PriceRange> {
        if self.0.len() < window {
            return None;
        }
        let tail = &self.0[self.0.len() - window..];
        let low = tail.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
        let high = tail
            .iter()
            .map(|b| b.close)
            .fold(f64::NEG_INFINITY, f64::max);
        Some(PriceRange { low, high })
    }
}

/// One reported financial period, most recent first in sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period: String,
    pub value: f64,
}

/// Company fundamentals as reported by the data provider.
/// Every field may be absent; absence is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub trailing_pe: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub revenue_by_period: Vec<PeriodValue>,
    #[serde(default)]
    pub net_income_by_period: Vec<PeriodValue>,
}

/// Close-price low/high over a trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// Final scoring output for one symbol. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub symbol: String,
    pub technical_score: i64,
    pub fundamental_score: i64,
    pub final_score: i64,
    pub last_close: f64,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
    pub macd_bullish: Option<bool>,
    pub trailing_pe: Option<f64>,
    pub range_1m: Option<PriceRange>,
    pub range_3m: Option<PriceRange>,
}

/// Why a symbol produced no ScoreRecord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SkipReason {
    InsufficientHistory { have: usize, need: usize },
    ProviderFailure(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientHistory { have, need } => {
                write!(f, "insufficient history ({have}/{need} bars)")
            }
            SkipReason::ProviderFailure(msg) => write!(f, "provider failure: {msg}"),
        }
    }
}

/// Per-symbol outcome of the scoring pipeline. Failures travel as data,
/// never as panics or errors across the batch boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScoreOutcome {
    Scored(ScoreRecord),
    Skipped { symbol: String, reason: SkipReason },
}

impl ScoreOutcome {
    pub fn record(&self) -> Option<&ScoreRecord> {
        match self {
            ScoreOutcome::Scored(record) => Some(record),
            ScoreOutcome::Skipped { .. } => None,
        }
    }
}
