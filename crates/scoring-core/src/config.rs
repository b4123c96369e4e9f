use crate::ScoringError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named signal weights. All must be non-negative; at least one must be
/// positive or scoring degenerates to zero everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    pub momentum: f64,
    pub rsi: f64,
    pub volume: f64,
    pub macd: f64,
    pub fundamentals: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            momentum: 0.30,
            rsi: 0.25,
            volume: 0.20,
            macd: 0.25,
            fundamentals: 0.67,
        }
    }
}

impl WeightConfig {
    /// Combined weight of the four technical signals.
    pub fn technical_weight(&self) -> f64 {
        self.momentum + self.rsi + self.volume + self.macd
    }

    pub fn total_weight(&self) -> f64 {
        self.technical_weight() + self.fundamentals
    }

    fn validate(&self) -> Result<(), ScoringError> {
        let named = [
            ("momentum", self.momentum),
            ("rsi", self.rsi),
            ("volume", self.volume),
            ("macd", self.macd),
            ("fundamentals", self.fundamentals),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "weight '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        if self.total_weight() <= 0.0 {
            return Err(ScoringError::InvalidConfig(
                "at least one weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lookback windows for the indicator library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub sma_period: usize,
    pub rsi_period: usize,
    pub volume_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_period: 20,
            rsi_period: 14,
            volume_period: 30,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorParams {
    /// Bars required before the technical scorer will produce a score.
    /// RSI needs one bar more than its period to form the deltas; SMA
    /// and the volume average need exactly their window.
    pub fn required_bars(&self) -> usize {
        self.sma_period
            .max(self.rsi_period + 1)
            .max(self.volume_period)
    }

    fn validate(&self) -> Result<(), ScoringError> {
        let named = [
            ("sma_period", self.sma_period),
            ("rsi_period", self.rsi_period),
            ("volume_period", self.volume_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        for (name, value) in named {
            if value == 0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "period '{name}' must be at least 1"
                )));
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ScoringError::InvalidConfig(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

/// Full engine configuration, loaded once per run and passed into the
/// orchestrator at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: WeightConfig,
    #[serde(default)]
    pub params: IndicatorParams,
    /// Symbols with fewer usable bars than this are skipped outright.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Concurrent in-flight symbols during a batch scan. Sized to the
    /// data provider's rate limit, not to CPU count.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// A batch scan keeps only this many top-ranked records.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_min_history() -> usize {
    30
}

fn default_max_concurrency() -> usize {
    5
}

fn default_top_n() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            params: IndicatorParams::default(),
            min_history: default_min_history(),
            max_concurrency: default_max_concurrency(),
            top_n: default_top_n(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScoringError::InvalidConfig(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ScoringError::InvalidConfig(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        self.weights.validate()?;
        self.params.validate()?;
        if self.max_concurrency == 0 {
            return Err(ScoringError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(ScoringError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
