use scoring_core::{IndicatorParams, PriceSeries, ScoringError, WeightConfig};

use crate::indicators::{macd, rolling_mean, rsi, sma};

/// Technical score with the indicator readings behind it
#[derive(Debug, Clone)]
pub struct TechnicalScore {
    /// Normalized weighted score in [0, 100]
    pub score: i64,
    pub last_close: f64,
    pub sma: f64,
    pub rsi: f64,
    /// None when the series is too short for a MACD reading
    pub macd_bullish: Option<bool>,
    pub last_volume: f64,
    pub avg_volume: f64,
}

/// Combines SMA momentum, RSI, volume-spike, and MACD signals into one
/// bounded score. Stateless; safe to share across concurrent scoring calls.
#[derive(Debug, Clone)]
pub struct TechnicalScorer {
    params: IndicatorParams,
    weights: WeightConfig,
}

impl TechnicalScorer {
    pub fn new(params: IndicatorParams, weights: WeightConfig) -> Self {
        Self { params, weights }
    }

    /// Score a price series.
    ///
    /// Fails with `InsufficientHistory` when the series cannot cover the
    /// longest of the SMA, RSI-plus-delta, and volume windows; there is
    /// no partial technical score. A MACD window that does not fit in an
    /// otherwise sufficient series contributes no signal instead, and its
    /// weight leaves the normalization denominator.
    pub fn score(&self, series: &PriceSeries) -> Result<TechnicalScore, ScoringError> {
        let need = self.params.required_bars();
        if series.len() < need {
            return Err(ScoringError::InsufficientHistory {
                have: series.len(),
                need,
            });
        }

        let closes = series.closes();
        let volumes = series.volumes();
        // required_bars() guarantees every window below fits, and a
        // non-empty series always has a last bar.
        let last_close = closes[closes.len() - 1];
        let last_volume = volumes[volumes.len() - 1];

        let sma_value = *sma(&closes, self.params.sma_period)?
            .last()
            .ok_or(ScoringError::InsufficientHistory {
                have: closes.len(),
                need,
            })?;
        let rsi_value = *rsi(&closes, self.params.rsi_period)?
            .last()
            .ok_or(ScoringError::InsufficientHistory {
                have: closes.len(),
                need,
            })?;
        let avg_volume = *rolling_mean(&volumes, self.params.volume_period)?
            .last()
            .ok_or(ScoringError::InsufficientHistory {
                have: volumes.len(),
                need,
            })?;

        let sma_signal = if last_close > sma_value { 1 } else { -1 };
        let rsi_signal = if rsi_value < 30.0 {
            1
        } else if rsi_value > 70.0 {
            -1
        } else {
            0
        };
        let volume_signal = if last_volume > 2.0 * avg_volume { 1 } else { 0 };

        let macd_bullish = match macd(
            &closes,
            self.params.macd_fast,
            self.params.macd_slow,
            self.params.macd_signal,
        ) {
            Ok(result) => Some(result.is_bullish()),
            Err(ScoringError::InsufficientHistory { have, need }) => {
                tracing::debug!(have, need, "series too short for MACD, signal omitted");
                None
            }
            Err(e) => return Err(e),
        };

        let mut raw = self.weights.momentum * sma_signal as f64
            + self.weights.rsi * rsi_signal as f64
            + self.weights.volume * volume_signal as f64;
        let mut weights_used =
            self.weights.momentum + self.weights.rsi + self.weights.volume;
        if let Some(bullish) = macd_bullish {
            raw += self.weights.macd * if bullish { 1.0 } else { 0.0 };
            weights_used += self.weights.macd;
        }

        let score = if weights_used > 0.0 {
            ((raw / weights_used) * 100.0).clamp(0.0, 100.0).round() as i64
        } else {
            0
        };

        Ok(TechnicalScore {
            score,
            last_close,
            sma: sma_value,
            rsi: rsi_value,
            macd_bullish,
            last_volume,
            avg_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use scoring_core::PriceBar;

    fn series_from(closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| PriceBar {
                timestamp: DateTime::<Utc>::UNIX_EPOCH + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect();
        PriceSeries::new(bars)
    }

    fn short_params() -> IndicatorParams {
        IndicatorParams {
            sma_period: 20,
            rsi_period: 14,
            volume_period: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }

    #[test]
    fn too_few_bars_is_insufficient_history() {
        let closes = vec![100.0; 19];
        let volumes = vec![1000.0; 19];
        let result =
            TechnicalScorer::new(short_params(), WeightConfig::default())
                .score(&series_from(&closes, &volumes));
        assert!(matches!(
            result,
            Err(ScoringError::InsufficientHistory { have: 19, need: 20 })
        ));
    }

    #[test]
    fn default_windows_score_at_thirty_bars() {
        // SMA 20, RSI 14+1, volume 30: the volume window binds at 30
        let params = IndicatorParams::default();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let volumes = vec![1000.0; 30];
        let scorer = TechnicalScorer::new(params, WeightConfig::default());

        let short = series_from(&closes[..29], &volumes[..29]);
        assert!(matches!(
            scorer.score(&short),
            Err(ScoringError::InsufficientHistory { have: 29, need: 30 })
        ));

        let exact = series_from(&closes, &volumes);
        let score = scorer.score(&exact).unwrap();
        assert!((0..=100).contains(&score.score));
    }

    #[test]
    fn close_above_sma_sets_positive_momentum() {
        // Flat closes then a jump: the last 20 closes average to 100.5,
        // so last close 110 sits above the SMA.
        let mut closes = vec![100.0; 20];
        closes.push(110.0);
        let volumes = vec![1000.0; 21];
        let scorer = TechnicalScorer::new(
            IndicatorParams {
                volume_period: 14,
                ..short_params()
            },
            WeightConfig::default(),
        );
        let score = scorer.score(&series_from(&closes, &volumes)).unwrap();
        assert!(score.last_close > score.sma);
        assert!((score.sma - 100.5).abs() < 1e-9);
    }

    #[test]
    fn strict_uptrend_saturates_rsi() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1000.0; 40];
        let scorer = TechnicalScorer::new(short_params(), WeightConfig::default());
        let score = scorer.score(&series_from(&closes, &volumes)).unwrap();
        assert_eq!(score.rsi, 100.0);
    }

    #[test]
    fn oversold_scores_at_least_overbought() {
        // Monotonicity: the RSI contribution for an oversold series must
        // not fall below the overbought one, all else held equal.
        let weights = WeightConfig {
            momentum: 0.0,
            rsi: 1.0,
            volume: 0.0,
            macd: 0.0,
            fundamentals: 0.0,
        };
        let scorer = TechnicalScorer::new(short_params(), weights);

        let up: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
        let volumes = vec![1000.0; 40];

        let overbought = scorer.score(&series_from(&up, &volumes)).unwrap();
        let oversold = scorer.score(&series_from(&down, &volumes)).unwrap();
        assert!(oversold.score >= overbought.score);
        assert_eq!(overbought.score, 0);
        assert_eq!(oversold.score, 100);
    }

    #[test]
    fn volume_spike_flags_on_double_average() {
        let closes = vec![100.0; 40];
        let mut volumes = vec![1000.0; 40];
        volumes[39] = 5000.0;
        let weights = WeightConfig {
            momentum: 0.0,
            rsi: 0.0,
            volume: 1.0,
            macd: 0.0,
            fundamentals: 0.0,
        };
        let scorer = TechnicalScorer::new(short_params(), weights.clone());
        let spiked = scorer.score(&series_from(&closes, &volumes)).unwrap();
        assert_eq!(spiked.score, 100);

        let quiet = TechnicalScorer::new(short_params(), weights)
            .score(&series_from(&closes, &vec![1000.0; 40]))
            .unwrap();
        assert_eq!(quiet.score, 0);
    }

    #[test]
    fn macd_omitted_when_window_does_not_fit() {
        // 21 bars satisfy the sma/rsi/volume gate but not slow+signal=35.
        let closes: Vec<f64> = (0..21).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1000.0; 21];
        let scorer = TechnicalScorer::new(short_params(), WeightConfig::default());
        let score = scorer.score(&series_from(&closes, &volumes)).unwrap();
        assert!(score.macd_bullish.is_none());
    }

    #[test]
    fn zero_weights_score_zero() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1000.0; 40];
        let weights = WeightConfig {
            momentum: 0.0,
            rsi: 0.0,
            volume: 0.0,
            macd: 0.0,
            fundamentals: 1.0,
        };
        let scorer = TechnicalScorer::new(short_params(), weights);
        let score = scorer.score(&series_from(&closes, &volumes)).unwrap();
        assert_eq!(score.score, 0);
    }

    #[test]
    fn score_stays_in_bounds() {
        let scorer = TechnicalScorer::new(short_params(), WeightConfig::default());
        let shapes: Vec<Vec<f64>> = vec![
            (0..60).map(|i| 100.0 + i as f64).collect(),
            (0..60).map(|i| 160.0 - i as f64).collect(),
            (0..60).map(|i| 100.0 + (i % 7) as f64).collect(),
        ];
        for closes in shapes {
            let volumes = vec![1000.0; closes.len()];
            let score = scorer.score(&series_from(&closes, &volumes)).unwrap();
            assert!((0..=100).contains(&score.score));
        }
    }
}
