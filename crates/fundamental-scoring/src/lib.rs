use scoring_core::{FundamentalsSnapshot, PeriodValue};

/// Neutral placeholder P/E when the provider reports none; mid-range
/// between the cheap (<25) and expensive (>60) bands.
const NEUTRAL_PE: f64 = 50.0;
/// Default ROE when absent, the midpoint of the 0..0.30 normalization.
const NEUTRAL_ROE: f64 = 0.15;

/// Fundamental score with its five normalized sub-scores
#[derive(Debug, Clone)]
pub struct FundamentalScore {
    /// Bounded composite in [0, 100]
    pub score: i64,
    pub pe_score: f64,
    pub roe_score: f64,
    pub debt_score: f64,
    pub revenue_growth_score: f64,
    pub net_income_growth_score: f64,
    /// The trailing P/E that entered the score, None when absent
    pub trailing_pe: Option<f64>,
}

/// Normalizes valuation, profitability, leverage, and growth into one
/// bounded score. Best-effort by design: absent fields take documented
/// neutral defaults and malformed values degrade to a zero sub-score,
/// so scoring never fails.
#[derive(Debug, Clone, Default)]
pub struct FundamentalScorer;

impl FundamentalScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, snapshot: &FundamentalsSnapshot) -> FundamentalScore {
        let trailing_pe = snapshot.trailing_pe.filter(|pe| pe.is_finite());

        let pe_score = pe_band_score(trailing_pe.unwrap_or(NEUTRAL_PE));
        let roe_score = normalize(
            snapshot
                .return_on_equity
                .filter(|roe| roe.is_finite())
                .unwrap_or(NEUTRAL_ROE),
            0.0,
            0.30,
        );
        let debt_score = match snapshot.debt_to_equity.filter(|d| d.is_finite()) {
            Some(d2e) => 1.0 - normalize(d2e, 0.0, 2.0),
            None => 0.5,
        };
        let revenue_growth_score = growth_score(&snapshot.revenue_by_period);
        let net_income_growth_score = growth_score(&snapshot.net_income_by_period);

        let sub_scores = [
            pe_score,
            roe_score,
            debt_score,
            revenue_growth_score,
            net_income_growth_score,
        ];
        let mean = sub_scores.iter().sum::<f64>() / sub_scores.len() as f64;
        let score = (mean.clamp(0.0, 1.0) * 100.0).round() as i64;

        FundamentalScore {
            score,
            pe_score,
            roe_score,
            debt_score,
            revenue_growth_score,
            net_income_growth_score,
            trailing_pe,
        }
    }
}

fn pe_band_score(pe: f64) -> f64 {
    if pe < 25.0 {
        1.0
    } else if pe > 60.0 {
        0.0
    } else {
        0.5
    }
}

/// Linear position of `value` in [lo, hi], clamped to [0, 1]
fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// tanh of the period-over-period change ratio from the two most recent
/// entries (most-recent-first ordering); zero when fewer than two periods
/// exist, the base period is zero, or the values are malformed.
fn growth_score(periods: &[PeriodValue]) -> f64 {
    let (latest, previous) = match (periods.first(), periods.get(1)) {
        (Some(latest), Some(previous)) => (latest.value, previous.value),
        _ => return 0.0,
    };
    if previous == 0.0 || !latest.is_finite() || !previous.is_finite() {
        return 0.0;
    }
    let ratio = (latest - previous) / previous.abs();
    if !ratio.is_finite() {
        tracing::warn!(latest, previous, "malformed growth ratio, sub-score degraded to 0");
        return 0.0;
    }
    ratio.tanh()
}
