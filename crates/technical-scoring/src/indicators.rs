use scoring_core::ScoringError;

fn insufficient(have: usize, need: usize) -> ScoringError {
    ScoringError::InsufficientHistory { have, need }
}

/// Rolling arithmetic mean with a full window: the first value lands at
/// index `period - 1` of the input.
pub fn rolling_mean(data: &[f64], period: usize) -> Result<Vec<f64>, ScoringError> {
    if period == 0 || data.len() < period {
        return Err(insufficient(data.len(), period.max(1)));
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    let mut window_sum: f64 = data[..period].iter().sum();
    result.push(window_sum / period as f64);
    for i in period..data.len() {
        window_sum += data[i] - data[i - period];
        result.push(window_sum / period as f64);
    }
    Ok(result)
}

/// Simple Moving Average over closes
pub fn sma(data: &[f64], period: usize) -> Result<Vec<f64>, ScoringError> {
    rolling_mean(data, period)
}

/// Relative Strength Index using simple rolling means of gains and
/// losses (not Wilder's recursive smoothing). When the average loss over
/// the window is zero, RSI saturates at 100.
pub fn rsi(data: &[f64], period: usize) -> Result<Vec<f64>, ScoringError> {
    if period == 0 || data.len() < period + 1 {
        return Err(insufficient(data.len(), period.max(1) + 1));
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);
    for pair in data.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let avg_gains = rolling_mean(&gains, period)?;
    let avg_losses = rolling_mean(&losses, period)?;

    let values = avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(&gain, &loss)| {
            if loss == 0.0 {
                100.0
            } else {
                let rs = gain / loss;
                100.0 - 100.0 / (1.0 + rs)
            }
        })
        .collect();
    Ok(values)
}

/// Exponential moving average with smoothing span `span`, adjust-free
/// recursive form seeded with the first observation:
/// `ema[0] = data[0]`, `ema[i] = alpha * data[i] + (1 - alpha) * ema[i-1]`
/// where `alpha = 2 / (span + 1)`. Same length as the input.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);
    for &value in &data[1..] {
        let prev = *result.last().unwrap();
        result.push(alpha * value + (1.0 - alpha) * prev);
    }
    result
}

/// MACD line, signal line, and histogram
#[derive(Debug, Clone)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    /// True when the MACD line sits above the signal line on the latest bar.
    pub fn is_bullish(&self) -> bool {
        match (self.macd_line.last(), self.signal_line.last()) {
            (Some(&macd), Some(&signal)) => macd > signal,
            _ => false,
        }
    }
}

/// Moving Average Convergence Divergence over exponential spans
pub fn macd(
    data: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdResult, ScoringError> {
    if data.len() < slow + signal {
        return Err(insufficient(data.len(), slow + signal));
    }

    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(&f, &s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&m, &s)| m - s)
        .collect();

    Ok(MacdResult {
        macd_line,
        signal_line,
        histogram,
    })
}

/// Bollinger Bands: SMA middle band with ±k population standard deviations
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(data: &[f64], period: usize, k: f64) -> Result<BollingerBands, ScoringError> {
    let middle = rolling_mean(data, period)?;
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (offset, &mean) in middle.iter().enumerate() {
        let window = &data[offset..offset + period];
        let variance =
            window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();
        upper.push(mean + k * std);
        lower.push(mean - k * std);
    }

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}
