use serde::{Deserialize, Serialize};

/// How the MACD signal line is derived.
///
/// `Scaled` reproduces the historical behavior of the service: the signal is
/// 0.9x the MACD line. `SmoothedSignal` is the textbook EMA(9) over the
/// MACD-line series; it must be opted into explicitly so existing consumers
/// keep seeing the scaled variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdMode {
    #[default]
    Scaled,
    SmoothedSignal,
}

/// Directional read of a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Position of the price relative to an oscillator's bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandState {
    Oversold,
    Overbought,
    Neutral,
}

/// Aggregate trading call from the individual signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

/// The qualitative label per signal, plus the aggregate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignals {
    pub trend: Bias,
    pub rsi: BandState,
    pub macd: Bias,
    pub bollinger: BandState,
    pub overall: OverallSignal,
}

/// MACD line, signal line and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdTriple {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdTriple {
    pub const ZERO: Self = Self {
        macd: 0.0,
        signal: 0.0,
        histogram: 0.0,
    };
}

/// Mean +/- (multiplier x standard deviation) envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// A computed indicator snapshot for one symbol.
///
/// Ephemeral: recomputed from scratch on every call, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub current_price: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_12: f64,
    pub ema_26: f64,
    pub rsi: f64,
    pub macd: MacdTriple,
    pub bollinger_bands: BollingerBands,
    /// Percent change from 5 points back to the latest price.
    pub price_change_5d: f64,
    /// Percent change from 20 points back to the latest price.
    pub price_change_20d: f64,
    pub signals: TradeSignals,
}

/// Minimum history length for a real (non-default) snapshot.
pub const MIN_INDICATOR_POINTS: usize = 20;

const RSI_PERIOD: usize = 14;
const BOLLINGER_WINDOW: usize = 20;
const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// Simple moving average over the last `window` prices.
///
/// Falls back to the mean of the whole series when it is shorter than the
/// window; this is a policy decision, not an error.
pub fn sma(prices: &[f64], window: usize) -> f64 {
    if prices.is_empty() || window == 0 {
        return 0.0;
    }
    let slice = if prices.len() < window {
        prices
    } else {
        &prices[prices.len() - window..]
    };
    mean(slice)
}

/// Exponential moving average, seeded with the first price.
///
/// Single pass with alpha = 2/(window+1); no lookback adjustment.
pub fn ema(prices: &[f64], window: usize) -> f64 {
    let Some(&first) = prices.first() else {
        return 0.0;
    };
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut value = first;
    for &price in &prices[1..] {
        value = price * alpha + value * (1.0 - alpha);
    }
    value
}

/// RSI-style momentum oscillator in [0, 100].
///
/// Returns the neutral midpoint 50.0 with fewer than `period + 1` points and
/// 100.0 (fully overbought) when the average loss is exactly zero.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let trailing = &deltas[deltas.len() - period..];

    let avg_gain = trailing.iter().filter(|&&d| d > 0.0).sum::<f64>() / period as f64;
    let avg_loss = trailing.iter().filter(|&&d| d < 0.0).map(|d| -d).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// MACD-style trend-convergence triple. All-zero with fewer than 26 points.
pub fn macd(prices: &[f64], mode: MacdMode) -> MacdTriple {
    if prices.len() < 26 {
        return MacdTriple::ZERO;
    }

    let macd_line = ema(prices, 12) - ema(prices, 26);
    let signal = match mode {
        MacdMode::Scaled => macd_line * 0.9,
        MacdMode::SmoothedSignal => {
            // EMA(9) over the MACD-line series, one value per usable prefix.
            let series: Vec<f64> = (26..=prices.len())
                .map(|end| ema(&prices[..end], 12) - ema(&prices[..end], 26))
                .collect();
            ema(&series, 9)
        }
    };

    MacdTriple {
        macd: macd_line,
        signal,
        histogram: macd_line - signal,
    }
}

/// Bollinger-style volatility bands over the last `window` prices.
///
/// The spread is the population standard deviation of the same slice the
/// middle band averages.
pub fn bollinger_bands(prices: &[f64], window: usize, multiplier: f64) -> BollingerBands {
    if prices.is_empty() {
        return BollingerBands {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
        };
    }
    let slice = if prices.len() < window {
        prices
    } else {
        &prices[prices.len() - window..]
    };
    let middle = mean(slice);
    let spread = population_std_dev(slice, middle);

    BollingerBands {
        upper: middle + spread * multiplier,
        middle,
        lower: middle - spread * multiplier,
    }
}

/// Percent change from `lookback` points back to the latest price.
///
/// Zero when the series is shorter than the lookback. A lookback equal to the
/// whole series measures from the first sample.
pub fn trailing_change(prices: &[f64], lookback: usize) -> f64 {
    if prices.len() < lookback || lookback == 0 {
        return 0.0;
    }
    let reference = if prices.len() > lookback {
        prices[prices.len() - 1 - lookback]
    } else {
        prices[0]
    };
    let current = prices[prices.len() - 1];
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}

/// Computes the full indicator snapshot with the default MACD mode.
///
/// Never errors: a series shorter than [`MIN_INDICATOR_POINTS`] yields the
/// documented default snapshot scaled off a base price of 100.0.
pub fn compute_indicators(prices: &[f64]) -> IndicatorSet {
    compute_indicators_with_mode(prices, MacdMode::default())
}

/// Same as [`compute_indicators`] with an explicit MACD signal mode.
pub fn compute_indicators_with_mode(prices: &[f64], mode: MacdMode) -> IndicatorSet {
    if prices.len() < MIN_INDICATOR_POINTS {
        return default_indicators(100.0);
    }

    let current_price = prices[prices.len() - 1];
    let sma_20 = sma(prices, 20);
    let sma_50 = sma(prices, 50);
    let rsi_value = rsi(prices, RSI_PERIOD);
    let macd_triple = macd(prices, mode);
    let bands = bollinger_bands(prices, BOLLINGER_WINDOW, BOLLINGER_MULTIPLIER);

    let signals = generate_signals(current_price, sma_20, sma_50, rsi_value, macd_triple, bands);

    IndicatorSet {
        current_price,
        sma_20,
        sma_50,
        ema_12: ema(prices, 12),
        ema_26: ema(prices, 26),
        rsi: rsi_value,
        macd: macd_triple,
        bollinger_bands: bands,
        price_change_5d: trailing_change(prices, 5),
        price_change_20d: trailing_change(prices, 20),
        signals,
    }
}

/// The fixed always-available snapshot for symbols without enough history,
/// scaled off the given base price.
pub fn default_indicators(base_price: f64) -> IndicatorSet {
    IndicatorSet {
        current_price: base_price,
        sma_20: base_price * 0.98,
        sma_50: base_price * 0.95,
        ema_12: base_price * 0.99,
        ema_26: base_price * 0.97,
        rsi: 50.0,
        macd: MacdTriple::ZERO,
        bollinger_bands: BollingerBands {
            upper: base_price * 1.02,
            middle: base_price,
            lower: base_price * 0.98,
        },
        price_change_5d: 1.5,
        price_change_20d: 3.2,
        signals: TradeSignals {
            trend: Bias::Neutral,
            rsi: BandState::Neutral,
            macd: Bias::Neutral,
            bollinger: BandState::Neutral,
            overall: OverallSignal::Hold,
        },
    }
}

fn generate_signals(
    price: f64,
    sma_20: f64,
    sma_50: f64,
    rsi: f64,
    macd: MacdTriple,
    bands: BollingerBands,
) -> TradeSignals {
    let trend = if price > sma_20 && sma_20 > sma_50 {
        Bias::Bullish
    } else if price < sma_20 && sma_20 < sma_50 {
        Bias::Bearish
    } else {
        Bias::Neutral
    };

    let rsi_state = if rsi < 30.0 {
        BandState::Oversold
    } else if rsi > 70.0 {
        BandState::Overbought
    } else {
        BandState::Neutral
    };

    let macd_bias = if macd.histogram > 0.0 {
        Bias::Bullish
    } else {
        Bias::Bearish
    };

    let bollinger_state = if price > bands.upper {
        BandState::Overbought
    } else if price < bands.lower {
        BandState::Oversold
    } else {
        BandState::Neutral
    };

    // Count bullish-like (bullish or oversold) vs bearish-like (bearish or
    // overbought) reads across the four signals.
    let bullish = [trend == Bias::Bullish, macd_bias == Bias::Bullish]
        .iter()
        .filter(|&&b| b)
        .count()
        + [rsi_state, bollinger_state]
            .iter()
            .filter(|&&s| s == BandState::Oversold)
            .count();
    let bearish = [trend == Bias::Bearish, macd_bias == Bias::Bearish]
        .iter()
        .filter(|&&b| b)
        .count()
        + [rsi_state, bollinger_state]
            .iter()
            .filter(|&&s| s == BandState::Overbought)
            .count();

    let overall = if bullish >= 3 {
        OverallSignal::StrongBuy
    } else if bullish >= 2 {
        OverallSignal::Buy
    } else if bearish >= 3 {
        OverallSignal::StrongSell
    } else if bearish >= 2 {
        OverallSignal::Sell
    } else {
        OverallSignal::Hold
    };

    TradeSignals {
        trend,
        rsi: rsi_state,
        macd: macd_bias,
        bollinger: bollinger_state,
        overall,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_series() -> Vec<f64> {
        vec![
            100.0, 102.0, 101.0, 105.0, 103.0, 108.0, 107.0, 110.0, 112.0, 111.0, 115.0, 113.0,
            118.0, 116.0, 120.0, 119.0, 122.0, 121.0, 125.0, 123.0,
        ]
    }

    #[test]
    fn short_series_returns_default_snapshot() {
        for len in 0..MIN_INDICATOR_POINTS {
            let prices: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            assert_eq!(compute_indicators(&prices), default_indicators(100.0));
        }
    }

    #[test]
    fn sma_shorter_than_window_is_whole_series_mean() {
        let prices = [10.0, 20.0, 30.0];
        assert!((sma(&prices, 50) - 20.0).abs() < EPS);
    }

    #[test]
    fn sma_uses_trailing_window() {
        let prices = [1.0, 1.0, 1.0, 4.0, 6.0];
        assert!((sma(&prices, 2) - 5.0).abs() < EPS);
    }

    #[test]
    fn ema_is_order_sensitive() {
        // Length 1: trivially invariant. Length >= 2: the recurrence weights
        // recent prices more, so reversing the series changes the result.
        assert_eq!(ema(&[42.0], 10), 42.0);

        let prices = [100.0, 105.0, 110.0, 120.0];
        let mut reversed = prices;
        reversed.reverse();
        assert!((ema(&prices, 3) - ema(&reversed, 3)).abs() > EPS);
    }

    #[test]
    fn rsi_neutral_when_short_and_overbought_when_no_losses() {
        assert_eq!(rsi(&[100.0; 10], 14), 50.0);

        let rising: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&rising, 14), 100.0);

        // A constant series has zero average loss, so the same branch fires.
        let flat = [50.0; 30];
        assert_eq!(rsi(&flat, 14), 100.0);
    }

    #[test]
    fn macd_zero_when_short() {
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert_eq!(macd(&prices, MacdMode::Scaled), MacdTriple::ZERO);
    }

    #[test]
    fn macd_scaled_signal_is_ninety_percent_of_line() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let triple = macd(&prices, MacdMode::Scaled);
        assert!((triple.signal - triple.macd * 0.9).abs() < EPS);
        assert!((triple.histogram - (triple.macd - triple.signal)).abs() < EPS);
    }

    #[test]
    fn macd_smoothed_mode_differs_from_scaled() {
        let prices: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.2)
            .collect();
        let scaled = macd(&prices, MacdMode::Scaled);
        let smoothed = macd(&prices, MacdMode::SmoothedSignal);
        assert!((scaled.macd - smoothed.macd).abs() < EPS);
        assert!((scaled.signal - smoothed.signal).abs() > EPS);
    }

    #[test]
    fn bollinger_bands_collapse_on_constant_series() {
        let bands = bollinger_bands(&[75.0; 30], 20, 2.0);
        assert!((bands.upper - 75.0).abs() < EPS);
        assert!((bands.middle - 75.0).abs() < EPS);
        assert!((bands.lower - 75.0).abs() < EPS);
    }

    #[test]
    fn twenty_point_series_end_to_end() {
        let prices = sample_series();
        let set = compute_indicators(&prices);

        // Must not fall into the default-snapshot branch.
        assert_ne!(set, default_indicators(100.0));
        assert!((set.sma_20 - 111.5).abs() < EPS);
        // Five points back from index 19 is index 14 (value 120).
        assert!((set.price_change_5d - 2.5).abs() < EPS);
        // A lookback spanning the whole series measures from the first sample.
        assert!((set.price_change_20d - 23.0).abs() < EPS);
        assert_eq!(set.current_price, 123.0);
    }

    #[test]
    fn trailing_change_zero_when_shorter_than_lookback() {
        assert_eq!(trailing_change(&[100.0, 101.0], 5), 0.0);
    }

    #[test]
    fn signals_bullish_stack_reads_strong_buy() {
        // Price above SMA20 above SMA50, positive histogram, oversold RSI.
        let signals = generate_signals(
            110.0,
            105.0,
            100.0,
            25.0,
            MacdTriple {
                macd: 1.0,
                signal: 0.9,
                histogram: 0.1,
            },
            BollingerBands {
                upper: 120.0,
                middle: 105.0,
                lower: 90.0,
            },
        );
        assert_eq!(signals.trend, Bias::Bullish);
        assert_eq!(signals.rsi, BandState::Oversold);
        assert_eq!(signals.overall, OverallSignal::StrongBuy);
    }

    #[test]
    fn signals_serialize_in_wire_casing() {
        let set = default_indicators(100.0);
        let json = serde_json::to_value(&set.signals).unwrap();
        assert_eq!(json["overall"], "hold");
        assert_eq!(json["trend"], "neutral");
    }
}
