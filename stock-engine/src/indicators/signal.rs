//! Trading signals derived from indicator readings.
//!
//! Each indicator maps to a discrete [`Signal`]; the composite score starts
//! at 50 and moves with each available reading:
//!
//! | Reading                         | Adjustment |
//! |---------------------------------|-----------:|
//! | MA alignment bullish / bearish  | +15 / −15  |
//! | MACD bullish / bearish          | +10 / −10  |
//! | RSI in (40, 70)                 | +5         |
//! | RSI ≥ 70 or ≤ 30                | −10        |
//! | Close below / above the bands   | +5 / −5    |

use serde::{Deserialize, Serialize};

use super::bollinger::BollingerPoint;
use super::macd::MacdPoint;

/// Short, medium, and long windows checked for MA alignment.
pub const MA_ALIGNMENT_WINDOWS: [usize; 3] = [5, 10, 20];

const BASE_SCORE: i32 = 50;
const BULLISH_OUTLOOK: u8 = 70;
const BEARISH_OUTLOOK: u8 = 30;

/// Indicator a signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    MovingAverage,
    Macd,
    Rsi,
    Bollinger,
}

/// Discrete reading of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
    Overbought,
    Oversold,
}

/// Signal with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSignal {
    pub indicator: IndicatorKind,
    pub signal: Signal,
    pub description: String,
}

impl IndicatorSignal {
    fn new(indicator: IndicatorKind, signal: Signal, description: impl Into<String>) -> Self {
        Self {
            indicator,
            signal,
            description: description.into(),
        }
    }
}

/// Overall direction implied by the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Bullish,
    Bearish,
    Sideways,
}

impl std::fmt::Display for Outlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "看多"),
            Self::Bearish => write!(f, "看空"),
            Self::Sideways => write!(f, "震荡"),
        }
    }
}

/// MA alignment: short > medium > long is bullish, the reverse bearish.
pub fn ma_signal(short: f64, medium: f64, long: f64) -> IndicatorSignal {
    let kind = IndicatorKind::MovingAverage;
    if short > medium && medium > long {
        IndicatorSignal::new(kind, Signal::Bullish, "MA bullish alignment: short-term uptrend")
    } else if short < medium && medium < long {
        IndicatorSignal::new(kind, Signal::Bearish, "MA bearish alignment: short-term downtrend")
    } else {
        IndicatorSignal::new(kind, Signal::Neutral, "MA tangled: no clear direction")
    }
}

/// MACD crossover and histogram sign.
pub fn macd_signal(point: &MacdPoint) -> IndicatorSignal {
    let kind = IndicatorKind::Macd;
    if point.macd > point.signal && point.histogram > 0.0 {
        IndicatorSignal::new(kind, Signal::Bullish, "MACD above signal: uptrend confirmed")
    } else if point.macd < point.signal && point.histogram < 0.0 {
        IndicatorSignal::new(kind, Signal::Bearish, "MACD below signal: downtrend confirmed")
    } else if point.histogram > 0.0 {
        IndicatorSignal::new(kind, Signal::Bullish, "MACD histogram positive")
    } else if point.histogram < 0.0 {
        IndicatorSignal::new(kind, Signal::Bearish, "MACD histogram negative")
    } else {
        IndicatorSignal::new(kind, Signal::Neutral, "MACD near zero: consolidating")
    }
}

/// RSI zones.
pub fn rsi_signal(rsi: f64) -> IndicatorSignal {
    let kind = IndicatorKind::Rsi;
    if rsi >= 80.0 {
        IndicatorSignal::new(kind, Signal::Overbought, format!("RSI {:.1}: severely overbought", rsi))
    } else if rsi >= 70.0 {
        IndicatorSignal::new(kind, Signal::Overbought, format!("RSI {:.1}: overbought", rsi))
    } else if rsi <= 20.0 {
        IndicatorSignal::new(kind, Signal::Oversold, format!("RSI {:.1}: severely oversold", rsi))
    } else if rsi <= 30.0 {
        IndicatorSignal::new(kind, Signal::Oversold, format!("RSI {:.1}: oversold", rsi))
    } else if (40.0..=60.0).contains(&rsi) {
        IndicatorSignal::new(kind, Signal::Neutral, format!("RSI {:.1}: balanced", rsi))
    } else if rsi > 60.0 {
        IndicatorSignal::new(kind, Signal::Bullish, format!("RSI {:.1}: buyers in control", rsi))
    } else {
        IndicatorSignal::new(kind, Signal::Bearish, format!("RSI {:.1}: sellers in control", rsi))
    }
}

/// Position of the close relative to the bands.
pub fn bollinger_signal(bands: &BollingerPoint, close: f64) -> IndicatorSignal {
    let kind = IndicatorKind::Bollinger;
    if close >= bands.upper {
        return IndicatorSignal::new(kind, Signal::Overbought, "Close at upper band");
    }
    if close <= bands.lower {
        return IndicatorSignal::new(kind, Signal::Oversold, "Close at lower band");
    }

    let position = (close - bands.lower) / (bands.upper - bands.lower);
    let pct = position * 100.0;
    if position > 0.75 {
        IndicatorSignal::new(kind, Signal::Bullish, format!("Close near upper band ({:.0}%)", pct))
    } else if position < 0.25 {
        IndicatorSignal::new(kind, Signal::Bearish, format!("Close near lower band ({:.0}%)", pct))
    } else {
        IndicatorSignal::new(kind, Signal::Neutral, format!("Close near middle band ({:.0}%)", pct))
    }
}

/// Latest readings feeding the composite signal. `None` means the
/// indicator had insufficient history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub close: f64,
    /// Moving averages over [`MA_ALIGNMENT_WINDOWS`]
    pub moving_averages: Option<[f64; 3]>,
    pub macd: Option<MacdPoint>,
    pub rsi: Option<f64>,
    pub bollinger: Option<BollingerPoint>,
}

/// Combined technical view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSignal {
    /// 0-100, 50 is neutral
    pub score: u8,
    pub outlook: Outlook,
    pub signals: Vec<IndicatorSignal>,
    /// Indicators left out for lack of history
    pub unavailable: Vec<IndicatorKind>,
}

fn directional_adjustment(signal: Signal, weight: i32) -> i32 {
    match signal {
        Signal::Bullish => weight,
        Signal::Bearish => -weight,
        _ => 0,
    }
}

/// Combine the available readings into a single score and outlook.
pub fn composite_signal(inputs: &SignalInputs) -> CompositeSignal {
    let mut score = BASE_SCORE;
    let mut signals = Vec::with_capacity(4);
    let mut unavailable = Vec::new();

    match inputs.moving_averages {
        Some([short, medium, long]) => {
            let s = ma_signal(short, medium, long);
            score += directional_adjustment(s.signal, 15);
            signals.push(s);
        }
        None => unavailable.push(IndicatorKind::MovingAverage),
    }

    match &inputs.macd {
        Some(point) => {
            let s = macd_signal(point);
            score += directional_adjustment(s.signal, 10);
            signals.push(s);
        }
        None => unavailable.push(IndicatorKind::Macd),
    }

    match inputs.rsi {
        Some(rsi) => {
            if rsi > 40.0 && rsi < 70.0 {
                score += 5;
            } else if rsi >= 70.0 || rsi <= 30.0 {
                score -= 10;
            }
            signals.push(rsi_signal(rsi));
        }
        None => unavailable.push(IndicatorKind::Rsi),
    }

    match &inputs.bollinger {
        Some(bands) => {
            // Below the lower band reads as a rebound opportunity
            if inputs.close < bands.lower {
                score += 5;
            } else if inputs.close > bands.upper {
                score -= 5;
            }
            signals.push(bollinger_signal(bands, inputs.close));
        }
        None => unavailable.push(IndicatorKind::Bollinger),
    }

    let score = score.clamp(0, 100) as u8;
    let outlook = if score >= BULLISH_OUTLOOK {
        Outlook::Bullish
    } else if score <= BEARISH_OUTLOOK {
        Outlook::Bearish
    } else {
        Outlook::Sideways
    };

    CompositeSignal {
        score,
        outlook,
        signals,
        unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn bands(lower: f64, upper: f64) -> BollingerPoint {
        BollingerPoint {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
            bandwidth: 0.0,
            percent_b: 0.5,
        }
    }

    #[test_case(12.0, 11.0, 10.0, Signal::Bullish ; "bullish alignment")]
    #[test_case(10.0, 11.0, 12.0, Signal::Bearish ; "bearish alignment")]
    #[test_case(11.0, 12.0, 10.0, Signal::Neutral ; "tangled")]
    fn test_ma_signal(short: f64, medium: f64, long: f64, expected: Signal) {
        assert_eq!(ma_signal(short, medium, long).signal, expected);
    }

    #[test_case(85.0, Signal::Overbought ; "severely overbought")]
    #[test_case(72.0, Signal::Overbought ; "overbought")]
    #[test_case(65.0, Signal::Bullish ; "bullish")]
    #[test_case(50.0, Signal::Neutral ; "neutral")]
    #[test_case(35.0, Signal::Bearish ; "bearish")]
    #[test_case(25.0, Signal::Oversold ; "oversold")]
    #[test_case(10.0, Signal::Oversold ; "severely oversold")]
    fn test_rsi_signal(rsi: f64, expected: Signal) {
        assert_eq!(rsi_signal(rsi).signal, expected);
    }

    #[test_case(1.0, 0.5, 0.5, Signal::Bullish ; "crossed up")]
    #[test_case(-1.0, -0.5, -0.5, Signal::Bearish ; "crossed down")]
    #[test_case(0.0, 0.0, 0.0, Signal::Neutral ; "flat")]
    fn test_macd_signal(macd: f64, signal: f64, histogram: f64, expected: Signal) {
        let point = MacdPoint {
            macd,
            signal,
            histogram,
        };
        assert_eq!(macd_signal(&point).signal, expected);
    }

    #[test_case(12.0, Signal::Overbought ; "at upper")]
    #[test_case(11.8, Signal::Bullish ; "near upper")]
    #[test_case(10.0, Signal::Neutral ; "middle")]
    #[test_case(8.2, Signal::Bearish ; "near lower")]
    #[test_case(7.5, Signal::Oversold ; "below lower")]
    fn test_bollinger_signal(close: f64, expected: Signal) {
        assert_eq!(bollinger_signal(&bands(8.0, 12.0), close).signal, expected);
    }

    #[test]
    fn test_composite_all_bullish() {
        let inputs = SignalInputs {
            close: 11.0,
            moving_averages: Some([12.0, 11.0, 10.0]),
            macd: Some(MacdPoint {
                macd: 1.0,
                signal: 0.5,
                histogram: 0.5,
            }),
            rsi: Some(55.0),
            bollinger: Some(bands(8.0, 12.0)),
        };
        let composite = composite_signal(&inputs);
        assert_eq!(composite.score, 80);
        assert_eq!(composite.outlook, Outlook::Bullish);
        assert_eq!(composite.signals.len(), 4);
        assert!(composite.unavailable.is_empty());
    }

    #[test]
    fn test_composite_all_bearish_clamps() {
        let inputs = SignalInputs {
            close: 13.0,
            moving_averages: Some([10.0, 11.0, 12.0]),
            macd: Some(MacdPoint {
                macd: -1.0,
                signal: -0.5,
                histogram: -0.5,
            }),
            rsi: Some(75.0),
            bollinger: Some(bands(8.0, 12.0)),
        };
        let composite = composite_signal(&inputs);
        // 50 - 15 - 10 - 10 - 5
        assert_eq!(composite.score, 10);
        assert_eq!(composite.outlook, Outlook::Bearish);
    }

    #[test]
    fn test_composite_missing_indicators_are_reported() {
        let inputs = SignalInputs {
            close: 10.0,
            rsi: Some(50.0),
            ..SignalInputs::default()
        };
        let composite = composite_signal(&inputs);
        assert_eq!(composite.score, 55);
        assert_eq!(composite.outlook, Outlook::Sideways);
        assert_eq!(
            composite.unavailable,
            vec![
                IndicatorKind::MovingAverage,
                IndicatorKind::Macd,
                IndicatorKind::Bollinger
            ]
        );
    }
}
