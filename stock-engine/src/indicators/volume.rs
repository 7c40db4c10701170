//! Volume and price/volume relationship.

use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;
use crate::error::{Error, Result};

/// Volume change (%) beyond which a move counts as volume-driven.
const VOLUME_SWING_PCT: f64 = 20.0;

/// Price/volume relationship of the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    /// Price up on expanding volume
    RisingOnVolume,
    /// Price down on expanding volume (distribution)
    FallingOnVolume,
    /// Price down on shrinking volume (basing)
    FallingOnLowVolume,
    /// Price up on shrinking volume (weak rally)
    RisingOnLowVolume,
    /// Volume within the normal band
    Steady,
    /// Large volume swing with an unchanged price
    Irregular,
}

impl std::fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RisingOnVolume => write!(f, "量价齐升"),
            Self::FallingOnVolume => write!(f, "量增价跌"),
            Self::FallingOnLowVolume => write!(f, "量价齐跌"),
            Self::RisingOnLowVolume => write!(f, "无量上涨"),
            Self::Steady => write!(f, "量价平稳"),
            Self::Irregular => write!(f, "量能异动"),
        }
    }
}

/// Volume summary for the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeAnalysis {
    /// Mean volume of every bar except the latest
    pub avg_volume: f64,
    pub latest_volume: f64,
    /// Latest volume vs the previous bar (%)
    pub volume_change_pct: f64,
    /// Latest close vs the previous close (%)
    pub price_change_pct: f64,
    pub trend: VolumeTrend,
}

fn pct_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

fn classify(volume_change: f64, price_change: f64) -> VolumeTrend {
    if volume_change > VOLUME_SWING_PCT && price_change > 0.0 {
        VolumeTrend::RisingOnVolume
    } else if volume_change > VOLUME_SWING_PCT && price_change < 0.0 {
        VolumeTrend::FallingOnVolume
    } else if volume_change < -VOLUME_SWING_PCT && price_change < 0.0 {
        VolumeTrend::FallingOnLowVolume
    } else if volume_change < -VOLUME_SWING_PCT && price_change > 0.0 {
        VolumeTrend::RisingOnLowVolume
    } else if volume_change.abs() <= VOLUME_SWING_PCT {
        VolumeTrend::Steady
    } else {
        VolumeTrend::Irregular
    }
}

/// Analyze volume of the latest bar. Needs two bars.
pub fn analyze_volume(series: &PriceSeries) -> Result<VolumeAnalysis> {
    let points = series.points();
    let n = points.len();
    if n < 2 {
        return Err(Error::insufficient("volume", 2, n));
    }

    let history = &points[..n - 1];
    let avg_volume = history.iter().map(|p| p.volume).sum::<f64>() / history.len() as f64;
    let latest = &points[n - 1];
    let prev = &points[n - 2];

    let volume_change_pct = pct_change(latest.volume, prev.volume);
    let price_change_pct = pct_change(latest.close, prev.close);

    Ok(VolumeAnalysis {
        avg_volume,
        latest_volume: latest.volume,
        volume_change_pct,
        price_change_pct,
        trend: classify(volume_change_pct, price_change_pct),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn series(bars: &[(f64, f64)]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = bars
            .iter()
            .zip(start.iter_days())
            .map(|(&(close, volume), date)| PricePoint::flat(date, close, volume))
            .collect();
        PriceSeries::new("000001.SZ", points).unwrap()
    }

    #[test_case(10.0, 11.0, 100.0, 150.0, VolumeTrend::RisingOnVolume ; "rising on volume")]
    #[test_case(10.0, 9.0, 100.0, 150.0, VolumeTrend::FallingOnVolume ; "falling on volume")]
    #[test_case(10.0, 9.0, 100.0, 50.0, VolumeTrend::FallingOnLowVolume ; "falling on low volume")]
    #[test_case(10.0, 11.0, 100.0, 50.0, VolumeTrend::RisingOnLowVolume ; "rising on low volume")]
    #[test_case(10.0, 11.0, 100.0, 110.0, VolumeTrend::Steady ; "steady")]
    #[test_case(10.0, 10.0, 100.0, 150.0, VolumeTrend::Irregular ; "irregular")]
    fn test_volume_trend(prev_close: f64, close: f64, prev_vol: f64, vol: f64, expected: VolumeTrend) {
        let analysis = analyze_volume(&series(&[(prev_close, prev_vol), (close, vol)])).unwrap();
        assert_eq!(analysis.trend, expected);
    }

    #[test]
    fn test_volume_average_excludes_latest() {
        let analysis =
            analyze_volume(&series(&[(10.0, 100.0), (10.0, 200.0), (10.0, 900.0)])).unwrap();
        assert_eq!(analysis.avg_volume, 150.0);
        assert_eq!(analysis.latest_volume, 900.0);
        assert_eq!(analysis.volume_change_pct, 350.0);
    }

    #[test]
    fn test_volume_needs_two_bars() {
        let err = analyze_volume(&series(&[(10.0, 100.0)])).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
