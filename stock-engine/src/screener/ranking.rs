//! Single-metric ranking of fundamental records.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data::FundamentalRecord;

/// Metric to rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    Roe,
    Pe,
    DividendYield,
}

impl RankKey {
    fn value(&self, record: &FundamentalRecord) -> Option<f64> {
        let value = match self {
            Self::Roe => record.roe,
            Self::Pe => record.pe,
            Self::DividendYield => record.dividend_yield,
        };
        value.filter(|v| !v.is_nan())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Stable sort by `key`, truncated to `top_n`.
///
/// Records without the metric (or with NaN) go last in either order.
pub fn rank_by(
    records: &[FundamentalRecord],
    key: RankKey,
    order: SortOrder,
    top_n: usize,
) -> Vec<FundamentalRecord> {
    let mut ranked: Vec<&FundamentalRecord> = records.iter().collect();
    ranked.sort_by(|a, b| match (key.value(a), key.value(b)) {
        (Some(x), Some(y)) => {
            let ord = x.total_cmp(&y);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked.into_iter().take(top_n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<FundamentalRecord> {
        vec![
            FundamentalRecord::new("A", "A").with_roe(12.0).with_pe(20.0),
            FundamentalRecord::new("B", "B").with_pe(8.0),
            FundamentalRecord::new("C", "C").with_roe(25.0).with_pe(30.0),
            FundamentalRecord::new("D", "D").with_roe(12.0),
        ]
    }

    fn codes(records: &[FundamentalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn test_rank_descending_missing_last() {
        let ranked = rank_by(&records(), RankKey::Roe, SortOrder::Descending, 10);
        assert_eq!(codes(&ranked), vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_rank_ascending_missing_last() {
        let ranked = rank_by(&records(), RankKey::Pe, SortOrder::Ascending, 10);
        assert_eq!(codes(&ranked), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_rank_is_stable_and_truncated() {
        let ranked = rank_by(&records(), RankKey::Roe, SortOrder::Ascending, 2);
        // A and D tie on ROE 12 and keep input order
        assert_eq!(codes(&ranked), vec!["A", "D"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_by(&[], RankKey::DividendYield, SortOrder::Descending, 5).is_empty());
    }
}
