//! Per-share ratio helpers.
//!
//! Each returns `None` when the denominator is not positive, so a
//! loss-making company has no PE rather than a PE of zero.

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && numerator.is_finite() && denominator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Price / earnings per share.
pub fn pe_ratio(price: f64, eps: f64) -> Option<f64> {
    ratio(price, eps)
}

/// Price / book value per share.
pub fn pb_ratio(price: f64, bvps: f64) -> Option<f64> {
    ratio(price, bvps)
}

/// Net profit / shareholders' equity (%).
pub fn return_on_equity(net_profit: f64, equity: f64) -> Option<f64> {
    ratio(net_profit, equity).map(|r| r * 100.0)
}

/// Dividend per share / price (%).
pub fn dividend_yield(dividend: f64, price: f64) -> Option<f64> {
    ratio(dividend, price).map(|r| r * 100.0)
}

/// Dividend per share / earnings per share (%).
pub fn payout_ratio(dividend: f64, eps: f64) -> Option<f64> {
    ratio(dividend, eps).map(|r| r * 100.0)
}
