use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::PriceBar;

/// Rows per "52-week" window. The series is weekly-sampled, so the slice is
/// positional; irregular sampling (holidays, missing weeks) is not
/// compensated for.
const FIFTY_TWO_WEEK_ROWS: usize = 52;

/// Trading days per weekly sample, used to label SMA columns by day count.
const TRADING_DAYS_PER_WEEK: usize = 5;

/// Historical price series for one ticker, plus its derived fields.
///
/// Bars are ordered by date ascending with unique dates. Derived moving
/// averages live in `derived` as appended columns, one value per bar;
/// appending never removes existing columns. The 52-week fields stay `None`
/// until their compute methods run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub source_date: NaiveDate,
    pub lookback_years: i32,
    bars: Vec<PriceBar>,
    derived: BTreeMap<String, Vec<f64>>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl PriceSeries {
    pub fn new(
        ticker: impl Into<String>,
        source_date: NaiveDate,
        lookback_years: i32,
        bars: Vec<PriceBar>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            source_date,
            lookback_years,
            bars,
            derived: BTreeMap::new(),
            fifty_two_week_high: None,
            fifty_two_week_low: None,
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// A derived column (e.g. `SMA50`), one value per bar, if computed.
    pub fn derived_column(&self, name: &str) -> Option<&[f64]> {
        self.derived.get(name).map(Vec::as_slice)
    }

    /// Sets the 52-week high: the maximum of `high` over the last 52 bars
    /// (all bars when fewer exist). An empty series logs a warning and
    /// leaves the field unset.
    pub fn compute_52_week_high(&mut self) {
        match self.trailing_year() {
            Some(slice) => {
                self.fifty_two_week_high =
                    Some(slice.iter().map(|bar| bar.high).fold(f64::MIN, f64::max));
            }
            None => warn!(ticker = %self.ticker, "empty price series, skipping 52wk high"),
        }
    }

    /// Sets the 52-week low from the minimum of `low`, same slice rules as
    /// [`compute_52_week_high`](Self::compute_52_week_high).
    pub fn compute_52_week_low(&mut self) {
        match self.trailing_year() {
            Some(slice) => {
                self.fifty_two_week_low =
                    Some(slice.iter().map(|bar| bar.low).fold(f64::MAX, f64::min));
            }
            None => warn!(ticker = %self.ticker, "empty price series, skipping 52wk low"),
        }
    }

    fn trailing_year(&self) -> Option<&[PriceBar]> {
        if self.bars.is_empty() {
            return None;
        }
        let start = self.bars.len().saturating_sub(FIFTY_TWO_WEEK_ROWS);
        Some(&self.bars[start..])
    }

    /// Appends one simple-moving-average column per window.
    ///
    /// Each window is a week count over the weekly-sampled `close` column;
    /// the resulting column is named by its day equivalent (window 10 →
    /// `SMA50`). Positions before `window - 1` have no full window and hold
    /// NaN. An empty window list or a zero window is a caller error.
    pub fn compute_sma(&mut self, windows: &[usize]) -> Result<()> {
        if windows.is_empty() {
            return Err(Error::InvalidInput(
                "SMA windows must be a non-empty list of week counts".into(),
            ));
        }
        if let Some(zero) = windows.iter().find(|w| **w == 0) {
            return Err(Error::InvalidInput(format!(
                "SMA window must be a positive week count, got {zero}"
            )));
        }

        for &window in windows {
            let column = rolling_mean(&self.bars, window);
            let name = format!("SMA{}", window * TRADING_DAYS_PER_WEEK);
            self.derived.insert(name, column);
        }
        Ok(())
    }
}

fn rolling_mean(bars: &[PriceBar], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    let mut sum = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i + 1 > window {
            sum -= bars[i - window].close;
        }
        if i + 1 >= window {
            out[i] = sum / window as f64;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn weekly_bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::weeks(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        PriceSeries::new("TEST", today, 20, weekly_bars(closes))
    }

    #[test]
    fn fifty_two_week_high_uses_last_52_rows() {
        // 60 bars; the peak sits outside the trailing 52 and must not count.
        let mut closes = vec![500.0];
        closes.extend((0..59).map(|i| 100.0 + i as f64));
        let mut s = series(&closes);
        // Highs are close + 1; bar 0 (high 501) is outside the window of
        // the last 52 bars (indices 8..60).
        s.compute_52_week_high();
        assert_eq!(s.fifty_two_week_high, Some(100.0 + 58.0 + 1.0));
    }

    #[test]
    fn short_series_uses_all_rows() {
        let mut s = series(&[10.0, 30.0, 20.0]);
        s.compute_52_week_high();
        s.compute_52_week_low();
        assert_eq!(s.fifty_two_week_high, Some(31.0));
        assert_eq!(s.fifty_two_week_low, Some(9.0));
    }

    #[test]
    fn empty_series_leaves_fields_unset() {
        let mut s = series(&[]);
        s.compute_52_week_high();
        s.compute_52_week_low();
        assert_eq!(s.fifty_two_week_high, None);
        assert_eq!(s.fifty_two_week_low, None);
    }

    #[test]
    fn constant_close_sma_is_constant_after_warmup() {
        let mut s = series(&[42.0; 12]);
        s.compute_sma(&[10]).unwrap();

        let sma = s.derived_column("SMA50").unwrap();
        assert_eq!(sma.len(), 12);
        for value in &sma[..9] {
            assert!(value.is_nan());
        }
        for value in &sma[9..] {
            assert_eq!(*value, 42.0);
        }
    }

    #[test]
    fn each_window_yields_an_independent_column() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let mut s = series(&closes);
        s.compute_sma(&[10, 30, 40]).unwrap();

        assert!(s.derived_column("SMA50").is_some());
        assert!(s.derived_column("SMA150").is_some());
        assert!(s.derived_column("SMA200").is_some());

        // 10-week mean of 31..=40 is 35.5.
        let sma50 = s.derived_column("SMA50").unwrap();
        assert_eq!(sma50[39], 35.5);
        // The 40-week window only fills the final position.
        let sma200 = s.derived_column("SMA200").unwrap();
        assert!(sma200[38].is_nan());
        assert_eq!(sma200[39], 20.5);
    }

    #[test]
    fn sma_rejects_empty_and_zero_windows() {
        let mut s = series(&[1.0, 2.0, 3.0]);
        assert_matches!(s.compute_sma(&[]), Err(Error::InvalidInput(_)));
        assert_matches!(s.compute_sma(&[10, 0]), Err(Error::InvalidInput(_)));
    }

    #[test]
    fn sma_shorter_history_than_window_is_all_nan() {
        let mut s = series(&[1.0, 2.0, 3.0]);
        s.compute_sma(&[10]).unwrap();
        assert!(s.derived_column("SMA50").unwrap().iter().all(|v| v.is_nan()));
    }
}
