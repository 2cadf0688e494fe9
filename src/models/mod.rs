use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::TickerGroup;
use crate::error::{Error, Result};

/// One sampled price bar from the provider's historical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Financial-statement table: line items (rows) by fiscal periods (columns).
///
/// Period labels are chronologically sortable strings (ISO dates in
/// practice); the table may be presented in either ascending or descending
/// period order and keeps whatever order it was built with. Rows are
/// append-only: derived rows are added by the computation layer and must not
/// collide with source line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    periods: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl StatementTable {
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            rows: Vec::new(),
        }
    }

    /// Period labels in presentation order.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(n, _)| n.as_str())
    }

    /// Appends a row with one value per period, in presentation order.
    ///
    /// A row name that already exists or a value count that does not match
    /// the period count is a caller error.
    pub fn add_row(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.periods.len() {
            return Err(Error::InvalidInput(format!(
                "row '{}' has {} values for {} periods",
                name,
                values.len(),
                self.periods.len()
            )));
        }
        if self.row(&name).is_some() {
            return Err(Error::InvalidInput(format!(
                "row '{}' already exists",
                name
            )));
        }
        self.rows.push((name, values));
        Ok(())
    }

    /// True when both tables cover the same period set, in any order.
    pub fn same_periods(&self, other: &StatementTable) -> bool {
        let mut a: Vec<&String> = self.periods.iter().collect();
        let mut b: Vec<&String> = other.periods.iter().collect();
        a.sort();
        b.sort();
        a == b
    }
}

/// The three statements the provider returns for one ticker and period kind.
#[derive(Debug, Clone)]
pub struct FinancialBundle {
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
}

/// Snapshot statistics for one ticker (shares outstanding, float, ...).
///
/// Values arrive from the provider as text; numeric attributes may carry a
/// magnitude suffix (`M` = 1e6, `B` = 1e9).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    values: BTreeMap<String, String>,
}

pub const SHARES_OUTSTANDING: &str = "sharesOutstanding";

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The shares-outstanding figure, normalized to a plain count.
    pub fn shares_outstanding(&self) -> Result<f64> {
        let raw = self.get(SHARES_OUTSTANDING).ok_or(Error::Lookup {
            kind: "statistic",
            key: SHARES_OUTSTANDING.to_string(),
        })?;
        parse_share_count(raw)
    }
}

/// Normalizes a shares-outstanding figure: plain numbers pass through,
/// `M` and `B` suffixes scale by 1e6 / 1e9. Anything else is a hard input
/// error, never a silent default.
pub fn parse_share_count(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let (digits, scale) = match raw.chars().last() {
        Some('M') => (&raw[..raw.len() - 1], 1e6),
        Some('B') => (&raw[..raw.len() - 1], 1e9),
        _ => (raw, 1.0),
    };
    digits
        .parse::<f64>()
        .map(|n| n * scale)
        .map_err(|_| Error::InvalidInput(format!("unparseable share count '{raw}'")))
}

/// Screener configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub lookback_years: i32,
    pub ticker_groups: Vec<TickerGroup>,
    pub sma_windows: Vec<usize>,
    pub yearly_statements: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookback_years: 20,
            ticker_groups: vec![TickerGroup::Sp500],
            sma_windows: vec![10, 30, 40],
            yearly_statements: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above. Reads `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let lookback_years = match std::env::var("LOOKBACK_YEARS") {
            Ok(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("LOOKBACK_YEARS must be an integer, got '{v}'"))?,
            Err(_) => defaults.lookback_years,
        };

        let ticker_groups = match std::env::var("TICKER_GROUPS") {
            Ok(v) => TickerGroup::parse_list(v.split(',')),
            Err(_) => defaults.ticker_groups,
        };

        let sma_windows = match std::env::var("SMA_WINDOWS") {
            Ok(v) => v
                .split(',')
                .map(|w| {
                    w.trim()
                        .parse()
                        .map_err(|_| anyhow::anyhow!("SMA_WINDOWS entry '{w}' is not a week count"))
                })
                .collect::<anyhow::Result<Vec<usize>>>()?,
            Err(_) => defaults.sma_windows,
        };

        let yearly_statements = match std::env::var("YEARLY_STATEMENTS") {
            Ok(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("YEARLY_STATEMENTS must be true/false, got '{v}'"))?,
            Err(_) => defaults.yearly_statements,
        };

        Ok(Config {
            lookback_years,
            ticker_groups,
            sma_windows,
            yearly_statements,
        })
    }
}
