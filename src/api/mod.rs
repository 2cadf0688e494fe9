use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::{FinancialBundle, PriceBar, Statistics};

/// Ticker universe a provider can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickerGroup {
    Sp500,
    Dow,
    Nasdaq,
    Other,
}

impl TickerGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickerGroup::Sp500 => "sp500",
            TickerGroup::Dow => "dow",
            TickerGroup::Nasdaq => "nasdaq",
            TickerGroup::Other => "other",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "sp500" => Some(TickerGroup::Sp500),
            "dow" => Some(TickerGroup::Dow),
            "nasdaq" => Some(TickerGroup::Nasdaq),
            "other" => Some(TickerGroup::Other),
            _ => None,
        }
    }

    /// Parses a list of group names. Unknown names are logged and skipped,
    /// never fatal.
    pub fn parse_list<'a, I>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| match Self::parse(name) {
                Some(group) => Some(group),
                None => {
                    warn!(group = name, "unknown ticker group, skipping");
                    None
                }
            })
            .collect()
    }
}

/// Sampling interval for historical price requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    Daily,
    #[default]
    Weekly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
        }
    }
}

/// Market-data collaborator the screening core reads from.
///
/// Implementations own all network and session concerns; the core only sees
/// already-materialized tables. Fetch failures surface as
/// [`Error::Provider`](crate::error::Error::Provider) and are treated as
/// recoverable by the batch layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Sorted union of the tickers in the requested groups.
    async fn list_tickers(&self, groups: &[TickerGroup]) -> Result<BTreeSet<String>>;

    /// Historical OHLCV bars for one ticker, ordered by date ascending.
    async fn historical_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PriceBar>>;

    /// Balance sheet, income statement, and cash flow for one ticker.
    async fn financial_statements(&self, ticker: &str, yearly: bool) -> Result<FinancialBundle>;

    /// Snapshot statistics (shares outstanding and friends) for one ticker.
    async fn statistics(&self, ticker: &str) -> Result<Statistics>;
}
