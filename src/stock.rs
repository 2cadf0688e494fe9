use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::financials::FinancialStatements;
use crate::models::Statistics;
use crate::prices::PriceSeries;

/// Default label for the most recently fetched statement set.
pub const MOST_RECENT: &str = "most-recent";

/// One ticker with whatever data has been attached to it so far.
///
/// Fields start empty and are populated by explicit attach calls; multiple
/// statement sets may coexist under caller-chosen period labels for
/// comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stock {
    pub ticker: String,
    pub price: Option<PriceSeries>,
    pub financials: HashMap<String, FinancialStatements>,
    pub statistics: Option<Statistics>,
}

impl Stock {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn attach_price_history(&mut self, series: PriceSeries) {
        self.price = Some(series);
    }

    pub fn attach_financials(&mut self, period: impl Into<String>, statements: FinancialStatements) {
        self.financials.insert(period.into(), statements);
    }

    pub fn attach_statistics(&mut self, statistics: Statistics) {
        self.statistics = Some(statistics);
    }

    pub fn financials(&self, period: &str) -> Option<&FinancialStatements> {
        self.financials.get(period)
    }

    /// Runs every derivation on the statement set stored under `period`,
    /// using the attached statistics for the shares-outstanding figure.
    ///
    /// An unknown period label or missing statistics is recoverable: it is
    /// logged here and reported to the caller, leaving the stock untouched.
    pub fn compute_derived_financials(&mut self, period: &str) -> Result<()> {
        let statistics = match &self.statistics {
            Some(stats) => stats.clone(),
            None => {
                warn!(ticker = %self.ticker, "no statistics attached, skipping derivations");
                return Err(Error::missing("statistics"));
            }
        };
        let statements = match self.financials.get_mut(period) {
            Some(statements) => statements,
            None => {
                warn!(ticker = %self.ticker, period, "unknown statement period");
                return Err(Error::Lookup {
                    kind: "period",
                    key: period.to_string(),
                });
            }
        };
        statements.compute_all_derived(&statistics)
    }
}
