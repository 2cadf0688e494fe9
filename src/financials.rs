use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::growth::add_growth_rate;
use crate::models::{parse_share_count, FinancialBundle, StatementTable, Statistics, SHARES_OUTSTANDING};

// Source line items the derivations read.
pub const TOTAL_ASSETS: &str = "totalAssets";
pub const TOTAL_LIAB: &str = "totalLiab";
pub const INTANGIBLE_ASSETS: &str = "intangibleAssets";
pub const GOODWILL: &str = "goodWill";
pub const NET_INCOME: &str = "netIncome";
pub const COMMON_STOCK: &str = "commonStock";
pub const TOTAL_REVENUE: &str = "totalRevenue";

// Rows the derivations append.
pub const BOOK_VALUE: &str = "bookValue";
pub const EARNINGS_PER_SHARE: &str = "earningsPerShare";
pub const SALES_PER_SHARE: &str = "salesPerShare";

/// The three financial statements for one ticker and reporting period,
/// plus the derived valuation rows once computed.
///
/// Book value lands on the balance sheet; EPS and SPS land on the income
/// statement. Each derived metric gets a companion `...GrowthRate` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub ticker: String,
    /// Reporting cadence label, e.g. "yearly" or "quarter".
    pub fiscal_period: Option<String>,
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
}

impl FinancialStatements {
    pub fn new(
        ticker: impl Into<String>,
        fiscal_period: Option<String>,
        bundle: FinancialBundle,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            fiscal_period,
            balance_sheet: bundle.balance_sheet,
            income_statement: bundle.income_statement,
            cash_flow: bundle.cash_flow,
        }
    }

    /// Book value per period: total assets minus total liabilities,
    /// intangibles, and goodwill. Appends `bookValue` and its growth rate
    /// to the balance sheet.
    pub fn compute_book_value(&mut self) -> Result<()> {
        if self.balance_sheet.is_empty() {
            return Err(Error::missing("balance sheet not populated"));
        }
        let assets = self.balance_row(TOTAL_ASSETS)?;
        let liabilities = self.balance_row(TOTAL_LIAB)?;
        let intangibles = self.balance_row(INTANGIBLE_ASSETS)?;
        let goodwill = self.balance_row(GOODWILL)?;

        let book_value: Vec<f64> = (0..assets.len())
            .map(|i| assets[i] - liabilities[i] - intangibles[i] - goodwill[i])
            .collect();

        self.balance_sheet.add_row(BOOK_VALUE, book_value)?;
        add_growth_rate(&mut self.balance_sheet, BOOK_VALUE)
    }

    /// Earnings per share per period: net income over common stock, with
    /// common stock standing in for share count. A zero divisor yields NaN
    /// for that period, not an error. Appends `earningsPerShare` and its
    /// growth rate to the income statement.
    pub fn compute_eps(&mut self) -> Result<()> {
        self.require_aligned_statements()?;
        let net_income = self
            .income_statement
            .row(NET_INCOME)
            .ok_or_else(|| Error::missing(format!("income statement row '{NET_INCOME}'")))?
            .to_vec();
        let common_stock = self.balance_row(COMMON_STOCK)?;

        // Align the balance-sheet divisor to the income statement's
        // period order; the two tables may be presented differently.
        let eps: Vec<f64> = self
            .income_statement
            .periods()
            .iter()
            .enumerate()
            .map(|(i, period)| {
                let at = self
                    .balance_sheet
                    .periods()
                    .iter()
                    .position(|p| p == period)
                    .expect("period sets verified equal");
                safe_div(net_income[i], common_stock[at])
            })
            .collect();

        self.income_statement.add_row(EARNINGS_PER_SHARE, eps)?;
        add_growth_rate(&mut self.income_statement, EARNINGS_PER_SHARE)
    }

    /// Sales per share per period: total revenue over shares outstanding.
    ///
    /// `raw_shares` is the provider's snapshot figure, accepted as a plain
    /// number or with an `M`/`B` suffix; anything else is a caller error.
    /// The single snapshot count is applied across every historical period,
    /// a documented approximation of the source data (only one point-in-time
    /// value is available from the statistics table).
    pub fn compute_sps(&mut self, raw_shares: &str) -> Result<()> {
        let shares = parse_share_count(raw_shares)?;
        if self.income_statement.is_empty() {
            return Err(Error::missing("income statement not populated"));
        }
        let revenue = self
            .income_statement
            .row(TOTAL_REVENUE)
            .ok_or_else(|| Error::missing(format!("income statement row '{TOTAL_REVENUE}'")))?;

        let sps: Vec<f64> = revenue.iter().map(|&r| safe_div(r, shares)).collect();

        self.income_statement.add_row(SALES_PER_SHARE, sps)?;
        add_growth_rate(&mut self.income_statement, SALES_PER_SHARE)
    }

    /// Runs every derivation in order: book value, then EPS, then SPS with
    /// the shares figure from `statistics`.
    ///
    /// An unpopulated statistics table or a missing shares-outstanding
    /// entry fails before any derivation runs. A derivation that hits
    /// missing statement data is logged and skipped; the rest still run.
    /// Invalid input always propagates.
    pub fn compute_all_derived(&mut self, statistics: &Statistics) -> Result<()> {
        if statistics.is_empty() {
            return Err(Error::missing("statistics table not populated"));
        }
        let raw_shares = statistics
            .get(SHARES_OUTSTANDING)
            .ok_or_else(|| Error::missing(format!("statistic '{SHARES_OUTSTANDING}'")))?
            .to_string();

        let ticker = self.ticker.clone();
        skip_recoverable(&ticker, BOOK_VALUE, self.compute_book_value())?;
        skip_recoverable(&ticker, EARNINGS_PER_SHARE, self.compute_eps())?;
        skip_recoverable(&ticker, SALES_PER_SHARE, self.compute_sps(&raw_shares))?;
        Ok(())
    }

    fn balance_row(&self, name: &str) -> Result<Vec<f64>> {
        self.balance_sheet
            .row(name)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| Error::missing(format!("balance sheet row '{name}'")))
    }

    fn require_aligned_statements(&self) -> Result<()> {
        if self.balance_sheet.is_empty() {
            return Err(Error::missing("balance sheet not populated"));
        }
        if self.income_statement.is_empty() {
            return Err(Error::missing("income statement not populated"));
        }
        if !self.balance_sheet.same_periods(&self.income_statement) {
            return Err(Error::missing(
                "balance sheet and income statement cover different periods",
            ));
        }
        Ok(())
    }
}

/// Division with NaN instead of IEEE infinity on a zero divisor.
fn safe_div(numerator: f64, divisor: f64) -> f64 {
    if divisor == 0.0 {
        f64::NAN
    } else {
        numerator / divisor
    }
}

fn skip_recoverable(ticker: &str, derivation: &str, result: Result<()>) -> Result<()> {
    match result {
        Err(err) if err.is_recoverable() => {
            warn!(ticker, derivation, error = %err, "skipping derivation");
            Ok(())
        }
        other => other,
    }
}
