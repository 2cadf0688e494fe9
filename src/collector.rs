use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::api::{Interval, MarketDataProvider};
use crate::error::Result;
use crate::financials::FinancialStatements;
use crate::models::Config;
use crate::prices::PriceSeries;
use crate::stock::{Stock, MOST_RECENT};
use crate::utils::lookback_range;

/// Sequential fetch-and-derive pipeline over a market-data provider.
///
/// Each ticker is processed independently in a single pass: prices first,
/// then statements, then statistics, then the derivations. Recoverable
/// failures (provider misses, missing tables) are logged and leave the
/// corresponding field unset; only caller bugs abort a batch.
pub struct StockCollector<P> {
    provider: P,
    config: Config,
}

impl<P: MarketDataProvider> StockCollector<P> {
    pub fn new(provider: P, config: Config) -> Self {
        Self { provider, config }
    }

    /// The configured ticker universe, sorted and deduplicated.
    pub async fn list_universe(&self) -> Result<BTreeSet<String>> {
        self.provider
            .list_tickers(&self.config.ticker_groups)
            .await
    }

    /// Fetches and derives everything for one ticker.
    ///
    /// Always returns a `Stock`; fields a recoverable failure touched stay
    /// unset. `InvalidInput` (bad SMA window config, unparseable shares
    /// figure) propagates.
    pub async fn collect(&self, ticker: &str) -> Result<Stock> {
        let mut stock = Stock::new(ticker);

        let (start, end) = lookback_range(self.config.lookback_years);
        match self
            .provider
            .historical_prices(ticker, start, end, Interval::Weekly)
            .await
        {
            Ok(bars) => {
                let mut series =
                    PriceSeries::new(ticker, end, self.config.lookback_years, bars);
                series.compute_sma(&self.config.sma_windows)?;
                series.compute_52_week_high();
                series.compute_52_week_low();
                info!(ticker, bars = series.bars().len(), "fetched historical prices");
                stock.attach_price_history(series);
            }
            Err(err) if err.is_recoverable() => {
                warn!(ticker, error = %err, "no historical prices");
            }
            Err(err) => return Err(err),
        }

        let yearly = self.config.yearly_statements;
        match self.provider.financial_statements(ticker, yearly).await {
            Ok(bundle) => {
                let cadence = if yearly { "yearly" } else { "quarter" };
                info!(ticker, cadence, "fetched financial statements");
                stock.attach_financials(
                    MOST_RECENT,
                    FinancialStatements::new(ticker, Some(cadence.to_string()), bundle),
                );
            }
            Err(err) if err.is_recoverable() => {
                warn!(ticker, error = %err, "no financial statements");
            }
            Err(err) => return Err(err),
        }

        match self.provider.statistics(ticker).await {
            Ok(statistics) => stock.attach_statistics(statistics),
            Err(err) if err.is_recoverable() => {
                warn!(ticker, error = %err, "no statistics");
            }
            Err(err) => return Err(err),
        }

        if stock.financials(MOST_RECENT).is_some() {
            match stock.compute_derived_financials(MOST_RECENT) {
                Ok(()) => {}
                // Already logged at the failure site.
                Err(err) if err.is_recoverable() => {}
                Err(err) => return Err(err),
            }
        }

        Ok(stock)
    }

    /// Collects every ticker in sequence.
    ///
    /// One ticker's recoverable failure never aborts the rest: the ticker
    /// still appears in the result with whatever was attached before the
    /// failure.
    pub async fn collect_all(&self, tickers: &[String]) -> Result<BTreeMap<String, Stock>> {
        let mut stocks = BTreeMap::new();
        for ticker in tickers {
            let stock = self.collect(ticker).await?;
            stocks.insert(ticker.clone(), stock);
        }
        Ok(stocks)
    }
}
