//! Lightweight equity screening.
//!
//! Fetches historical prices and financial statements for a set of tickers
//! through a pluggable [`api::MarketDataProvider`], then derives the fields
//! an analyst screens on: simple moving averages, 52-week high/low, book
//! value, earnings per share, sales per share, and their period-over-period
//! growth rates.
//!
//! The computation layer is synchronous and operates on already-materialized
//! tables; all network concerns live behind the provider trait.

pub mod api;
pub mod collector;
pub mod error;
pub mod financials;
pub mod growth;
pub mod models;
pub mod prices;
pub mod stock;
pub mod utils;

pub use collector::StockCollector;
pub use error::{Error, Result};
pub use financials::FinancialStatements;
pub use models::{Config, FinancialBundle, PriceBar, StatementTable, Statistics};
pub use prices::PriceSeries;
pub use stock::{Stock, MOST_RECENT};
