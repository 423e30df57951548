//! Pricing catalog access and cost calculation for llmcost
//!
//! This crate fetches the model catalog, keeps a time-boxed local copy of it,
//! resolves currency conversion rates and calculates request costs.

pub mod cache_store;
pub mod catalog;
pub mod cost_calculator;
pub mod currency;
pub mod gateway;

pub use cache_store::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use catalog::{CatalogSource, HttpCatalog};
pub use cost_calculator::CostCalculator;
pub use currency::{Currency, CurrencyConverter, ExchangeRateApi, RateSource};
pub use gateway::{CatalogOrigin, LoadedCatalog, PricingGateway};
