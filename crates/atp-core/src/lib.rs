// Library root: data loading, filter reconciliation, aggregation, ranking
// and the per-page renderers shared by the dashboard front end.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod data;
pub mod filter;
pub mod pages;
pub mod ranking;
