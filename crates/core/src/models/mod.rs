pub mod analysis;
pub mod asset;
pub mod chart;
pub mod config;
pub mod fundamentals;
pub mod holding;
pub mod indicators;
pub mod price;
