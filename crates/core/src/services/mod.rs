pub mod allocation_service;
pub mod chart_service;
pub mod indicator_service;
pub mod market_data_service;
pub mod portfolio_service;
pub mod scoring_service;
