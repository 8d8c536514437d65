pub mod aggregator;
pub mod batch;
pub mod query;
pub mod ranking;
