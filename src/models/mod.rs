pub mod config;
pub mod currency;
pub mod experience;
pub mod stats;
pub mod vacancy;
