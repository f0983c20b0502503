pub mod config;
pub mod exchange;
pub mod logging;
pub mod order;
pub mod orders;
