pub mod commons;
pub mod generate;
pub mod quick;
