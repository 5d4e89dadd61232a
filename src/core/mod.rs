pub mod catalog;
pub mod collector;
pub mod command_builder;
pub mod context;
pub mod suffix_policy;
