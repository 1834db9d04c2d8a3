pub mod charts;
pub mod engine;
pub mod fetch;
pub mod filter;
pub mod infra;
pub mod output;
pub mod parser;
pub mod reference;
pub mod services;
pub mod stats;
