pub mod arguments;
pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod logger;
pub mod poller;
pub mod portfolio;
pub mod rpc;
pub mod run;
pub mod tokens;
pub mod transactions;
