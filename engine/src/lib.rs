// Engine library root

pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod output;
pub mod services;
pub mod timeframe;
