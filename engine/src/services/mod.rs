pub mod dashboard;

pub use dashboard::{Connection, ConnectionReport, Dashboard, TradeDashboard};
