pub mod band;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod http;
pub mod navigation;
pub mod notify;
pub mod platform;
pub mod session;
pub mod simulate;
pub mod telemetry;
