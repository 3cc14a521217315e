pub mod aggregator;
pub mod backgrounds;
pub mod command;
pub mod hardware;
pub mod network;
pub mod probe;
pub mod quotes;
pub mod service_checker;
pub mod vpn;
