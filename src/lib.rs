pub mod browser;
pub mod capture;
pub mod cli;
pub mod config;
pub mod logger;
pub mod output;
pub mod pdf;
pub mod slug;
pub mod style;
pub mod webpage;
