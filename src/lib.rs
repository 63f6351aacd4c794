pub mod cache;
pub mod config;
pub mod errors;
pub mod language;
pub mod logging;
pub mod lyrics;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod source;
pub mod theme;
