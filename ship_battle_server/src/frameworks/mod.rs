// Frameworks layer: process bootstrap and runtime settings.

pub mod config;
pub mod server;
