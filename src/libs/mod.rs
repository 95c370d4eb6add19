// Installer logic that sits between the command line and the low-level utilities.

pub mod candidates;
pub mod config;
pub mod errors;
pub mod paths;
pub mod release_client;
pub mod release_resolver;
pub mod utilities;
