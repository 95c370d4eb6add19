// Data types passed between the installer stages.

// Release-host JSON payloads.
pub mod common;
pub mod platform;
pub mod candidate;
pub mod release;
