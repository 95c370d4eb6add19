// Building blocks shared by the installer stages.
// Each module does one thing and knows nothing about the candidate loop.

// Host detection, the supported platform matrix and the name alias tables.
pub mod platform;
// Scoring of release-host asset names.
pub mod assets;
// HTTP agent and file downloads.
pub mod download;
// tar.gz and zip extraction.
pub mod compression;
// Locating the executable and putting it in place.
pub mod binary;
