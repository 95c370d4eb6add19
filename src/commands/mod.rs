// Register application subcommands.
// Each module corresponds to one `mtest-install` command-line action.

// Downloads and installs the runtime binary (the default action).
pub mod install;
// Shows the candidate artifacts without downloading them.
pub mod plan;
// Verifies an existing installation.
pub mod check;
// Displays the installer version and platform target.
pub mod version;
