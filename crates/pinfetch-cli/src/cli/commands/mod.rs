//! CLI command handlers, one per file.

mod completions;
mod fetch;
mod pins;
mod thumbprint;

pub use completions::run_completions;
pub use fetch::{run_fetch, FetchArgs};
pub use pins::run_pins;
pub use thumbprint::run_thumbprint;
