// ABOUTME: Command module aggregator for the edgeship CLI.
// ABOUTME: Re-exports deploy, package, invalidate, and status command handlers.

mod deploy;
mod invalidate;
mod package;
mod status;

pub use deploy::deploy;
pub use invalidate::invalidate;
pub use package::package;
pub use status::status;
