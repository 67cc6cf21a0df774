//! CLI command implementations

pub mod check;
pub mod explain;

pub use check::CheckArgs;
pub use explain::ExplainArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report `as jest.Mock` casts and optionally rewrite them
    Check(CheckArgs),

    /// Show detailed explanation for a specific rule
    Explain(ExplainArgs),
}
