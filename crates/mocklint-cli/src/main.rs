//! mocklint CLI - finds `fn as jest.Mock` casts in TypeScript test files and
//! rewrites them to `jest.mocked(fn)`.

mod commands;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "mocklint",
    author,
    version,
    about = "Prefer jest.mocked() over casts to jest.Mock",
    long_about = "mocklint reports `expr as jest.Mock` and `expr as jest.MockedFunction<...>` casts\n\
                  in TypeScript sources and can rewrite them to `jest.mocked(expr)`.\n\n\
                  Configure rules with a mocklint.toml file next to your sources."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Diagnostic log level; RUST_LOG directives are applied on top
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Explain(args) => args.run(),
    }
}
