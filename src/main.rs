use clap::Parser;
use sentitrade::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
