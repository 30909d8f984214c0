use clap::Parser;
use tradematch::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
