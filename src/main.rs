use clap::Parser;
use masweep::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
