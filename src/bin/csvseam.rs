use clap::Parser;
use csvseam_core::cli::{self, Cli};
use std::process;

fn main() {
    let cli = Cli::parse();
    match cli::run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}
