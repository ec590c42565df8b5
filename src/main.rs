use clap::Parser;
use initial_communities::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    match cli::run(&args) {
        Ok(_dataset) => {
            // Report already printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
