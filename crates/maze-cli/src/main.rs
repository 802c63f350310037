use clap::Parser;
use maze_cli::{exit_codes, logging, Cli};

fn main() {
    logging::init();
    let cli = Cli::parse();
    match maze_cli::run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(exit_codes::INVALID_INPUT);
        }
    }
}
