mod cli;
mod convert;
mod error_handling;
mod grammar;
mod parser;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use convert::ConvertError;
use error_handling::Location;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let grammar = match parser::parse_file(&cli.file, cli.start) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    let final_only = cli.final_only;
    let converted = convert::run_pipeline(grammar, &cli.options(), |stage, grammar| {
        if !final_only {
            println!("\n{}", stage);
            print!("{}", grammar);
        }
    });

    match converted {
        Ok(grammar) => {
            if final_only {
                print!("{}", grammar);
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", ConvertError {
                location: Location::whole_file(cli.file),
                error
            });
            ExitCode::FAILURE
        }
    }
}
