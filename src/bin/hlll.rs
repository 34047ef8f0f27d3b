use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use hlll::machine;
use hlll::program::Program;

#[derive(Parser)]
#[command(name = "hlll", version, about = "Run HLLL programs")]
struct Cli {
    /// Path to the program file
    program: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let file = match File::open(&cli.program) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "{}",
                format!("Error: cannot open {}: {}", cli.program.display(), e).red()
            );
            return ExitCode::FAILURE;
        }
    };
    let program = match Program::load(&mut BufReader::new(file)) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let mut machine = machine::with_stdio();
    match machine.run(&program) {
        Ok(code) => {
            println!();
            println!("{}", format!("Program exited with code {}", code).green());
            ExitCode::from(code as u8)
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", format!("Error: {}", e).red());
            ExitCode::FAILURE
        }
    }
}
