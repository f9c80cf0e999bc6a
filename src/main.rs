// langfront: translate a source file and print the resolved tree

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as _;

use langfront::parser::display::format_program;

#[derive(clap::Parser)]
#[command(name = "langfront")]
#[command(about = "Parse, scope and type-check a source file", long_about = None)]
struct Cli {
    /// Source file to translate; standard input when omitted
    file: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let source = match read_source(cli.file.as_ref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match langfront::translate(&source) {
        Ok(program) => {
            log::info!("translated {} declarations", program.declarations.len());
            print!("{}", format_program(&program));
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_source(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
