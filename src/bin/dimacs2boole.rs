use std::{
    fs,
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
    process::exit,
};

use clap::Parser as ClapParser;

use limboole::{dimacs_to_boole, ConvertError};

/// Translates CNF in DIMACS format into a formula accepted by limboole
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (default <stdin>)
    #[arg(value_name = "file-name")]
    input: Option<PathBuf>,
}

fn die(msg: impl std::fmt::Display) -> ! {
    eprintln!("*** dimacs2boole: {}", msg);
    exit(1);
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let (name, input) = match &args.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(input) => (path.display().to_string(), input),
            Err(_) => die(format!("can not read '{}'", path.display())),
        },
        None => {
            let mut input = String::new();
            if io::stdin().read_to_string(&mut input).is_err() {
                die("can not read '<stdin>'");
            }
            ("<stdin>".to_string(), input)
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let res = dimacs_to_boole(&input, &mut out)
        .and_then(|_| out.flush().map_err(ConvertError::from));
    match res {
        Ok(()) => {}
        Err(err @ ConvertError::Syntax { .. }) => {
            die(format!("syntax error:\n{}:{}", name, err))
        }
        Err(err) => die(err),
    }
}
