use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
    process::exit,
    time::Instant,
};

use clap::Parser as ClapParser;
use env_logger::{fmt, Builder, Target};
use log::{Level, LevelFilter, Record};

use limboole::{decode, Driver, Error, Mode, Options};

/// Checks validity or satisfiability of a propositional formula
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Args {
    /// Increase verbosity
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pretty print input formula only
    #[arg(short = 'p')]
    pretty_print: bool,

    /// Dump generated CNF only
    #[arg(short = 'd')]
    dump: bool,

    /// Check satisfiability (default is to check validity)
    #[arg(short = 's')]
    check_satisfiability: bool,

    /// Maximal decision bound, negative values mean unbounded (default unbounded)
    #[arg(short = 'm', value_name = "max-dec", allow_negative_numbers = true)]
    max_decisions: Option<i64>,

    /// Set output file (default <stdout>)
    #[arg(short = 'o', value_name = "out-file")]
    output: Option<PathBuf>,

    /// Set log file, appended to (default <stderr>)
    #[arg(short = 'l', value_name = "log-file")]
    log: Option<PathBuf>,

    /// Input file (default <stdin>)
    #[arg(value_name = "in-file")]
    input: Option<PathBuf>,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version are printed to stdout and are not errors
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            exit(code);
        }
    };
    exit(run(args));
}

fn init_logging(verbose: u8, file: Option<&File>) {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "% {}", record.args())
        } else {
            writeln!(buf, "% {}: {}", record.level(), record.args())
        }
    };

    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = Builder::new();
    builder.format(format).filter(None, level);

    match file.map(File::try_clone) {
        Some(Ok(file)) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        _ => {
            builder.target(Target::Stderr);
        }
    }

    if let Ok(ref env_var) = env::var("RUST_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn options(args: &Args) -> Options {
    let mode = if args.pretty_print {
        Mode::PrettyPrint
    } else if args.dump {
        Mode::Dump
    } else {
        Mode::Solve
    };
    let max_decisions = args
        .max_decisions
        .filter(|m| *m >= 0)
        .map(|m| u32::try_from(m).unwrap_or(u32::MAX));
    Options {
        mode,
        check_satisfiability: args.check_satisfiability,
        max_decisions,
        verbose: args.verbose,
    }
}

/// Runs the tool and returns the exit code.
fn run(args: Args) -> i32 {
    let ts = Instant::now();

    let log_file = match &args.log {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(_) => {
                eprintln!("*** could not append to '{}'", path.display());
                return 1;
            }
        },
        None => None,
    };
    init_logging(args.verbose, log_file.as_ref());
    let mut diagnostics: Box<dyn Write> = match log_file {
        Some(file) => Box::new(file),
        None => Box::new(io::stderr()),
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(_) => {
                let _ = writeln!(diagnostics, "*** could not write '{}'", path.display());
                return 1;
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let (name, input) = match &args.input {
        Some(path) => match fs::read(path) {
            Ok(input) => (path.display().to_string(), input),
            Err(_) => {
                let _ = writeln!(diagnostics, "*** could not read '{}'", path.display());
                return 1;
            }
        },
        None => {
            let mut input = Vec::new();
            if io::stdin().read_to_end(&mut input).is_err() {
                let _ = writeln!(diagnostics, "*** could not read '<stdin>'");
                return 1;
            }
            ("<stdin>".to_string(), input)
        }
    };
    log::info!("Read {} bytes from {}", input.len(), name);

    let driver = Driver::new(options(&args));
    let res = decode(&input)
        .map_err(Error::from)
        .and_then(|input| driver.run(input, &mut out));
    let code = match res {
        Ok(verdict) if verdict.is_success() => 0,
        Ok(_) => 1,
        Err(err) if err.is_syntax_error() => {
            let _ = writeln!(diagnostics, "{}:{}", name, err);
            1
        }
        Err(err) => {
            let _ = writeln!(diagnostics, "*** {}", err);
            1
        }
    };

    log::info!("Done ({}ms).", ts.elapsed().as_millis());
    code
}
