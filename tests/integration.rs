use std::{
    fs,
    io::Write,
    process::{Command, Output, Stdio},
};

use limboole::{
    dimacs_to_boole, parse_formula, Driver, Mode, Model, NodeManager, Options, Verdict,
};
use test_generator::test_resources;

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap()
}

fn run(input: &str, check_satisfiability: bool) -> Verdict {
    let options = Options {
        check_satisfiability,
        ..Default::default()
    };
    let mut out = Vec::new();
    Driver::new(options).run(input, &mut out).unwrap()
}

/// Evaluates the formula under the model, variables missing from the model are false.
fn eval(input: &str, model: &Model) -> bool {
    let mut mngr = NodeManager::default();
    let root = parse_formula(input, &mut mngr).unwrap();
    mngr.eval(root, |n| model.get(n).unwrap_or(false))
}

fn pretty(input: &str) -> String {
    let options = Options {
        mode: Mode::PrettyPrint,
        ..Default::default()
    };
    let mut out = Vec::new();
    Driver::new(options).run(input, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Dumps the CNF of `input`, converts it back into a formula and solves that.
/// Returns whether the dumped CNF is satisfiable.
fn dump_is_satisfiable(input: &str, check_satisfiability: bool) -> bool {
    let options = Options {
        mode: Mode::Dump,
        check_satisfiability,
        ..Default::default()
    };
    let mut cnf = Vec::new();
    assert_eq!(Driver::new(options).run(input, &mut cnf).unwrap(), Verdict::Dumped);

    let mut formula = Vec::new();
    dimacs_to_boole(&String::from_utf8(cnf).unwrap(), &mut formula).unwrap();
    match run(&String::from_utf8(formula).unwrap(), true) {
        Verdict::Satisfiable(_) => true,
        Verdict::Unsatisfiable => false,
        v => panic!("unexpected verdict {:?}", v),
    }
}

#[test_resources("res/valid/*.boole")]
fn test_valid(path: &str) {
    let input = read(path);
    assert_eq!(run(&input, false), Verdict::Valid);
    assert!(!dump_is_satisfiable(&input, false));
    match run(&input, true) {
        Verdict::Satisfiable(model) => assert!(eval(&input, &model)),
        v => panic!("{}: unexpected verdict {:?}", path, v),
    }
}

#[test_resources("res/invalid/*.boole")]
fn test_invalid(path: &str) {
    let input = read(path);
    match run(&input, false) {
        Verdict::Invalid(model) => assert!(!eval(&input, &model)),
        v => panic!("{}: unexpected verdict {:?}", path, v),
    }
    assert!(dump_is_satisfiable(&input, false));
}

#[test_resources("res/sat/*.boole")]
fn test_sat(path: &str) {
    let input = read(path);
    match run(&input, true) {
        Verdict::Satisfiable(model) => assert!(eval(&input, &model)),
        v => panic!("{}: unexpected verdict {:?}", path, v),
    }
    assert!(dump_is_satisfiable(&input, true));
}

#[test_resources("res/unsat/*.boole")]
fn test_unsat(path: &str) {
    let input = read(path);
    assert_eq!(run(&input, true), Verdict::Unsatisfiable);
    assert!(matches!(run(&input, false), Verdict::Invalid(_)));
    assert!(!dump_is_satisfiable(&input, true));
}

#[test_resources("res/*/*.boole")]
fn test_pretty_print_idempotent(path: &str) {
    let first = pretty(&read(path));
    let second = pretty(&first);
    assert_eq!(first, second);
}

/* Command line */

fn limboole(args: &[&str], stdin: impl AsRef<[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_limboole"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // The process may exit without reading its input
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_ref());
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn cli_valid() {
    let output = limboole(&[], "a -> a\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "% VALID formula\n");
}

#[test]
fn cli_satisfiable() {
    let output = limboole(&["-s"], "(v1 | v2) & !v1");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "% SATISFIABLE formula (satisfying assignment follows)\nv1 = 0\nv2 = 1\n"
    );
}

#[test]
fn cli_pretty_print_wins_over_dump() {
    let output = limboole(&["-d", "-p"], "a & b");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a\n&\nb\n");
}

#[test]
fn cli_dump() {
    let output = limboole(&["-d"], "a");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "c 1 a\np cnf 1 1\n-1 0\n");
}

#[test]
fn cli_parse_error() {
    let output = limboole(&[], "(a -> b) -> a -> b");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        stderr(&output),
        "<stdin>:1:15: parse error at '->' expected operator or EOF\n"
    );
}

#[test]
fn cli_diagnostics() {
    let output = limboole(&["res/../tests/no-such-file.boole"], "");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "*** could not read 'res/../tests/no-such-file.boole'\n"
    );

    let output = limboole(&[], "a ? b");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "<stdin>:1:3: scan error: invalid character '?'\n"
    );
}

#[test]
fn cli_invalid_utf8() {
    let output = limboole(&[], b"a &\n  \xffb");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        stderr(&output),
        "<stdin>:2:3: scan error: invalid character '\\xff'\n"
    );
}

/// A fresh path in the scratch directory of the integration tests
fn scratch(name: &str) -> String {
    let path = format!("{}/{}", env!("CARGO_TARGET_TMPDIR"), name);
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn cli_output_file() {
    let path = scratch("output.txt");
    let output = limboole(&["-s", "-o", path.as_str()], "a & !b");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        read(&path),
        "% SATISFIABLE formula (satisfying assignment follows)\na = 1\nb = 0\n"
    );
}

#[test]
fn cli_log_file_is_appended() {
    let path = scratch("log.txt");
    fs::write(&path, "earlier run\n").unwrap();
    let output = limboole(&["-v", "-l", path.as_str()], "a &");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).is_empty());

    let log = read(&path);
    assert!(log.starts_with("earlier run\n"));
    assert!(log.contains("% Read 3 bytes from <stdin>\n"));
    assert!(log.contains("\n<stdin>:1:4: parse error at 'EOF' expected variable or '('\n"));
}

#[test]
fn cli_unwritable_files() {
    let dir = env!("CARGO_TARGET_TMPDIR");

    let output = limboole(&["-o", dir], "a");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), format!("*** could not write '{}'\n", dir));

    let output = limboole(&["-l", dir], "a");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), format!("*** could not append to '{}'\n", dir));
}

#[test]
fn cli_zero_decisions() {
    // Unit propagation alone refutes this
    let output = limboole(&["-s", "-m", "0"], "a & (a -> b) & !b");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "% UNSATISFIABLE formula\n");

    // Without decisions the solver may give up, but it never answers wrongly
    let input = read("res/unsat/pigeonhole.boole");
    let output = limboole(&["-s", "-m", "0"], &input);
    match output.status.code() {
        Some(0) => assert_eq!(stdout(&output), "% UNSATISFIABLE formula\n"),
        Some(1) => assert_eq!(stdout(&output), "% RESOURCES EXHAUSTED\n"),
        code => panic!("unexpected exit code {:?}", code),
    }
}

#[test]
fn cli_negative_bound_is_unbounded() {
    let output = limboole(&["-m", "-1"], "a | !a");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "% VALID formula\n");
}

#[test]
fn cli_invalid_option() {
    let output = limboole(&["-x"], "a");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

#[test]
fn dimacs_round_trip() {
    let output = Command::new(env!("CARGO_BIN_EXE_dimacs2boole"))
        .arg("res/dimacs/small.cnf")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let formula = stdout(&output);
    assert_eq!(formula, "(v1 | !v2)\n&\n(v2 | v3)\n&\n(!v1 | !v3)\n");

    match run(&formula, true) {
        Verdict::Satisfiable(model) => assert!(eval(&formula, &model)),
        v => panic!("unexpected verdict {:?}", v),
    }
}

#[test]
fn dimacs_syntax_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_dimacs2boole"))
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "*** dimacs2boole: syntax error:\n<stdin>:1: no clauses found\n"
    );
}
