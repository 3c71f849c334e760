#![allow(dead_code)]

use shredlang::interpreter::{parse_and_run, Interpreter, RunError};

/// Runs `source` on a fresh interpreter and returns what it printed along
/// with how the run ended.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let result = interpreter.interpret(source);
    let printed = String::from_utf8_lossy(interpreter.output()).into_owned();
    (printed, result)
}

/// Output of a program expected to finish normally.
pub fn output_of(source: &str) -> String {
    parse_and_run(source).unwrap_or_else(|e| panic!("program failed: {}\n---\n{}", e, source))
}

/// The error a program is expected to end with.
pub fn error_of(source: &str) -> RunError {
    match run(source) {
        (_, Err(e)) => e,
        (printed, Ok(())) => panic!("program succeeded unexpectedly, printed:\n{}", printed),
    }
}

/// What the `shred` driver writes to its output stream: printed lines,
/// then the message of an escaped `bail`. Faults return `Err`.
pub fn driver_output(source: &str) -> Result<String, RunError> {
    let (mut printed, result) = run(source);
    match result {
        Ok(()) => Ok(printed),
        Err(RunError::Thrown(thrown)) => {
            printed.push_str(&thrown.message);
            printed.push('\n');
            Ok(printed)
        }
        Err(e) => Err(e),
    }
}

pub fn lines(text: &[&str]) -> String {
    text.iter().map(|line| format!("{}\n", line)).collect()
}
