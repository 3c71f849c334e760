pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use environment::Environment;
pub use error::{InterpreterError, ParseError, RunError, Thrown};
pub use evaluator::{parse_and_run, run_source, Interpreter, SPIN_ITERATION};
pub use parser::{parse_program, LineParser, ParseOutput};
