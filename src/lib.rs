pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Expr, Stmt, StmtKind};
pub use token::{BinaryOp, Token};
pub use value::Value;
