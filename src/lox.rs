//! A running session: one interpreter fed whole programs or REPL lines.
//!
//! Each [`Lox::run`] call scans, parses, resolves and interprets its source as
//! an independent unit, but globals and the resolution side table persist
//! between calls.

use std::io::Write;

use log::{debug, info};

use crate::error::{LoxError, RunError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

pub struct Lox {
    interpreter: Interpreter,
    next_id: usize,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::with_interpreter(Interpreter::with_output(out))
    }

    fn with_interpreter(interpreter: Interpreter) -> Self {
        info!("Starting Lox session");

        Self {
            interpreter,
            next_id: 0,
        }
    }

    /// Run one complete unit of source.
    ///
    /// Lexical and syntax errors are reported together; resolution only runs
    /// on an error‑free parse, and nothing executes unless both passes succeed.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        debug!("Running {} byte(s) of source", source.len());

        let (tokens, mut errors): (_, Vec<LoxError>) = scan_tokens(source);

        let mut parser = Parser::starting_at(&tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_free_id();

        let statements = match parsed {
            Ok(statements) if errors.is_empty() => statements,
            Ok(_) => return Err(RunError::Compile(errors)),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Err(RunError::Compile(errors));
            }
        };

        let locals = Resolver::new()
            .resolve(&statements)
            .map_err(RunError::Compile)?;

        self.interpreter.add_locals(locals);

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }
}
