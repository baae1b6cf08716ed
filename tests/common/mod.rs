//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::RunError;
use rox::lox::Lox;

/// In‑memory `print` sink that can still be read after the session took it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A fresh session plus a handle on everything it prints.
pub fn session() -> (Lox, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let lox = Lox::with_output(Box::new(buffer.clone()));
    (lox, buffer)
}

/// Run `source` in a fresh session; returns printed lines and the outcome.
pub fn run(source: &str) -> (Vec<String>, Result<(), RunError>) {
    let (mut lox, buffer) = session();
    let result = lox.run(source);
    (buffer.lines(), result)
}

/// Run `source`, which must succeed, and return its printed lines.
pub fn output(source: &str) -> Vec<String> {
    let (lines, result) = run(source);
    if let Err(e) = result {
        panic!("program failed:\n{}", e);
    }
    lines
}

/// Run `source`, which must fail at runtime, and return the rendered error.
pub fn runtime_error(source: &str) -> String {
    match run(source).1 {
        Err(RunError::Runtime(e)) => e.to_string(),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

/// Run `source`, which must be rejected before execution, and return the
/// rendered diagnostics, one per entry.
pub fn compile_errors(source: &str) -> Vec<String> {
    match run(source).1 {
        Err(RunError::Compile(errors)) => errors.iter().map(ToString::to_string).collect(),
        other => panic!("expected compile errors, got {:?}", other),
    }
}
