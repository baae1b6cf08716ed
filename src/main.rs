use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::error::{LoxError, RunError};
use rox::interpreter::Interpreter;
use rox::lox::Lox;
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};
use rox::token::Token;

/// Exit status for lexical, syntax and resolution errors.
const EXIT_COMPILE_ERROR: i32 = 65;

/// Exit status for runtime errors.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array instead of one per line
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program; starts a REPL without one
    Run { filename: Option<PathBuf> },
}

/// Maps a source file read-only and returns its contents as text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // Mapping an empty file fails on some platforms.
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&map)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    info!("Read {} bytes from {:?}", map.len(), filename);

    Ok(text.to_owned())
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report_all(errors: &[LoxError]) {
    for e in errors {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");
    let source = read_file(&filename)?;

    if json {
        let (tokens, errors): (Vec<Token>, _) = scan_tokens(&source);
        report_all(&errors);

        let rendered = serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
        println!("{}", rendered);

        if !errors.is_empty() {
            std::process::exit(EXIT_COMPILE_ERROR);
        }
        return Ok(());
    }

    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization debug: {}", e);

                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_COMPILE_ERROR);

        std::process::exit(EXIT_COMPILE_ERROR);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: PathBuf) -> Result<()> {
    info!("Running Parse subcommand");
    let source = read_file(&filename)?;

    let (tokens, lex_errors) = scan_tokens(&source);
    let mut parser = Parser::new(&tokens);

    match parser.parse_expression() {
        Ok(expr) if lex_errors.is_empty() => {
            info!("Expression parsed successfully");
            let ast_str = AstPrinter::print(&expr);

            debug!("AST: {}", ast_str);
            println!("{}", ast_str);
        }

        Ok(_) => {
            report_all(&lex_errors);
            std::process::exit(EXIT_COMPILE_ERROR);
        }

        Err(errors) => {
            report_all(&lex_errors);
            report_all(&errors);
            std::process::exit(EXIT_COMPILE_ERROR);
        }
    }

    info!("Parse subcommand completed");
    Ok(())
}

fn evaluate(filename: PathBuf) -> Result<()> {
    info!("Running Evaluate subcommand");
    let source = read_file(&filename)?;

    let (tokens, lex_errors) = scan_tokens(&source);
    let mut parser = Parser::new(&tokens);

    let expr = match parser.parse_expression() {
        Ok(expr) if lex_errors.is_empty() => expr,
        Ok(_) => {
            report_all(&lex_errors);
            std::process::exit(EXIT_COMPILE_ERROR);
        }
        Err(errors) => {
            report_all(&lex_errors);
            report_all(&errors);
            std::process::exit(EXIT_COMPILE_ERROR);
        }
    };

    info!("Expression parsed successfully");

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
        }

        Err(e) => {
            debug!("Evaluation debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    }

    info!("Evaluate subcommand completed");
    Ok(())
}

fn run_file(filename: PathBuf) -> Result<()> {
    info!("Running Run subcommand");
    let source = read_file(&filename)?;

    info!("Provided input:\n {}", source);

    let mut lox = Lox::new();

    match lox.run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
        }

        Err(RunError::Compile(errors)) => {
            debug!("Compile debug: {} error(s)", errors.len());
            report_all(&errors);
            std::process::exit(EXIT_COMPILE_ERROR);
        }

        Err(RunError::Runtime(e)) => {
            debug!("Runtime debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    }

    Ok(())
}

/// Reads lines until end of input; one session serves every line.
fn run_prompt() -> Result<()> {
    info!("Starting REPL");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        // Errors are reported and the session carries on.
        if let Err(e) = lox.run(&line) {
            debug!("REPL debug: {}", e);
            eprintln!("{}", e);
        }
    }

    println!();
    info!("REPL finished");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, json),
        Commands::Parse { filename } => parse(filename),
        Commands::Evaluate { filename } => evaluate(filename),
        Commands::Run { filename } => match filename {
            Some(filename) => run_file(filename),
            None => run_prompt(),
        },
    }
}
