use clap::Parser;
use owo_colors::OwoColorize;
use shredlang::cli::{generate_completions, Args, Commands};
use shredlang::config::{AppConfig, SourceInput};
use shredlang::diagnostic::render_diagnostics;
use shredlang::interpreter::{parse_program, Environment, Interpreter, ParseOutput, RunError};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    verbose_log(&config, "Starting shred");

    let source = match read_source(&config) {
        Ok(s) => s,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };
    let source_name = config.input.display_name();

    verbose_log(&config, &format!("Read {} bytes from {}", source.len(), source_name));

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            let rendered = render_diagnostics(
                &source,
                &source_name,
                &[e.to_diagnostic()],
                config.color_enabled,
            );
            eprint!("{}", rendered);
            std::process::exit(1);
        }
    };

    if !program.warnings.is_empty() {
        let rendered = render_diagnostics(&source, &source_name, &program.warnings, config.color_enabled);
        eprint!("{}", rendered);
    }

    verbose_log(&config, &format!("Parsed {} top-level statement(s)", program.statements.len()));

    if config.check_only {
        println!(
            "{}: {} top-level statement(s), no errors",
            source_name,
            program.statements.len()
        );
        return;
    }

    let code = match &config.out {
        Some(path) => {
            verbose_log(&config, &format!("Writing output to file: {}", path.display()));
            match open_output(path) {
                Ok(file) => execute(
                    Interpreter::with_output(BufWriter::new(file)),
                    &program,
                    &source,
                    &source_name,
                    &config,
                ),
                Err(e) => {
                    error_message(&config, &e);
                    1
                }
            }
        }
        None => execute(
            Interpreter::with_output(BufWriter::new(io::stdout().lock())),
            &program,
            &source,
            &source_name,
            &config,
        ),
    };

    std::process::exit(code);
}

/// Runs the parsed program and returns the process exit code.
fn execute<W: Write>(
    mut interpreter: Interpreter<W>,
    program: &ParseOutput,
    source: &str,
    source_name: &str,
    config: &AppConfig,
) -> i32 {
    let mut code = match interpreter.run(&program.statements) {
        Ok(()) => {
            verbose_log(config, "Program finished");
            if config.dump_env {
                dump_environment(interpreter.environment(), config);
            }
            0
        }
        Err(RunError::Thrown(thrown)) => {
            verbose_log(config, "Program bailed");
            match writeln!(interpreter.output_mut(), "{}", thrown.message) {
                Ok(()) => 0,
                Err(e) => {
                    error_message(config, &format!("Error writing output: {}", e));
                    1
                }
            }
        }
        Err(e) => {
            if let Some(diagnostic) = e.to_diagnostic() {
                let rendered = render_diagnostics(source, source_name, &[diagnostic], config.color_enabled);
                eprint!("{}", rendered);
            }
            1
        }
    };

    if let Err(e) = interpreter.output_mut().flush() {
        error_message(config, &format!("Error writing output: {}", e));
        code = 1;
    }

    code
}

fn read_source(config: &AppConfig) -> Result<String, String> {
    match &config.input {
        SourceInput::File(path) => {
            verbose_log(config, &format!("Reading program from file: {}", path.display()));
            read_file(path)
        }
        SourceInput::Inline(source) => {
            verbose_log(config, "Reading program from command-line argument");
            Ok(source.clone())
        }
        SourceInput::Stdin => {
            verbose_log(config, "Reading program from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read from stdin: {}", e))?;

            if buffer.trim().is_empty() {
                return Err(
                    "No input provided. Must provide FILE, --eval, or a program via stdin".to_string(),
                );
            }

            Ok(buffer)
        }
    }
}

fn open_output(path: &Path) -> Result<std::fs::File, String> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| format!("Error opening output file {}: {}", path.display(), e))
}

fn dump_environment(env: &Environment, config: &AppConfig) {
    for (name, value) in env.iter() {
        let line = format!("{} = {} ({})", name, value, value.type_name());
        if config.color_enabled {
            eprintln!("{}", line.dimmed());
        } else {
            eprintln!("{}", line);
        }
    }
}

/// Library events go through `tracing`; `--verbose` turns them on without `RUST_LOG`.
fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if config.verbose {
        EnvFilter::new("shredlang=debug,shred=debug")
    } else if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(config.color_enabled)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[shred:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
