// src/main.rs

// fn-calc
// An interactive calculator with named functions and closures.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use clap::Parser as ClapParser;

use fn_calc::{Session, SessionConfig};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Script to run, one statement per line. Without it, starts the REPL.
    file: Option<PathBuf>,

    /// Deepest expression nesting / call chain allowed before giving up.
    #[arg(long, default_value_t = fn_calc::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

static TRACING_INIT: Once = Once::new();

/// Logs go to stderr, and only when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn show_examples() {
    println!("\n--- fn-calc Examples ---\n");

    let examples = [
        ("Arithmetic", "2 + 3 * 4"),
        ("Power is left-associative", "2 ^ 3 ^ 2"),
        ("Variables", "let r = 2.5"),
        ("Named function", "def area(r) = 3.14159 * r ^ 2"),
        ("Lambda bound to a name", "let sq = fn(x) => x * x"),
        ("Immediate call", "(fn(x, y) => x * y)(6, 7)"),
        ("Closures", "let makeAdder = fn(n) => fn(x) => x + n"),
        ("Using a closure", "let add5 = makeAdder(5)"),
    ];

    for (description, code) in examples.iter() {
        println!("// {}", description);
        println!("{}\n", code);
    }
    println!("------------------------\n");
}

fn show_variables(session: &Session) {
    let vars = session.variables();
    if vars.is_empty() {
        println!("(no variables)");
    }
    for (name, value) in vars {
        println!("{} = {}", name, value);
    }
}

fn show_functions(session: &Session) {
    let funcs = session.functions();
    if funcs.is_empty() {
        println!("(no functions)");
    }
    for info in funcs {
        println!("{}", info);
    }
}

fn show_closures(session: &Session) {
    let names = session.closures();
    if names.is_empty() {
        println!("(no closures)");
    } else {
        println!("{}", names.join(", "));
    }
}

// Simple REPL
fn repl(session: &mut Session) -> io::Result<()> {
    println!("fn-calc REPL");
    println!("Enter expressions, 'let', 'def', ':examples', ':vars', ':fns', ':closures', ':history', ':reset' or 'quit'");

    let stdin = io::stdin();
    let mut history: Vec<String> = Vec::new();
    let mut input = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            ":examples" => show_examples(),
            ":vars" => show_variables(session),
            ":fns" => show_functions(session),
            ":closures" => show_closures(session),
            ":history" => history.iter().rev().for_each(|h| println!("{}", h)),
            ":reset" => {
                session.reset();
                history.clear();
            }
            _ => match session.evaluate(line) {
                Ok(output) => {
                    println!("= {}", output);
                    history.push(format!("{} = {}", line, output));
                }
                Err(e) => println!("Error: {}", e),
            },
        }
    }
    Ok(())
}

/// Runs every non-blank, non-comment line of a script in order.
fn run_script(path: &Path, session: &mut Session) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let output = session
            .evaluate(line)
            .map_err(|e| format!("line {}: {}", idx + 1, e))?;
        println!("{}", output);
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let mut session = Session::with_config(SessionConfig::default().with_max_depth(cli.max_depth));

    if let Some(path) = cli.file {
        if let Err(e) = run_script(&path, &mut session) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    } else if let Err(e) = repl(&mut session) {
        eprintln!("I/O error: {}", e);
        std::process::exit(1);
    }
}
