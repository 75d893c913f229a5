// ABOUTME: CLI driver - script execution and the interactive REPL

use clap::Parser;
use minischeme::config;
use minischeme::env::Environment;
use minischeme::eval::eval_source;
use minischeme::{bare_environment, initial_environment};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, Editor};
use std::path::PathBuf;
use std::rc::Rc;

/// Minimal Scheme-family Lisp interpreter
#[derive(Parser, Debug)]
#[command(name = "minischeme")]
#[command(version = config::VERSION)]
#[command(about = "A minimal Scheme-family Lisp interpreter")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Evaluate a single expression, print its value, and exit
    #[arg(short = 'e', long = "eval", value_name = "EXPR")]
    expression: Option<String>,

    /// Skip loading the standard prelude
    #[arg(long = "no-prelude")]
    no_prelude: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Failing to evaluate the prelude is fatal at startup
    let env = if args.no_prelude {
        bare_environment()
    } else {
        initial_environment().map_err(|e| format!("Failed to load prelude: {}", e))?
    };

    if let Some(expression) = args.expression {
        let result = eval_source(&expression, &env).map_err(|e| e.to_string())?;
        println!("{}", result);
        return Ok(());
    }

    if let Some(script_path) = args.script {
        run_script(&script_path, &env)?;
        return Ok(());
    }

    run_repl(&env)
}

/// Execute a script file; scripts print nothing unless they do so themselves
fn run_script(path: &PathBuf, env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read script file {}: {}", path.display(), e))?;

    eval_source(&contents, env).map_err(|e| format!("Evaluation error: {}", e))?;
    Ok(())
}

/// The interactive read-eval-print loop
fn run_repl(env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: DefaultEditor =
        Editor::with_config(config).map_err(|e| format!("Failed to initialize REPL: {}", e))?;

    // Try to load history from previous sessions
    let _ = rl.load_history(config::HISTORY_FILE);

    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);
    println!("{}", config::WELCOME_FOOTER);

    loop {
        let readline = rl.readline(config::PROMPT);

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                match line.trim() {
                    "(quit)" | "(exit)" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                // Errors leave the environment as the failed expression
                // found it, so the session continues
                match eval_source(&line, env) {
                    Ok(result) => println!("=> {}", result),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(config::HISTORY_FILE);

    Ok(())
}
