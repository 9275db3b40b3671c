use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use sumwise::ai::LlmTextService;
use sumwise::app::{Command, Controller, Event, Input, parse_input};
use sumwise::calculator::{self, CalculatorMode};
use sumwise::config::Config;
use sumwise::ui;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sumwise")]
#[command(about = "A keyboard-driven calculator with AI explanations")]
#[command(version)]
struct Args {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Calculator mode to start in (basic, scientific, custom)
    #[arg(short, long)]
    mode: Option<CalculatorMode>,

    /// Disable AI explanations and word-problem solving
    #[arg(long)]
    no_ai: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sumwise=debug" } else { "sumwise=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if args.no_ai {
        config.ai.enabled = false;
    }
    let mode = args.mode.unwrap_or(config.mode);

    let service = Arc::new(LlmTextService::new(config.ai.clone()));
    let mut controller = Controller::new(mode, service);

    run(&mut controller).await
}

/// Spawn a thread forwarding stdin lines, so the event loop never blocks on input.
fn stdin_lines() -> flume::Receiver<String> {
    let (tx, rx) = flume::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });
    rx
}

async fn run(controller: &mut Controller) -> Result<()> {
    let lines = stdin_lines();
    let updates = controller.ai_updates();

    println!("{}\n", ui::help());
    print_calculator(controller);
    prompt()?;

    loop {
        tokio::select! {
            line = lines.recv_async() => {
                let Ok(line) = line else { break };
                if !handle_line(controller, &line) {
                    break;
                }
                prompt()?;
            }
            Ok(update) = updates.recv_async() => {
                if controller.apply_ai_update(update) {
                    println!();
                    print_ai(controller);
                    prompt()?;
                }
            }
        }
    }

    Ok(())
}

/// Handle one line of input. Returns `false` when the user quits.
fn handle_line(controller: &mut Controller, line: &str) -> bool {
    let input = match parse_input(line) {
        Ok(input) => input,
        Err(message) => {
            println!("{}", message);
            return true;
        }
    };

    match input {
        Input::Empty => print_calculator(controller),
        Input::Keys(keys) => {
            for key in keys {
                controller.handle(Event::Key(key));
            }
            print_calculator(controller);
        }
        Input::Command(command) => return handle_command(controller, command),
    }
    true
}

fn handle_command(controller: &mut Controller, command: Command) -> bool {
    match command {
        Command::Mode(mode) => {
            controller.handle(Event::SetMode(mode));
            print_calculator(controller);
        }
        Command::History { json: false } => println!("{}", ui::render_history(controller.history())),
        Command::History { json: true } => match controller.history().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => println!("Failed to export history: {}", e),
        },
        Command::Select(n) => match controller.history().nth(n - 1) {
            Some(calc) => {
                let id = calc.id.clone();
                controller.handle(Event::SelectHistory(id));
                print_calculator(controller);
            }
            None => println!("No history entry {}", n),
        },
        Command::ClearHistory => {
            controller.handle(Event::ClearHistory);
            println!("History cleared.");
        }
        Command::Solve(problem) => {
            controller.handle(Event::SolveWordProblem(problem));
            println!("{}", ui::render_answer(controller.answer(), controller.is_solving()));
        }
        Command::Explain => {
            controller.drain_ai();
            print_ai(controller);
        }
        Command::Copy => match calculator::copy_display(controller.display()) {
            Ok(text) => println!("Copied {}", text),
            Err(message) => println!("{}", message),
        },
        Command::Help => {
            println!("{}", ui::help());
            println!("\n{}", ui::render_keypad(controller.mode()));
        }
        Command::Quit => return false,
    }
    true
}

fn print_calculator(controller: &Controller) {
    println!("{}", ui::render_display(controller.state(), controller.mode()));
    if controller.is_explaining() {
        println!("AI insight: thinking…");
    }
}

fn print_ai(controller: &Controller) {
    println!(
        "{}",
        ui::render_explanation(controller.explanation(), controller.is_explaining())
    );
    if controller.answer().is_some() || controller.is_solving() {
        println!("\n{}", ui::render_answer(controller.answer(), controller.is_solving()));
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}
