use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use faei::input::{InputFormat, ScoreInput};
use faei::scoring::{ActionSet, ScoreCalculator};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score an action record or a roster (default if no subcommand)
    Score {
        /// Actions file (JSON or YAML). Reads stdin when omitted
        file: Option<PathBuf>,

        /// Input format, overriding detection by file extension
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        /// How to render the result
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Show per-metric contributions
        #[arg(short, long)]
        breakdown: bool,
    },
    /// Show the effective metric weights and parameters
    Weights,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "faei")]
#[command(about = "Futsal Action Efficiency Index calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/faei/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Log to stderr. RUST_LOG wins over the --verbose default.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "faei=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn warn_suspicious_actions(owner: Option<&str>, actions: &ActionSet) {
    if let Err(findings) = faei::scoring::check_actions(actions) {
        for finding in findings {
            match owner {
                Some(name) => tracing::warn!(player = name, "{}", finding),
                None => tracing::warn!("{}", finding),
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match faei::output::format_json(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

/// Load config, report questionable scoring settings, and build the calculator.
fn load_calculator(config_path: Option<PathBuf>) -> ScoreCalculator {
    let config = match faei::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Odd settings are reported but still honoured
    let effective_scoring = config.effective_scoring();
    if let Err(findings) = faei::scoring::validate_scoring(&effective_scoring) {
        for finding in findings {
            tracing::warn!("{}", finding);
        }
    }

    ScoreCalculator::from_config(&effective_scoring)
}

fn run_score(
    calc: &ScoreCalculator,
    input: ScoreInput,
    output: OutputFormat,
    breakdown: bool,
    use_colors: bool,
) {
    match input {
        ScoreInput::Single(actions) => {
            warn_suspicious_actions(None, &actions);
            tracing::debug!(metrics = actions.len(), "scoring single record");

            match (output, breakdown) {
                (OutputFormat::Table, false) => {
                    println!("{}", faei::output::format_result(&calc.calc(&actions), use_colors))
                }
                (OutputFormat::Table, true) => println!(
                    "{}",
                    faei::output::format_breakdown(&calc.calc_detailed(&actions), use_colors)
                ),
                (OutputFormat::Json, false) => print_json(&calc.calc(&actions)),
                (OutputFormat::Json, true) => print_json(&calc.calc_detailed(&actions)),
            }
        }
        ScoreInput::Roster(players) => {
            for player in &players {
                warn_suspicious_actions(Some(&player.name), &player.actions);
            }
            tracing::debug!(players = players.len(), "scoring roster");

            if !breakdown {
                let ranked = calc.calc_roster(&players);
                match output {
                    OutputFormat::Table => {
                        println!("{}", faei::output::format_roster_table(&ranked, use_colors))
                    }
                    OutputFormat::Json => print_json(&ranked),
                }
                return;
            }

            let detailed = calc.calc_roster_detailed(&players);

            match output {
                OutputFormat::Table => {
                    for entry in &detailed {
                        println!("== {}", entry.name);
                        println!("{}", faei::output::format_breakdown(&entry.breakdown, use_colors));
                        println!();
                    }
                }
                OutputFormat::Json => print_json(&detailed),
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Score {
        file: None,
        format: None,
        output: OutputFormat::Table,
        breakdown: false,
    });
    let config_path = cli.config.map(PathBuf::from);
    let use_colors = faei::output::should_use_colors();

    match command {
        Commands::Score {
            file,
            format,
            output,
            breakdown,
        } => {
            let calc = load_calculator(config_path);
            let input = match faei::input::load_actions(file.as_deref(), format) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            run_score(&calc, input, output, breakdown, use_colors);
        }
        Commands::Weights => {
            let calc = load_calculator(config_path);
            println!("{}", faei::output::format_weights(&calc, use_colors));
        }
        Commands::Init { force } => {
            // Init writes the config, so it never loads one
            let path = match config_path.map(Ok).unwrap_or_else(faei::config::get_config_path) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            if let Err(e) = faei::config::write_default_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Wrote default config to {}", path.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
