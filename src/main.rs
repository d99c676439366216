/*!
 * twosum CLI - Command Line Interface
 *
 * Author: Shane Wall <shaneawall@gmail.com>
 */

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use twosum::{
    config::{LogLevel, LoggingConfig},
    error::{CliError, Result, EXIT_SUCCESS},
    logging,
    solve::{parse_nums_csv, solve, SolveInput},
};
use twosum_core_pairs::DEFAULT_COLUMN;
use twosum_server::ServerConfig;

#[derive(Parser)]
#[command(name = "twosum")]
#[command(
    version,
    about = "Find two numbers that add up to a target, as a service or from the command line",
    long_about = None
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevelArg,

    /// Path to log file, written as JSON lines (default: stderr)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging (equivalent to --log-level=debug)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server (configured from the environment and .env)
    Serve {
        /// Bind host, overrides TWOSUM_HOST
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides TWOSUM_PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Solve a single input without the server, cache or database
    Solve {
        /// Comma separated integers, e.g. 2,7,11,15
        #[arg(
            long,
            value_name = "LIST",
            allow_hyphen_values = true,
            conflicts_with = "file",
            required_unless_present = "file"
        )]
        nums: Option<String>,

        /// Spreadsheet to read the numbers from
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Spreadsheet column header holding the numbers
        #[arg(long, default_value = DEFAULT_COLUMN)]
        column: String,

        /// Target sum
        #[arg(long, allow_hyphen_values = true)]
        target: i64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&LoggingConfig {
        log_level: cli.log_level.into(),
        log_file: cli.log_file.clone(),
        verbose: cli.verbose,
    })?;

    match cli.command {
        Commands::Serve { host, port } => serve(host, port),
        Commands::Solve {
            nums,
            file,
            column,
            target,
            json,
        } => {
            let input = match (file, nums) {
                (Some(path), _) => SolveInput::Spreadsheet { path, column },
                (None, Some(raw)) => SolveInput::Inline(parse_nums_csv(&raw)?),
                (None, None) => {
                    return Err(CliError::InvalidInput(
                        "either --nums or --file is required".to_string(),
                    ))
                }
            };
            handle_solve(&input, target, json)
        }
    }
}

fn handle_solve(input: &SolveInput, target: i64, json: bool) -> Result<()> {
    let output = solve(input, target)?;

    if json {
        println!("{}", output.to_json()?);
    } else {
        println!("{}", output.to_text());
    }
    Ok(())
}

fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ServerConfig::from_env().map_err(|e| CliError::Config(format!("{:#}", e)))?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;

    runtime
        .block_on(twosum_server::start_server(config))
        .map_err(|e| CliError::Server(format!("{:#}", e)))
}
