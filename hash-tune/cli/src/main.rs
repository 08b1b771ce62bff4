//! CLI for finding password-hashing parameters that fit a time budget.
//!
//! ## Usage
//!
//! ```bash
//! # Tune every family for 250ms per hash with a 64 MiB memory ceiling
//! htune
//!
//! # Half a second per hash, up to 2^18 KiB (256 MiB)
//! htune --target 0.5 --memory-limit 18
//!
//! # Only Argon2, JSON output
//! htune -f argon2 --json
//!
//! # Generate shell completions
//! source <(COMPLETE=bash htune)
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::Shell;
use hash_tune::{Family, HashProbe, TuneConfig, TuneError, Tuner};
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Find the most expensive password-hashing parameters that fit a time budget
#[derive(Parser)]
#[command(name = "htune", version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Time budget per hash, in seconds [default: 0.25]
    #[arg(short, long, value_name = "SECONDS", allow_negative_numbers = true)]
    target: Option<f64>,

    /// Memory ceiling for Argon2 and scrypt, as a power of two in KiB (e.g. 16 = 64 MiB)
    #[arg(short = 'L', long, value_name = "EXPONENT")]
    memory_limit: Option<u32>,

    /// Read settings and bounds from a TOML file (flags take precedence)
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Tune only these families (repeatable: -f argon2 -f pbkdf2)
    #[arg(short, long = "family", value_name = "FAMILY")]
    families: Vec<Family>,

    /// Print the report as JSON instead of configuration blocks
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long)]
    log_json: bool,
}

const AFTER_HELP: &str = "\
SHELL COMPLETIONS:
  Enable tab completions by adding one line to your shell config:

  Bash (~/.bashrc):
    source <(COMPLETE=bash htune)

  Zsh (~/.zshrc):
    source <(COMPLETE=zsh htune)

  Fish (~/.config/fish/config.fish):
    COMPLETE=fish htune | source

FAMILIES:
  argon2   Argon2id (memory exponent, time cost)
  scrypt   scrypt (memory exponent, operation limit)
  pbkdf2   PBKDF2-HMAC-SHA256/SHA512 (iteration count)

EXAMPLES:
  htune                          # all families, 0.25s, 64 MiB ceiling
  htune -t 0.5 -L 18             # 0.5s per hash, 256 MiB ceiling
  htune -f pbkdf2 --json         # PBKDF2 only, JSON report
  htune -c tune.toml -v          # bounds from file, progress on stderr
";

fn main() -> ExitCode {
    // Check for shell completion generation before parsing args
    if let Ok(shell_name) = std::env::var("COMPLETE") {
        return generate_completions(&shell_name);
    }

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.log_json);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    debug!(?config, "starting tuning run");

    let report = match Tuner::new(config).run(&mut HashProbe::new()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        eprintln!("Recommended parameters:");
        eprintln!();
        print!("{report}");
    }

    ExitCode::SUCCESS
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(cli: &Cli) -> Result<TuneConfig, TuneError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => TuneConfig::load(path)?,
        None => TuneConfig::default(),
    };

    if let Some(target) = cli.target {
        config.target_secs = target;
    }
    if let Some(exponent) = cli.memory_limit {
        config.memory_ceiling_exponent = Some(exponent);
    }
    if !cli.families.is_empty() {
        config.families = cli.families.clone();
    }

    Ok(config)
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins; otherwise warnings only, with -v for per-probe progress
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,hash_tune=info".to_string(),
            2 => "info,hash_tune=debug".to_string(),
            _ => "debug,hash_tune=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Generate shell completions.
fn generate_completions(shell_name: &str) -> ExitCode {
    let shell = match shell_name.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "elvish" => Shell::Elvish,
        _ => {
            eprintln!(
                "Unknown shell: {shell_name}. Supported: bash, zsh, fish, powershell, elvish"
            );
            return ExitCode::FAILURE;
        }
    };

    clap_complete::generate(shell, &mut Cli::command(), "htune", &mut io::stdout());
    ExitCode::SUCCESS
}
