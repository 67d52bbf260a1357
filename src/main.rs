use alarmclock::cli::{self, ConfigOverrides};
use alarmclock::errors::Result;
use alarmclock::logging;
use alarmclock::strategy::StrategyKind;
use alarmclock::units::Unit;
use clap::{Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::env;

#[derive(Parser)]
#[command(name = "alarm")]
#[command(about = "Resettable interval alarm running on a background thread", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by ALARM_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an alarm and print every expiry
    Watch {
        #[command(flatten)]
        interval: IntervalArgs,

        /// Stop after this many expiries (0 runs forever)
        #[arg(short, long, default_value_t = 0)]
        cycles: u64,

        /// Print one JSON object per expiry
        #[arg(long)]
        json: bool,
    },
    /// Show the configured interval in milliseconds and microseconds
    Info {
        #[command(flatten)]
        interval: IntervalArgs,
    },
    /// Manage the .alarmclock.yml config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create a commented .alarmclock.yml in the current directory
    Init,
    /// Check the .alarmclock.yml in the current directory
    Validate,
    /// Print the effective config
    Show,
}

#[derive(Args)]
struct IntervalArgs {
    /// Interval length, counted in --unit
    #[arg(short, long)]
    interval: Option<u64>,

    /// Interval unit: us, ms, s or min
    #[arg(short, long)]
    unit: Option<Unit>,

    /// How the worker waits out an interval
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Tick length in microseconds for the tick strategy
    #[arg(long)]
    tick_us: Option<u64>,
}

impl From<IntervalArgs> for ConfigOverrides {
    fn from(args: IntervalArgs) -> Self {
        ConfigOverrides {
            interval: args.interval,
            unit: args.unit,
            strategy: args.strategy,
            tick_us: args.tick_us,
        }
    }
}

fn run(args: Cli) -> Result<()> {
    match args.command {
        Commands::Watch {
            interval,
            cycles,
            json,
        } => cli::watch::run(interval.into(), cycles, json)?,
        Commands::Info { interval } => cli::info::run(interval.into())?,
        Commands::Config { command } => {
            let cwd = env::current_dir()?;
            match command {
                ConfigCommands::Init => cli::config_cmd::init(&cwd)?,
                ConfigCommands::Validate => cli::config_cmd::validate(&cwd)?,
                ConfigCommands::Show => cli::config_cmd::show(&cwd)?,
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "alarm", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    let args = Cli::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("\n{}: {}", "Error".bright_red().bold(), e);
        std::process::exit(1);
    }
}
