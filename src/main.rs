// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use capgrid::app_config::{self, Config};
use capgrid::app_controller::Controller;
use capgrid::errors::TimecodeError;
use capgrid::placement::SurfaceSize;
use capgrid::timecode::{generic_to_seconds, seconds_to_generic, FrameRate, SmpteCodec};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert between seconds and timecode labels
    Timecode {
        #[command(subcommand)]
        action: TimecodeCommand,
    },

    /// Print the render plan of a caption document at a playback time
    Plan {
        /// Caption document (JSON)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Playback time in seconds
        #[arg(short, long)]
        time: f64,

        /// Surface width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Surface height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },

    /// Check caption documents and write QC reports next to them
    Qc {
        /// Caption document or directory of documents
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Generate shell completions for capgrid
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum TimecodeCommand {
    /// Format elapsed seconds as an SMPTE label
    ToSmpte {
        /// Elapsed seconds
        #[arg(allow_negative_numbers = true)]
        seconds: f64,

        #[command(flatten)]
        rate: RateArgs,

        /// Also print the millisecond label
        #[arg(short, long)]
        generic: bool,
    },

    /// Parse an SMPTE or millisecond label into seconds
    ToSeconds {
        /// `HH:MM:SS:FF`, `HH:MM:SS;FF` or `HH:MM:SS.mmm`
        label: String,

        #[command(flatten)]
        rate: RateArgs,

        /// Reject drop-frame labels naming a skipped frame number
        #[arg(long)]
        strict: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RateArgs {
    /// Frame rate (defaults to the configured rate)
    #[arg(long)]
    fps: Option<f64>,

    /// Use drop-frame numbering (defaults to the configured setting)
    #[arg(long, conflicts_with = "non_drop_frame")]
    drop_frame: bool,

    /// Use non-drop-frame numbering (defaults to the configured setting)
    #[arg(long)]
    non_drop_frame: bool,
}

impl RateArgs {
    /// Drop-frame choice from the flags, if either was given
    fn drop_frame_override(&self) -> Option<bool> {
        if self.drop_frame {
            Some(true)
        } else if self.non_drop_frame {
            Some(false)
        } else {
            None
        }
    }
}

/// capgrid - caption placement and timecode engine
///
/// Positions pop-on captions on the CEA-608 15x32 grid, converts SMPTE
/// timecode and checks caption documents.
#[derive(Parser, Debug)]
#[command(name = "capgrid")]
#[command(version)]
#[command(about = "Caption placement and SMPTE timecode engine")]
#[command(long_about = "capgrid positions pop-on captions on the CEA-608 grid and converts SMPTE timecode.

EXAMPLES:
    capgrid timecode to-smpte 60.06 --fps 29.97 --drop-frame
    capgrid timecode to-seconds '00:01:00:02' --fps 30 --non-drop-frame
    capgrid plan show.json --time 12.5 --width 1920 --height 1080
    capgrid qc captions/                        # Check every document in a folder
    capgrid completions bash > capgrid.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in capgrid.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "capgrid.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "capgrid", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Timecode { action } => run_timecode(action, &config),
        Commands::Plan {
            input_file,
            time,
            width,
            height,
        } => {
            let controller = Controller::with_config(config)?;
            let surface = width.zip(height).map(|(w, h)| SurfaceSize::new(w, h));
            let plan = controller.plan(&input_file, time, surface).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Commands::Qc { input_path } => {
            let controller = Controller::with_config(config)?;
            let summary = controller.run_qc(input_path).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            if summary.all_passed() {
                Ok(())
            } else {
                Err(anyhow!(
                    "Caption QC found problems: {} failed, {} errors",
                    summary.failed,
                    summary.errors
                ))
            }
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file, creating a default one if it does not exist
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    // Command line log level overrides the config file
    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn codec_for(rate: &RateArgs, config: &Config) -> Result<SmpteCodec> {
    let fps = rate.fps.unwrap_or(config.timecode.default_fps);
    let frame_rate = FrameRate::from_fps(fps)?;
    let drop_frame = rate.drop_frame_override().unwrap_or(config.timecode.drop_frame);
    Ok(SmpteCodec::new(frame_rate, drop_frame))
}

fn run_timecode(action: TimecodeCommand, config: &Config) -> Result<()> {
    match action {
        TimecodeCommand::ToSmpte { seconds, rate, generic } => {
            let codec = codec_for(&rate, config)?;
            println!("{}", codec.format(seconds));
            if generic {
                println!("{}", seconds_to_generic(seconds, config.timecode.generic_separator));
            }
        }
        TimecodeCommand::ToSeconds { label, rate, strict } => {
            let codec = codec_for(&rate, config)?.strict(strict || config.timecode.strict_drop_frame);

            let seconds = match codec.parse_checked(&label) {
                Ok(parsed) => {
                    for warning in &parsed.warnings {
                        warn!("{}", warning);
                    }
                    parsed.seconds
                }
                Err(TimecodeError::MalformedSmpte(_)) => generic_to_seconds(&label)
                    .with_context(|| format!("'{}' is neither an SMPTE nor a millisecond label", label))?,
                Err(e) => return Err(e.into()),
            };
            println!("{:.3}", seconds);
        }
    }
    Ok(())
}
