//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use fanpanel_core::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use fanpanel_core::Mode;
use std::path::PathBuf;

/// Fan control panel CLI
#[derive(Parser, Debug)]
#[command(name = "fanpanelctl")]
#[command(version, about = "Fan control panel CLI", long_about = None)]
pub struct Cli {
    /// Server URL (overrides config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Request timeout in seconds (overrides config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds between status refreshes in `watch` (overrides config file)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Fan settings file (default: ~/.config/fanpanel/fan.toml)
    #[arg(long)]
    pub fan_config: Option<PathBuf>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/fanpanel/cli.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show fan speed, control mode and temperatures once
    Status,

    /// Show live status until interrupted (Ctrl+C)
    Watch,

    /// Show the stored fan curves
    Curves {
        /// Preset to highlight (default: the configured preset)
        #[arg(short, long)]
        preset: Option<String>,

        /// Write the curve chart to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Chart width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: f64,

        /// Chart height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: f64,
    },

    /// Show or edit the persisted fan settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the settings fields that apply to the current mode
    Show,

    /// Change mode, manual PWM or curve preset
    Set {
        /// Control mode
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,

        /// Fixed PWM value for manual mode (0-255)
        #[arg(long)]
        manual_pwm: Option<String>,

        /// Curve preset (quiet, balanced, performance, custom)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Edit one point of the custom curve
    Point {
        /// Point number (1-5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        slot: u8,

        /// Temperature in °C (0-100)
        #[arg(long)]
        temp: String,

        /// PWM value (0-255)
        #[arg(long)]
        pwm: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the configuration file locations
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse().map_err(|e: fanpanel_core::FanPanelError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::parse_from([
            "fanpanelctl",
            "settings",
            "set",
            "--mode",
            "manual",
            "--manual-pwm",
            "200",
        ]);
        match cli.command {
            Commands::Settings {
                command:
                    SettingsCommands::Set {
                        mode, manual_pwm, ..
                    },
            } => {
                assert_eq!(mode, Some(Mode::Manual));
                assert_eq!(manual_pwm.as_deref(), Some("200"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_point_slot_range() {
        assert!(Cli::try_parse_from([
            "fanpanelctl", "settings", "point", "6", "--temp", "50", "--pwm", "100"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "fanpanelctl", "settings", "point", "5", "--temp", "50", "--pwm", "100"
        ])
        .is_ok());
    }

    #[test]
    fn test_curves_defaults() {
        let cli = Cli::parse_from(["fanpanelctl", "--format", "json", "curves"]);
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Commands::Curves { width, height, .. } => {
                assert_eq!(width, 500.0);
                assert_eq!(height, 300.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["fanpanelctl", "settings", "set", "--mode", "eco"]).is_err());
    }
}
