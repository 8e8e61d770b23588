//! Command execution handlers

use anyhow::{Context, Result};
use fanpanel_core::render::{self, DisplayList};
use fanpanel_core::{ConfigStore, SettingsForm, TomlConfigStore, Visibility, VisibilityContext};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::client::FanPanelClient;
use crate::config::CliConfig;
use crate::format::{
    format_curves, format_settings, format_status, format_status_view, format_success,
    format_view_json,
};
use crate::page::StatusPage;

use super::commands::*;

/// Handle status command
pub async fn handle_status(client: &FanPanelClient, format: &OutputFormat) -> Result<()> {
    let status = client.get_status().await?;
    println!("{}", format_status(&status, (*format).into())?);
    Ok(())
}

/// Handle watch command
///
/// Loads status and curves together, mounts the status page and redraws it
/// after every refresh until Ctrl+C.
pub async fn handle_watch(
    client: FanPanelClient,
    interval: Duration,
    format: &OutputFormat,
) -> Result<()> {
    let load = client
        .load_initial()
        .await
        .with_context(|| format!("Failed to load panel data from {}", client.base_url()))?;
    debug!("Loaded {} curves", load.curves.len());

    let page = StatusPage::mount(load, Arc::new(client), interval);
    watch_until(page, tokio::signal::ctrl_c(), format).await
}

/// Redraw after every refresh until `shutdown` resolves, then unmount.
///
/// `shutdown` is polled across all iterations, so a signal that arrives while
/// a frame is being printed is still seen.
async fn watch_until<F>(page: StatusPage, shutdown: F, format: &OutputFormat) -> Result<()>
where
    F: Future,
{
    let view = page.view();
    let mut updates = page.subscribe();
    tokio::pin!(shutdown);

    print_view(&*view.lock().await, format)?;

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, stopping status refresh");
                break Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Status refresh ended unexpectedly");
                    break Ok(());
                }
                if let Err(e) = print_view(&*view.lock().await, format) {
                    break Err(e);
                }
            }
        }
    };

    page.unmount().await;
    result
}

fn print_view(view: &fanpanel_core::StatusView, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&format_view_json(view))?),
        OutputFormat::Table => {
            // Clear screen and home the cursor
            print!("\x1b[2J\x1b[H");
            println!("{}", format_status_view(view));
        }
    }
    Ok(())
}

/// Handle curves command
pub async fn handle_curves(
    client: &FanPanelClient,
    fan_config: &Path,
    preset: Option<String>,
    svg: Option<PathBuf>,
    size: (f64, f64),
    format: &OutputFormat,
) -> Result<()> {
    let curves = client.get_all_curves().await?;

    let active = match preset {
        Some(preset) => preset,
        None => match TomlConfigStore::new(fan_config).load() {
            Ok(config) => config.settings.preset_name().to_string(),
            Err(e) => {
                warn!("Could not read fan settings, assuming default preset: {}", e);
                fanpanel_core::Preset::default().as_str().to_string()
            }
        },
    };

    if let Some(path) = svg {
        let (width, height) = size;
        let mut frame = DisplayList::new(width, height);
        render::render(Some(&mut frame), &curves, &active);
        std::fs::write(&path, frame.to_svg())
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        info!("Wrote curve chart to {}", path.display());
    }

    println!("{}", format_curves(&curves, &active, (*format).into())?);
    Ok(())
}

/// Handle settings commands
pub fn handle_settings(
    command: SettingsCommands,
    fan_config: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let store = TomlConfigStore::new(fan_config);
    let config = store
        .load()
        .with_context(|| format!("Failed to load fan settings from {}", fan_config.display()))?;

    match command {
        SettingsCommands::Show => {
            let visibility = VisibilityContext::from_settings(&config.settings).visibility();
            println!("{}", format_settings(&config, visibility, (*format).into())?);
            Ok(())
        }
        SettingsCommands::Set {
            mode,
            manual_pwm,
            preset,
        } => {
            if mode.is_none() && manual_pwm.is_none() && preset.is_none() {
                return Err(anyhow::anyhow!(
                    "Nothing to change; pass --mode, --manual-pwm or --preset"
                ));
            }

            let mut form = SettingsForm::new(config, Default::default());
            form.subscribe(Box::new(|context: &VisibilityContext, visibility: Visibility| {
                debug!("Settings visibility for {:?}: {:?}", context, visibility);
            }));

            if let Some(mode) = mode {
                form.set_mode(mode);
            }
            if let Some(preset) = preset {
                form.set_curve_preset(&preset)?;
            }
            if let Some(raw) = manual_pwm {
                form.set_manual_pwm(&raw)?;
            }

            save_form(&store, form, format)
        }
        SettingsCommands::Point { slot, temp, pwm } => {
            let mut form = SettingsForm::new(config, Default::default());
            form.set_custom_point(slot as usize, &temp, &pwm)?;

            if !form.visibility().custom_editor {
                warn!("Point {} saved, but the custom curve is not the active preset", slot);
            }

            save_form(&store, form, format)
        }
    }
}

fn save_form(store: &TomlConfigStore, form: SettingsForm, format: &OutputFormat) -> Result<()> {
    form.validate()?;
    let visibility = form.visibility();
    let config = form.into_config();
    store
        .save(&config)
        .with_context(|| format!("Failed to save fan settings to {}", store.path().display()))?;

    if matches!(format, OutputFormat::Table) {
        println!(
            "{}",
            format_success(&format!("Saved fan settings to {}", store.path().display()))
        );
    }
    println!("{}", format_settings(&config, visibility, (*format).into())?);
    Ok(())
}

/// Handle config commands
pub fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    config_path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(current_config)?);
            }
            OutputFormat::Table => {
                println!("CLI Configuration:");
                println!("{:<20} Value", "Setting");
                println!("{}", "-".repeat(40));
                println!("{:<20} {}", "Server URL", current_config.server_url);
                println!("{:<20} {}", "Output Format", current_config.output_format);
                println!("{:<20} {}", "Verbose", current_config.verbose);
                println!("{:<20} {}s", "Timeout", current_config.timeout);
                println!("{:<20} {}s", "Poll Interval", current_config.poll_interval);
                println!(
                    "{:<20} {}",
                    "Fan Settings",
                    current_config.fan_config_path().display()
                );
            }
        },
        ConfigCommands::Path => match format {
            OutputFormat::Json => {
                let paths = serde_json::json!({
                    "cli_config": config_path,
                    "fan_config": current_config.fan_config_path(),
                });
                println!("{}", serde_json::to_string_pretty(&paths)?);
            }
            OutputFormat::Table => {
                println!("{:<20} {}", "CLI Config", config_path.display());
                println!(
                    "{:<20} {}",
                    "Fan Settings",
                    current_config.fan_config_path().display()
                );
            }
        },
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                return Err(anyhow::anyhow!(
                    "{} already exists; use --force to overwrite",
                    config_path.display()
                ));
            }
            CliConfig::default().save_to(config_path)?;
            println!(
                "{}",
                format_success(&format!("Wrote default config to {}", config_path.display()))
            );
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanpanel_core::{FanConfig, Mode};
    use tempfile::TempDir;

    #[test]
    fn test_settings_set_persists_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fan.toml");

        handle_settings(
            SettingsCommands::Set {
                mode: Some(Mode::Manual),
                manual_pwm: Some("200".to_string()),
                preset: None,
            },
            &path,
            &OutputFormat::Json,
        )
        .unwrap();

        let saved = TomlConfigStore::new(&path).load().unwrap();
        assert_eq!(saved.settings.mode, Mode::Manual);
        assert_eq!(saved.settings.manual_pwm, 200);
    }

    #[test]
    fn test_settings_set_rejects_bad_input_without_saving() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fan.toml");

        let result = handle_settings(
            SettingsCommands::Set {
                mode: None,
                manual_pwm: Some("300".to_string()),
                preset: None,
            },
            &path,
            &OutputFormat::Json,
        );
        assert!(result.is_err());
        assert!(!path.exists());

        let result = handle_settings(
            SettingsCommands::Set {
                mode: None,
                manual_pwm: None,
                preset: Some("turbo".to_string()),
            },
            &path,
            &OutputFormat::Json,
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_set_requires_a_change() {
        let dir = TempDir::new().unwrap();
        let result = handle_settings(
            SettingsCommands::Set {
                mode: None,
                manual_pwm: None,
                preset: None,
            },
            &dir.path().join("fan.toml"),
            &OutputFormat::Table,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_point_updates_one_slot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fan.toml");

        handle_settings(
            SettingsCommands::Point {
                slot: 2,
                temp: "50".to_string(),
                pwm: "120".to_string(),
            },
            &path,
            &OutputFormat::Json,
        )
        .unwrap();

        let saved = TomlConfigStore::new(&path).load().unwrap();
        let defaults = FanConfig::default();
        assert_eq!(saved.custom.points()[1].temp, Some(50.0));
        assert_eq!(saved.custom.points()[1].pwm, Some(120));
        assert_eq!(saved.custom.points()[0], defaults.custom.points()[0]);
    }

    #[tokio::test]
    async fn test_curves_writes_svg_with_configured_preset() {
        let (_server, url) = crate::test_utils::MockServer::new().start().await.unwrap();
        let client = FanPanelClient::with_config(url, 2, 0, Duration::from_millis(10)).unwrap();

        let dir = TempDir::new().unwrap();
        let fan_config = dir.path().join("fan.toml");
        let mut config = FanConfig::default();
        config.settings.curve_preset = Some("performance".to_string());
        TomlConfigStore::new(&fan_config).save(&config).unwrap();

        let svg = dir.path().join("curves.svg");
        handle_curves(
            &client,
            &fan_config,
            None,
            Some(svg.clone()),
            (400.0, 240.0),
            &OutputFormat::Json,
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&svg).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.contains(r#"width="400""#));
        // Active curve drawn in its own color at full width
        assert!(content.contains(r##"stroke="#dc3545" stroke-width="3""##));
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown_signal_and_unmounts() {
        let (server, url) = crate::test_utils::MockServer::new().start().await.unwrap();
        let client = FanPanelClient::with_config(url, 2, 0, Duration::from_millis(10)).unwrap();
        let load = client.load_initial().await.unwrap();

        let page = StatusPage::mount(load, Arc::new(client), Duration::from_millis(10));
        let view = page.view();
        let mut ticks = page.subscribe();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        // Fire the signal only after several redraws have gone by
        tokio::spawn(async move {
            let _ = ticks.wait_for(|s| s.ticks >= 3).await;
            let _ = stop_tx.send(());
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            watch_until(page, stop_rx, &OutputFormat::Json),
        )
        .await
        .expect("watch did not stop after the shutdown signal")
        .unwrap();

        assert!(!view.lock().await.is_mounted());
        let seen = server.state().status_requests();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(server.state().status_requests(), seen);
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.toml");
        let config = CliConfig::default();

        handle_config(
            ConfigCommands::Init { force: false },
            &config,
            &path,
            &OutputFormat::Table,
        )
        .unwrap();
        assert_eq!(CliConfig::load_from(&path).unwrap(), config);

        assert!(handle_config(
            ConfigCommands::Init { force: false },
            &config,
            &path,
            &OutputFormat::Table
        )
        .is_err());
        assert!(handle_config(
            ConfigCommands::Init { force: true },
            &config,
            &path,
            &OutputFormat::Table
        )
        .is_ok());
    }
}
