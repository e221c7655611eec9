//! Config command handler

use crate::args::ConfigSubcommand;
use course_selection::config::Config;
use course_selection::info;
use std::io::{self, BufRead, Write};

/// Dispatch config subcommands
///
/// # Errors
/// Returns a message if a key is unknown, a value is invalid, or the config
/// file cannot be written.
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    config: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => {
            show(config, None);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key }) => {
            if show(config, key.as_deref()) {
                Ok(())
            } else {
                Err(format!("✗ Unknown config key: '{}'", key.unwrap_or_default()))
            }
        }
        Some(ConfigSubcommand::Set { key, value }) => {
            config.set(&key, &value).map_err(|e| format!("✗ {e}"))?;
            save(config)?;
            println!("✓ Set {key} = {value}");
            Ok(())
        }
        Some(ConfigSubcommand::Unset { key }) => {
            config.unset(&key, defaults).map_err(|e| format!("✗ {e}"))?;
            save(config)?;
            println!("✓ Reset {key} to default");
            Ok(())
        }
        Some(ConfigSubcommand::Reset) => reset(&mut io::stdin().lock()),
    }
}

/// Print one value, or the whole config; returns `false` for an unknown key
fn show(config: &Config, key: Option<&str>) -> bool {
    match key {
        Some(k) => match config.get(k) {
            Some(value) => {
                println!("{value}");
                true
            }
            None => false,
        },
        None => {
            println!("\n=== Configuration ({}) ===\n", Config::get_config_file_path().display());
            print!("{config}");
            true
        }
    }
}

fn save(config: &Config) -> Result<(), String> {
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;
    info!("Config saved to {}", Config::get_config_file_path().display());
    Ok(())
}

fn reset<R: BufRead>(input: &mut R) -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    input.read_line(&mut response).ok();

    if confirmed(&response) {
        Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}

fn confirmed(response: &str) -> bool {
    let answer = response.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
