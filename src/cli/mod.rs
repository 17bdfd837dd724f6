//! CLI command handling
//!
//! Dispatches CLI commands to the library and formats output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::build::{build_binary, BuildKind, BuildRequest, Platform};
use crate::commands::Commands;
use crate::common::config::CONFIG_FILE_NAME;
use crate::common::{Error, Result, TestingConfig};
use crate::engine::StopReason;
use crate::testing::discover_tests;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Config { dir, json } => {
            let dir = resolve_dir(dir)?;
            let config = load_config(&dir)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&config_json(&config))?);
            } else {
                print_config(&config);
            }
            Ok(())
        }

        Commands::Discover { dir, json } => {
            let dir = resolve_dir(dir)?;
            let config = load_config(&dir)?;
            let tests = discover_tests(&config)?;

            if json {
                let paths: Vec<String> = tests.iter().map(|p| p.display().to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else if tests.is_empty() {
                println!("No tests found");
            } else {
                for test in &tests {
                    println!("{}", test.display());
                }
            }
            Ok(())
        }

        Commands::Build {
            dir,
            kind,
            platform,
            compiler,
            trace,
        } => {
            let dir = resolve_dir(dir)?;
            let platform = match platform {
                Some(name) => name.parse::<Platform>()?,
                None => Platform::current(),
            };
            let kind = BuildKind::from(kind);

            // Build with the environment of the governing configuration, if any
            let environment = TestingConfig::load_for(&dir)?
                .map(|config| config.environment().clone())
                .unwrap_or_default();

            let request = BuildRequest {
                dir: dir.clone(),
                compiler,
                environment,
                trace,
            };

            build_binary(platform, kind, &request).await?;
            println!("Built {} in {}", kind, dir.display());
            Ok(())
        }

        Commands::StopReason { value } => {
            println!("{}", convert_stop_reason(&value)?);
            Ok(())
        }
    }
}

/// Map a stop-reason code to its name, or a name to its code
pub fn convert_stop_reason(value: &str) -> Result<String> {
    let value = value.trim();
    match value.parse::<i32>() {
        Ok(code) => Ok(StopReason::from_code(code)?.name().to_string()),
        Err(_) => Ok(StopReason::from_name(value)?.code().to_string()),
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_config(dir: &Path) -> Result<TestingConfig> {
    TestingConfig::load_for(dir)?.ok_or_else(|| {
        Error::Config(format!(
            "No {} found in '{}' or any parent directory",
            CONFIG_FILE_NAME,
            dir.display()
        ))
    })
}

fn config_json(config: &TestingConfig) -> serde_json::Value {
    let environment: BTreeMap<&String, &String> = config.environment().iter().collect();
    serde_json::json!({
        "root": config.root().map(|r| r.display().to_string()),
        "suffixes": config.sorted_suffixes(),
        "environment": environment,
    })
}

fn print_config(config: &TestingConfig) {
    if let Some(root) = config.root() {
        println!("Root: {}", root.display());
    }

    let suffixes = config.sorted_suffixes();
    if suffixes.is_empty() {
        println!("Suffixes: (none)");
    } else {
        println!("Suffixes: {}", suffixes.join(" "));
    }

    if config.environment().is_empty() {
        println!("Environment: (none)");
    } else {
        println!("Environment:");
        let environment: BTreeMap<_, _> = config.environment().iter().collect();
        for (key, value) in environment {
            println!("  {}={}", key, value);
        }
    }
}
