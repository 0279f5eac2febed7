//! Command dispatch

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{HeightService, InputSource};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::compute_height;
use crate::infrastructure::RealInputReader;

/// Resolve settings: config file and environment, then command-line flags.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let config_path = cli.config.clone().or_else(global_config_path);
    let mut settings = Settings::load_from(config_path.as_deref())?;
    if let Some(strategy) = cli.strategy {
        settings.strategy = strategy;
    }
    if let Some(stack_size) = cli.stack_size {
        settings.stack_size = stack_size;
    }
    settings.validate()?;
    debug!(?settings, "Resolved settings");
    Ok(settings)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => cmd_height(cli, None),
        Some(Commands::Height { file }) => cmd_height(cli, file.as_deref()),
        Some(Commands::Show { file, max_depth }) => cmd_show(cli, file.as_deref(), *max_depth),
        Some(Commands::Leaves { file }) => cmd_leaves(cli, file.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

fn service(cli: &Cli) -> CliResult<HeightService> {
    let settings = resolve_settings(cli)?;
    Ok(HeightService::new(Arc::new(RealInputReader), settings))
}

#[instrument(skip(cli))]
fn cmd_height(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let service = service(cli)?;
    let height = service.height(&InputSource::from_arg(file))?;
    output::info(&height);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_show(cli: &Cli, file: Option<&Path>, max_depth: usize) -> CliResult<()> {
    if max_depth == 0 {
        return Err(CliError::InvalidArgs("--max-depth must be at least 1".into()));
    }
    let service = service(cli)?;
    let forest = service.load_forest(&InputSource::from_arg(file))?;
    let height = compute_height(&forest);
    if height > max_depth {
        output::warning(&format!(
            "tree height {} exceeds --max-depth {}, deeper levels collapsed",
            height, max_depth
        ));
    }
    output::info(&forest.to_tree_string(max_depth));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_leaves(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let service = service(cli)?;
    let forest = service.load_forest(&InputSource::from_arg(file))?;
    for leaf in forest.leaves() {
        output::info(&leaf);
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli)?;
            print!("{}", settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match cli.config.clone().or_else(global_config_path) {
                Some(path) => output::info(&path.display()),
                None => output::warning("no config directory available on this platform"),
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = cli
                .config
                .clone()
                .or_else(global_config_path)
                .ok_or_else(|| CliError::Usage("no config directory, pass --config".into()))?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)
                    .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
            }
            let template = Settings::default().to_toml()?;
            fs::write(&path, template)
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
