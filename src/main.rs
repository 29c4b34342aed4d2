//! Vessel CLI - manage virtualenv-backed containers

use std::fs::OpenOptions;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use log::debug;

use vessel::cli::{self, Args, ConfigCommand, SubCommand};
use vessel::{Config, ContainerRegistry, Terminal};

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = if args.verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));

    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let config_path = args.config_path();
    let config = Config::load_or_default(&config_path).with_base_dir(&args.base_dir);
    debug!("Effective config: {:?}", config);

    if let SubCommand::Config { action } = &args.command {
        match action {
            ConfigCommand::Show if args.json => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommand::Show => print!("{}", config.render()),
            ConfigCommand::Save => {
                config.save(&config_path)?;
                println!("Configuration saved to {}", config_path.display());
            }
        }
        return Ok(());
    }

    let mut registry = ContainerRegistry::new(config);
    if let SubCommand::Open {
        terminal: Some(program),
        ..
    } = &args.command
    {
        registry = registry.with_terminal(Terminal::with_program(program));
    }

    let operation = args
        .command
        .operation()
        .context("command does not map to a container operation")?;
    let outcome = registry.dispatch(operation)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", cli::render(&outcome));
    }
    Ok(())
}
