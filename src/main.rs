use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::{LevelFilter, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use pharo_interop_mcp::client::{Endpoint, PharoClient};
use pharo_interop_mcp::config::Config;
use pharo_interop_mcp::mcp::McpServer;
use pharo_interop_mcp::tools::{ToolContext, ToolRegistry};

fn rust_log_set() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}

fn setup_logging() -> Result<()> {
    // Create log directory
    let project_name = env!("CARGO_PKG_NAME");
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(project_name)
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("{}.log", project_name));

    // Setup env_logger with file output; stdout belongs to the MCP session
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if !rust_log_set() {
        // Level is driven by set_max_level once config is known
        builder
            .filter_level(LevelFilter::Trace)
            .filter_module("hyper_util", LevelFilter::Info)
            .filter_module("reqwest", LevelFilter::Info);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    if !rust_log_set() {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn apply_log_level(cli: &Cli, config: &Config) {
    if rust_log_set() {
        return;
    }

    let level = if cli.is_verbose() {
        LevelFilter::Debug
    } else {
        config.level_filter().unwrap_or(LevelFilter::Info)
    };
    log::set_max_level(level);
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let endpoint = Endpoint::resolve(Some(&config.pharo.host), config.pharo.port)?;
    info!("Using PharoSmalltalkInteropServer at {}", endpoint);

    let client = Arc::new(PharoClient::new(endpoint));
    let ctx = ToolContext::new(client.clone());
    let registry = ToolRegistry::standard();

    let outcome = match &cli.command {
        None | Some(Commands::Serve) => handle_serve_command(registry, ctx).await,
        Some(Commands::Tools { schema }) => handle_tools_command(&registry, *schema),
        Some(Commands::Call { name, args }) => handle_call_command(&registry, &ctx, name, args.as_deref()).await,
    };

    if client.close().await {
        info!("Closed HTTP client for {}", client.endpoint());
    }

    outcome
}

async fn handle_serve_command(registry: ToolRegistry, ctx: ToolContext) -> Result<()> {
    let server = McpServer::new(registry, ctx);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = server.serve(stdin, stdout) => result.context("MCP session failed")?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    Ok(())
}

fn handle_tools_command(registry: &ToolRegistry, schema: bool) -> Result<()> {
    info!("Listing {} tools", registry.len());

    for def in registry.definitions() {
        println!("{}  {}", def.name.green().bold(), def.description);
        if schema {
            let pretty = serde_json::to_string_pretty(&def.input_schema)?;
            for line in pretty.lines() {
                println!("    {}", line.dimmed());
            }
        }
    }

    Ok(())
}

async fn handle_call_command(
    registry: &ToolRegistry,
    ctx: &ToolContext,
    name: &str,
    args: Option<&str>,
) -> Result<()> {
    info!("Calling tool {} with {:?}", name, args);

    let input = match args {
        Some(raw) => serde_json::from_str(raw).context("Tool arguments must be a JSON object")?,
        None => serde_json::Value::Null,
    };

    let result = registry.execute(name, input, ctx).await?;
    if result.is_error {
        eprintln!("{} {}", "Error:".red(), result.content);
        return Err(eyre!("Tool {} failed", name));
    }

    match result.structured {
        Some(envelope) => {
            let label = if envelope["success"] == true {
                "success".green()
            } else {
                "failure".red()
            };
            eprintln!("{} {}", name.cyan(), label);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        None => println!("{}", result.content),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; flags beat the file
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_overrides(cli.host.clone(), cli.port);
    apply_log_level(&cli, &config);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
