//! sail - create and inspect development containers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use sail::labels::SailLabels;
use sail::{RunMode, Runner, SailLayout, SailOptions, SailRuntime, init_logging_for};

#[derive(Parser, Debug)]
#[command(name = "sail", version, about = "Development containers from layered images")]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create and start a container from an image.
    Run(RunArgs),
    /// Recover and print the descriptor of an existing container.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Image to build the container from.
    #[arg(long)]
    image: String,

    /// Container name.
    #[arg(long)]
    name: String,

    /// Project name; the guest project directory is named after it.
    #[arg(long)]
    project: String,

    /// Project directory on the host.
    #[arg(long)]
    project_dir: PathBuf,

    /// Static address on the network.
    #[arg(long)]
    ip: String,

    /// Network to attach to. Defaults to the configured network.
    #[arg(long)]
    network: Option<String>,

    /// Container hostname. Defaults to the container name.
    #[arg(long)]
    hostname: Option<String>,

    /// Run this command once instead of the editor server.
    #[arg(long)]
    test_cmd: Option<String>,

    /// Print the creation request instead of creating the container.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Container name.
    name: String,

    /// Network to look the address up on.
    #[arg(long)]
    network: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = SailOptions::from_env()?;
    options.sanitize()?;
    init_logging_for(&SailLayout::new(options.home_dir.clone()), cli.verbose)?;
    let runtime = SailRuntime::connect(options).context("failed to initialize sail")?;

    match cli.command {
        Command::Run(args) => run(&runtime, args).await,
        Command::Inspect(args) => inspect(&runtime, args).await,
    }
}

async fn run(runtime: &SailRuntime, args: RunArgs) -> Result<()> {
    let network = args
        .network
        .unwrap_or_else(|| runtime.options().default_network.clone());
    let project_dir = std::path::absolute(&args.project_dir)
        .with_context(|| format!("failed to resolve {}", args.project_dir.display()))?;

    let mut runner = Runner::new(
        &args.name,
        &args.project,
        project_dir.to_string_lossy(),
        network,
        &args.ip,
    );
    if let Some(hostname) = args.hostname {
        runner = runner.with_hostname(hostname);
    }
    if let Some(command) = args.test_cmd {
        runner = runner.with_mode(RunMode::OneShot { command });
    }

    if args.dry_run {
        let spec = runner.container_spec(runtime, &args.image).await?;
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    runtime
        .run_container(&runner, &args.image)
        .await
        .with_context(|| format!("failed to run {}", args.name))?;
    println!("{}", args.name);
    Ok(())
}

async fn inspect(runtime: &SailRuntime, args: InspectArgs) -> Result<()> {
    let runner = runtime
        .recover(&args.name, args.network.as_deref())
        .await
        .with_context(|| format!("failed to recover {}", args.name))?;

    let details = runtime.engine().inspect_container(&args.name).await?;
    let labels = SailLabels::from_labels(&details.labels);

    let out = serde_json::json!({
        "runner": runner,
        "labels": labels,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
