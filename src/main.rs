use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use effectloop::briefing::{
    BriefingEnv, BriefingModel, BriefingWorkflow, HttpBriefingApi, InitParams, LogSessionHandler,
};
use effectloop::config::{Config, ConfigStore};
use effectloop::deferred::Deferred;
use effectloop::logging::init_tracing;
use effectloop::runtime::Store;

#[derive(Parser, Debug)]
#[command(name = "effectloop", version, about = "Run effect-driven workflows")]
struct Cli {
    /// Config file (default: ~/.config/effectloop/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a safety briefing and print the wizard it starts with.
    Briefing {
        #[arg(long)]
        draft_id: Option<String>,
        #[arg(long)]
        location_id: Option<String>,
        /// Give up if the workflow has not settled after this many seconds.
        #[arg(long, default_value_t = 90)]
        wait_secs: u64,
    },
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let store = ConfigStore::open(path.clone())
        .with_context(|| format!("loading config from {}", path.display()))?;
    let config = store.get();
    init_tracing(&config.logging.filter);

    match cli.command {
        Command::Config => {
            println!("# {}", store.path().display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Briefing {
            draft_id,
            location_id,
            wait_secs,
        } => {
            let params = InitParams {
                draft_id,
                location_id,
            };
            run_briefing(&config, params, Duration::from_secs(wait_secs)).await
        }
    }
}

async fn run_briefing(config: &Config, params: InitParams, wait: Duration) -> Result<()> {
    let api = HttpBriefingApi::new(&config.api).context("building briefing API client")?;
    let env = BriefingEnv {
        api: Arc::new(api),
        session: Arc::new(LogSessionHandler),
        init_timeout: Duration::from_secs(config.workflow.init_timeout_seconds.into()),
    };
    let workflow = BriefingWorkflow::new(env);
    let (model, effect) = workflow.init(params);
    let store = Store::spawn(workflow, model, effect, &config.runtime);

    let settled = tokio::select! {
        result = tokio::time::timeout(wait, store.wait_for(is_settled)) => result
            .context("timed out waiting for the briefing to load")?
            .context("workflow stopped unexpectedly")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
            store.shutdown().await;
            return Ok(());
        }
    };

    store.shutdown().await;
    tracing::info!(stats = ?store.stats(), "workflow finished");

    print_summary(&settled);
    if settled.wizard.ok().is_none() {
        bail!("briefing could not be loaded");
    }
    Ok(())
}

/// Loaded with no save in flight, or something went wrong.
fn is_settled(model: &BriefingModel) -> bool {
    let saving = model.wizard.ok().map(|w| w.saving).unwrap_or(false);
    (model.wizard.is_resolved() && !saving) || !model.alerts.is_empty()
}

fn load_status(model: &BriefingModel) -> &'static str {
    if model.wizard.is_pending() {
        "loading"
    } else {
        "not started"
    }
}

fn print_summary(model: &BriefingModel) {
    match &model.wizard {
        Deferred::Resolved(Ok(wizard)) => {
            println!(
                "draft:    {}",
                wizard.draft_id.as_deref().unwrap_or("(unsaved)")
            );
            println!(
                "location: {}",
                wizard.location.as_ref().map(|l| l.name.as_str()).unwrap_or("-")
            );
            println!("step:     {:?}", wizard.step);
            for (key, value) in &wizard.values {
                println!("  {} = {}", key, value);
            }
        }
        Deferred::Resolved(Err(err)) => println!("failed:   {}", err),
        Deferred::InProgress | Deferred::NotStarted => println!("status:   {}", load_status(model)),
    }
    for alert in &model.alerts.alerts {
        println!("[{:?}] {}", alert.kind, alert.message);
    }
}
