//! Operator CLI driving the draft/publish/rollback workflow against the
//! configured shop. Outputs JSON so results can be piped into jq or logs.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use searchboost_core::{
    ContentStore, FileAuditLog, OptimizationSettings, ResourceRef, ResourceType,
};
use searchboost_optimizer::Optimizer;
use searchboost_shopify::ShopifyAdminClient;
use searchboost_workflow::{DraftStatus, Workflow};

#[derive(Debug, Parser)]
#[command(name = "searchboost")]
#[command(about = "Draft, publish, and roll back optimized storefront content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Optimize the resource's content and stage it as a draft.
    Draft(DraftArgs),
    /// Promote the staged draft to the live keys.
    Publish(TargetArgs),
    /// Restore the original content and clear all optimization records.
    Rollback(TargetArgs),
    /// Show the lifecycle state of a resource.
    Status(TargetArgs),
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// "product" or "article"
    resource_type: ResourceType,
    resource_id: u64,
}

impl TargetArgs {
    fn resource(&self) -> ResourceRef {
        ResourceRef::new(self.resource_type, self.resource_id)
    }
}

#[derive(Debug, Args)]
struct DraftArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Comma-separated keywords the optimization should cover.
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,

    #[arg(long, default_value = "professional")]
    tone: String,

    /// LLM search agent the content is tuned for.
    #[arg(long, default_value = "chatgpt")]
    target_llm: String,

    /// Keep a version history entry on each publish.
    #[arg(long)]
    versioning: bool,
}

impl DraftArgs {
    fn settings(&self) -> OptimizationSettings {
        OptimizationSettings {
            target_llm: self.target_llm.clone(),
            keywords: self.keywords.clone(),
            tone: self.tone.clone(),
            enable_versioning: self.versioning,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = searchboost_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn ContentStore> = Arc::new(ShopifyAdminClient::from_config(&config)?);
    let audit = Arc::new(FileAuditLog::new(config.audit_log_path.clone()));
    let optimizer = Optimizer::from_config(&config)?;
    let workflow = Workflow::new(store, audit, optimizer, &config.shop_domain);

    match cli.command {
        Commands::Draft(args) => {
            let outcome = workflow
                .save_draft(args.target.resource(), None, args.settings())
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if outcome.status == DraftStatus::Rejected {
                anyhow::bail!(
                    "draft rejected by risk gate (risk score {:.2})",
                    outcome.scores.risk_score
                );
            }
        }
        Commands::Publish(target) => {
            let outcome = workflow.publish(target.resource()).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Rollback(target) => {
            let outcome = workflow.rollback(target.resource()).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Status(target) => {
            let report = workflow.status(target.resource()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
