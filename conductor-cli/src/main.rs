use clap::{Parser, Subcommand};
use conductor::{
    CoordinatorConfig, Logger, Metadata, ToolDispatchError, WorkflowCoordinator, logger,
    router_fn,
};
use conductor_agents::{ContentServices, ContentState, content_pipeline};
use serde_json::{Value, json};
use std::sync::Arc;

mod corpus;

use corpus::sample_corpus;

#[derive(Parser, Debug)]
#[command(name = "conductor", version)]
#[command(about = "Conductor CLI - run the content pipeline from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the content pipeline for a topic
    Run {
        /// Topic to research and write about
        #[arg(long)]
        topic: String,
        /// Target audience for tone and drafting
        #[arg(long)]
        audience: Option<String>,
        /// Workflow id (default: random UUID)
        #[arg(long)]
        workflow_id: Option<String>,
        /// Run metadata entry, repeatable
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
        meta: Vec<(String, String)>,
    },
    /// List the registered pipeline steps
    Steps,
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn build_coordinator(config: CoordinatorConfig) -> WorkflowCoordinator<ContentState> {
    let router = router_fn(|agent: String, tool: String, payload: Value| async move {
        tracing::info!(agent = %agent, tool = %tool, payload = %payload, "Tool invoked");
        Ok::<_, ToolDispatchError>(json!({ "acknowledged": true }))
    });

    let mut coordinator =
        WorkflowCoordinator::new(logger::global().clone(), Arc::new(router)).with_config(config);
    if let Err(e) = coordinator
        .register_workflow(content_pipeline(ContentServices::in_memory(sample_corpus())))
    {
        tracing::error!(error = %e, "Failed to register pipeline");
        std::process::exit(1);
    }
    coordinator
}

#[tokio::main]
async fn main() {
    // Initialize JSON logging once.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .try_init();

    let _ = logger::init_global(Logger::tracing());

    let cli = Cli::parse();

    let config = match CoordinatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };
    let coordinator = build_coordinator(config);

    match cli.command {
        Commands::Run {
            topic,
            audience,
            workflow_id,
            meta,
        } => {
            let workflow_id = workflow_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut state = ContentState::new(topic);
            if let Some(audience) = audience {
                state = state.with_audience(audience);
            }
            let metadata: Metadata = meta
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();

            match coordinator
                .execute_workflow(workflow_id.as_str(), state, metadata)
                .await
            {
                Ok(run) => match serde_json::to_string_pretty(&run) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize run");
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    tracing::error!(
                        workflow_id = %workflow_id,
                        error = %e,
                        code = e.error_code(),
                        "Workflow failed"
                    );
                    std::process::exit(1);
                }
            }
        }
        Commands::Steps => {
            for (index, step) in coordinator.steps().enumerate() {
                println!(
                    "{}. {} ({}) - {}",
                    index + 1,
                    step.id,
                    step.agent_name,
                    step.description
                );
            }
        }
    }
}
