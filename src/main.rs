use clap::{Parser, Subcommand};
use std::sync::Arc;

use agent_engine_connector::domain::entities::{LlmQuery, Trace};
use agent_engine_connector::infrastructure::config::Config;
use agent_engine_connector::plugins::choices::{get_agent_choices, ChoicesRequest, DEFAULT_REGION};
use agent_engine_connector::plugins::PluginManager;

#[derive(Parser)]
#[command(name = "agent-engine-connector")]
#[command(about = "Query Vertex AI Agent Engine and A2A agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to a configured agent
    Query {
        /// Agent name from the config
        #[arg(short, long)]
        agent: String,
        /// Prompt text
        prompt: String,
    },
    /// List configured agents
    Agents,
    /// List configured connections
    Connections,
    /// List the reasoning engines of a project as agent choices
    ListAgents {
        /// Connection used to authenticate
        #[arg(long)]
        connection: String,
        /// GCP project
        #[arg(long)]
        project: String,
        /// GCP region
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
    /// Show version
    Version,
    /// Generate a sample config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Version => {
            println!("agent-engine-connector v{}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::InitConfig => init_config(),
        Commands::Agents => list_configured_agents(&load_config(&cli.config)),
        Commands::Connections => {
            let config = load_config(&cli.config);
            for name in config.connection_store().names() {
                println!("{}", name);
            }
            0
        }
        Commands::Query { agent, prompt } => {
            block_on(run_query(load_config(&cli.config), agent, prompt))
        }
        Commands::ListAgents {
            connection,
            project,
            region,
        } => {
            let request = ChoicesRequest {
                vertexai_connection: Some(connection),
                gcp_project: Some(project),
                gcp_region: region,
            };
            block_on(list_agent_choices(load_config(&cli.config), request))
        }
    };

    std::process::exit(code);
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using environment", e);
            Config::load_env()
        })
    } else {
        tracing::info!("No config file at {}, using environment", config_path);
        Config::load_env()
    }
}

fn block_on<F: std::future::Future<Output = i32>>(future: F) -> i32 {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            1
        }
    }
}

fn build_manager(config: &Config) -> Option<PluginManager> {
    let mut manager = PluginManager::new(Arc::new(config.connection_store()))
        .with_api_root(config.endpoints.vertex_api_root.clone());

    match manager.load_from_config(&config.agents) {
        Ok(()) => Some(manager),
        Err(e) => {
            eprintln!("Failed to load agents: {}", e);
            None
        }
    }
}

fn list_configured_agents(config: &Config) -> i32 {
    let Some(manager) = build_manager(config) else {
        return 1;
    };

    let agents = manager.list_agents();
    if agents.is_empty() {
        println!("No agents configured.");
    }
    for agent in agents {
        println!("{:<24} {}", agent.name, agent.description);
    }
    0
}

async fn run_query(config: Config, agent: String, prompt: String) -> i32 {
    let Some(manager) = build_manager(&config) else {
        return 1;
    };

    let mut trace = Trace::new("query");
    match manager
        .process(&agent, &LlmQuery::from_prompt(prompt), &serde_json::json!({}), &mut trace)
        .await
    {
        Ok(response) => {
            println!("{}", response.text);
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

async fn list_agent_choices(config: Config, request: ChoicesRequest) -> i32 {
    let store = config.connection_store();
    let choices =
        get_agent_choices(&request, &store, config.endpoints.vertex_api_root.as_deref()).await;

    match serde_json::to_string_pretty(&choices) {
        Ok(json) => {
            println!("{}", json);
            if choices.error.is_some() { 1 } else { 0 }
        }
        Err(e) => {
            eprintln!("Failed to render choices: {}", e);
            1
        }
    }
}

fn init_config() -> i32 {
    match serde_yaml::to_string(&Config::sample()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
            0
        }
        Err(e) => {
            eprintln!("Failed to render config: {}", e);
            1
        }
    }
}
