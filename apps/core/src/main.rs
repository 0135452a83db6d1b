// athena CLI entry point
// Intent parsing and chat with AthenaMist / Gemini from the terminal

use anyhow::Context;
use athena_core::actors::{
    AssistantHandle, AssistantMode, AssistantOptions, AssistantResponse, ChatBackend,
    CompletionRequest, FallbackPolicy, SceneContext,
};
use athena_core::config::{default_config_path, AgentConfig, EnvCredentialStore, Service};
use athena_core::providers::{AthenaMistClient, GeminiClient};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// AthenaMist agent: parse requests and chat about 3D scenes
#[derive(Parser, Debug)]
#[command(name = "athena")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Intent parsing and LLM chat for 3D content creation")]
struct Cli {
    /// Config file (defaults to $ATHENA_CONFIG_DIR/ai_agent_config.json)
    #[arg(long, global = true, env = "ATHENA_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a request and print the intent as JSON
    Parse {
        /// Request text
        #[arg(required = true)]
        text: Vec<String>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Send a chat message to a provider
    Chat(ChatArgs),

    /// Check that a provider answers
    #[command(name = "test-connection")]
    TestConnection {
        #[arg(long, value_enum, default_value = "athena-mist")]
        provider: Provider,
    },

    /// Inspect or edit the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[arg(long, value_enum, default_value = "athena-mist")]
    provider: Provider,

    /// Interaction mode, e.g. technical_expert
    #[arg(long)]
    mode: Option<AssistantMode>,

    /// JSON file describing the current scene
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Print reply chunks as they arrive
    #[arg(long)]
    stream: bool,

    /// Print the full response as JSON
    #[arg(long)]
    json: bool,

    /// Message text
    #[arg(required = true)]
    message: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective config with keys masked
    Show,
    /// Store an API key in the config file
    #[command(name = "set-key")]
    SetKey {
        #[arg(long)]
        service: Service,
        key: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Provider {
    AthenaMist,
    Gemini,
}

impl From<Provider> for Service {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::AthenaMist => Service::AthenaMist,
            Provider::Gemini => Service::Gemini,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout is reserved for command output
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = AgentConfig::load(&config_path);
    debug!("Using config at {}", config_path.display());

    match cli.command {
        Command::Parse { text, pretty } => {
            let intent = athena_core::parse(&text.join(" "));
            let out = if pretty {
                serde_json::to_string_pretty(&intent)?
            } else {
                serde_json::to_string(&intent)?
            };
            println!("{}", out);
        }
        Command::Chat(args) => match args.provider {
            Provider::AthenaMist => {
                let key = config.api_key(Service::AthenaMist, &EnvCredentialStore);
                let backend = Arc::new(AthenaMistClient::new(&config.athena_mist, key));
                chat(backend, FallbackPolicy::LocalGuidance, &config, args).await?;
            }
            Provider::Gemini => {
                let key = config.api_key(Service::Gemini, &EnvCredentialStore);
                let backend = Arc::new(GeminiClient::new(&config.gemini, key));
                chat(backend, FallbackPolicy::ReportError, &config, args).await?;
            }
        },
        Command::TestConnection { provider } => {
            let service = Service::from(provider);
            let key = config.api_key(service, &EnvCredentialStore);
            let result = match provider {
                Provider::AthenaMist => {
                    AthenaMistClient::new(&config.athena_mist, key)
                        .test_connection()
                        .await
                }
                Provider::Gemini => GeminiClient::new(&config.gemini, key).test_connection().await,
            };
            result.with_context(|| format!("{} connection test failed", service))?;
            println!("{}: connection OK", service);
        }
        Command::Config(ConfigCommand::Show) => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        Command::Config(ConfigCommand::SetKey { service, key }) => {
            let mut config = config;
            config.set_api_key(service, &key, &EnvCredentialStore)?;
            config.save(&config_path)?;
            info!("Stored {} API key", service);
            println!("Saved {} API key to {}", service, config_path.display());
        }
    }

    Ok(())
}

fn load_scene(path: &Path) -> anyhow::Result<SceneContext> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid scene file {}", path.display()))
}

async fn chat<B: ChatBackend>(
    backend: Arc<B>,
    fallback: FallbackPolicy,
    config: &AgentConfig,
    args: ChatArgs,
) -> anyhow::Result<()> {
    let message = args.message.join(" ");
    let scene = args.scene.as_deref().map(load_scene).transpose()?;
    let mode = args.mode.unwrap_or_default();

    if args.stream {
        let intent = athena_core::parse(&message);
        let scene_text = scene.as_ref().map(SceneContext::describe);
        let request = CompletionRequest {
            system_prompt: mode.system_prompt(scene_text.as_deref(), Some(intent.category)),
            scene,
            history: Vec::new(),
            message,
        };

        let (tx, mut rx) = mpsc::channel(32);
        let task = tokio::spawn(async move { backend.stream_complete(request, tx).await });

        let mut stdout = std::io::stdout();
        while let Some(chunk) = rx.recv().await {
            write!(stdout, "{}", chunk?)?;
            stdout.flush()?;
        }
        writeln!(stdout)?;
        task.await??;
        return Ok(());
    }

    let mut options = AssistantOptions::from_settings(&config.assistant, fallback);
    options.mode = mode;
    let assistant = AssistantHandle::new(backend, options);

    let response = assistant.chat(message, scene, None).await?;
    assistant.shutdown().await?;
    print_response(&response, args.json)
}

fn print_response(response: &AssistantResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!("{}", response.content);
    if !response.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &response.suggestions {
            println!("  - {}", suggestion);
        }
    }
    println!(
        "\n[{} | {} | confidence {:.0}%]",
        response.mode,
        response.intent.category,
        response.confidence * 100.0
    );
    Ok(())
}
