use anyhow::Context;
use clap::{Parser, Subcommand};
use pkg_bootstrap::discovery::{publish_cluster_info, publish_cluster_info_bytes, read_cluster_info};
use pkg_bootstrap::token::update_or_create_token;
use pkg_constants::paths::{DEFAULT_ADMIN_KUBECONFIG, DEFAULT_CONFIG, DEFAULT_DATA_DIR};
use pkg_constants::token::DEFAULT_TOKEN_TTL;
use pkg_state::{RegistryClient, StateStore};
use pkg_types::config::{BootstrapConfigFile, load_config_file};
use pkg_types::kubeconfig::sanitize_kubeconfig;
use pkg_types::token::{BootstrapToken, parse_ttl};
use pkg_types::validate::validate_usages;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "kubeboot", about = "Bootstrap tokens and cluster discovery info")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_CONFIG)]
    config: String,

    /// Directory for SlateDB state storage
    #[arg(long)]
    data_dir: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bootstrap tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Manage the public cluster-info record
    ClusterInfo {
        #[command(subcommand)]
        action: ClusterInfoAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a bootstrap token, generating one if none is given
    Create {
        /// Token of the form <id>.<secret>
        token: Option<String>,
        /// Lifetime such as 24h or 1h30m; 0 never expires
        #[arg(long)]
        ttl: Option<String>,
        /// Comma-separated usages (signing, authentication)
        #[arg(long, value_delimiter = ',')]
        usages: Option<Vec<String>>,
        #[arg(long, default_value = "")]
        description: String,
        /// Refuse to overwrite a token with the same id
        #[arg(long)]
        fail_if_exists: bool,
    },
    /// Print a random token without storing it
    Generate,
}

#[derive(Subcommand)]
enum ClusterInfoAction {
    /// Publish a client configuration as cluster discovery info
    Publish {
        /// Client configuration to publish
        #[arg(long)]
        kubeconfig: Option<String>,
        /// Publish only the current cluster's server and CA
        #[arg(long)]
        sanitize: bool,
    },
    /// Print the published client configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    // Load config file (returns defaults if file not found)
    let file_cfg: BootstrapConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir.clone())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let store = StateStore::new(&data_dir).await?;
    let client = RegistryClient::new(store.clone());

    let result = run(cli.command, &file_cfg, &client).await;
    store.close().await?;
    result
}

async fn run(
    command: Commands,
    file_cfg: &BootstrapConfigFile,
    client: &RegistryClient,
) -> anyhow::Result<()> {
    match command {
        Commands::Token { action } => match action {
            TokenAction::Create {
                token,
                ttl,
                usages,
                description,
                fail_if_exists,
            } => {
                let mut token = match token {
                    Some(t) => BootstrapToken::parse(&t)?,
                    None => BootstrapToken::generate(),
                };
                let ttl = ttl
                    .or(file_cfg.token_ttl.clone())
                    .unwrap_or_else(|| DEFAULT_TOKEN_TTL.to_string());
                token.ttl = parse_ttl(&ttl)?;
                token.usages = usages
                    .or(file_cfg.token_usages.clone())
                    .unwrap_or_else(|| vec!["signing".to_string(), "authentication".to_string()]);
                validate_usages(&token.usages)?;
                token.description = description;

                info!("Creating bootstrap token {} (ttl {})", token.redacted(), ttl);
                update_or_create_token(client, &token, fail_if_exists).await?;
                println!("{}", token);
            }
            TokenAction::Generate => println!("{}", BootstrapToken::generate()),
        },
        Commands::ClusterInfo { action } => match action {
            ClusterInfoAction::Publish {
                kubeconfig,
                sanitize,
            } => {
                let path = PathBuf::from(
                    kubeconfig
                        .or(file_cfg.kubeconfig.clone())
                        .unwrap_or_else(|| DEFAULT_ADMIN_KUBECONFIG.to_string()),
                );
                info!("Publishing cluster info from {}", path.display());
                if sanitize {
                    let content = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    publish_cluster_info_bytes(client, &sanitize_kubeconfig(&content)?).await?;
                } else {
                    publish_cluster_info(client, &path).await?;
                }
            }
            ClusterInfoAction::Show => {
                print!("{}", read_cluster_info(client).await?);
            }
        },
    }
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn token_generate_parses() {
        let cli = Cli::try_parse_from(["kubeboot", "token", "generate"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Token {
                action: TokenAction::Generate
            }
        ));
    }

    #[tokio::test]
    async fn token_generate_writes_nothing() {
        let store = StateStore::in_memory().await.unwrap();
        let client = RegistryClient::new(store.clone());
        let command = Commands::Token {
            action: TokenAction::Generate,
        };

        run(command, &BootstrapConfigFile::default(), &client).await.unwrap();

        assert!(read_cluster_info(&client).await.is_err());
    }
}
