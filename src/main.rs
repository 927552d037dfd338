//! AdminKit server binary.

use adminkit_core::AdminConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adminkit", version, about = "Multi-tenant admin-management backend")]
struct Cli {
    /// Config file path (overrides ADMINKIT_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Listen port override.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the admin account if it does not exist.
    InitAdmin {
        #[arg(long, default_value = "admin")]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// List modules enabled in the manifest.
    Modules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AdminConfig::load_from(path)?,
        None => AdminConfig::load()?,
    };

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            adminkit_gateway::start(config).await
        }
        Command::InitAdmin { username, password } => {
            let db = adminkit_system::SystemDb::open(Path::new(&config.database.path))?;
            let hash = adminkit_auth::hash_password(&password)?;
            if adminkit_system::seed::ensure_admin(&db, &username, &hash)? {
                println!("admin account '{username}' created");
            } else {
                println!("admin account '{username}' already exists");
            }
            Ok(())
        }
        Command::Modules => {
            let registry = adminkit_loader::ModuleRegistry::new(
                &config.modules.manifest,
                &config.modules.dir,
                adminkit_loader::ComponentCatalog::<()>::new(),
            );
            let names = registry.enabled_modules().await;
            if names.is_empty() {
                println!("no modules enabled");
            }
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
    }
}
