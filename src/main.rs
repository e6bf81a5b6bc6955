mod cli;

use anyhow::{Context, Result};
use catalog_core::config::{Config, StorageBackend};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting catalog server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    catalog_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "catalog=trace,catalog_server=trace,catalog_storage=debug,catalog_db=debug,catalog_core=debug,tower_http=debug".to_string()
        } else {
            "catalog=debug,catalog_server=debug,catalog_storage=info,catalog_db=info,catalog_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("catalog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config file {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    match config.storage.backend {
        StorageBackend::Json => println!(
            "  Storage: json ({})",
            config.storage.catalog_path.display()
        ),
        StorageBackend::Sqlite => {
            println!("  Storage: sqlite ({})", config.storage.db_path.display())
        }
    }
    println!("  Images: {}", config.storage.images_dir.display());
    println!("  Image required: {}", config.catalog.require_image);
    println!("  Max upload: {} bytes", config.catalog.max_upload_bytes);

    for warning in config.validate() {
        println!("  warning: {warning}");
    }

    Ok(())
}
