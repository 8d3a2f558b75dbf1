//! CLI entry point for inkpost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(version)]
#[command(about = "A small content-managed blog with feed sync", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Sync posts from the configured feed
    Sync {
        /// Feed URL (overrides feed_url from _config.yml)
        #[arg(long)]
        url: Option<String>,
    },

    /// List site content
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpost=debug,info"
    } else {
        "inkpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog site in {:?}", target_dir);
            inkpost::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog site in {:?}", target_dir);
        }

        Commands::Server { port, ip } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            inkpost::server::start(&blog, &ip, port).await?;
        }

        Commands::Sync { url } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            tracing::info!("Syncing posts from feed...");
            inkpost::sync::run(&blog, url.as_deref()).await?;
        }

        Commands::List { r#type } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Version => {
            println!("inkpost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
