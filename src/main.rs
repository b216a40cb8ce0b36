//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{Environment, Site};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small static site generator for markdown pages and blog posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Use the production base URL regardless of FOLIO_ENV
    #[arg(long, global = true)]
    production: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post (or page with --page)
    New {
        /// Title of the new post
        title: String,

        /// Create a top-level page instead of a blog post
        #[arg(long)]
        page: bool,
    },

    /// Generate static files
    #[command(alias = "b")]
    Build,

    /// Start the development server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port, 3001)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip, localhost)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, page, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let env = if cli.production {
        Environment::Production
    } else {
        Environment::from_env()
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, page } => {
            let site = Site::new(&base_dir, env)?;
            let path = folio::commands::new::create(&site, &title, page)?;
            println!("Created: {:?}", path);
        }

        Commands::Build => {
            let site = Site::new(&base_dir, env)?;
            tracing::info!(
                "Building {:?} ({:?}, base URL {:?})",
                site.base_dir,
                site.env,
                site.base_url
            );
            site.build().context("Build failed")?;
            println!("Build completed successfully!");
        }

        Commands::Serve { port, ip, open } => {
            let site = Site::new(&base_dir, env)?;
            let port = port.unwrap_or(site.config.server.port);
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            folio::commands::serve::run(&site, &ip, port, open).await?;
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir, env)?;
            folio::commands::list::run(&site, &r#type)?;
        }
    }

    Ok(())
}
