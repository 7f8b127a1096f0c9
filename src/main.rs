//! CLI entry point for privctx

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "privctx")]
#[command(version)]
#[command(about = "Content pipeline for the Privileged Contexts blog", long_about = None)]
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
    /// Generate the markdown and RSS routes
    #[command(alias = "g")]
    Generate {
        /// Include scheduled posts (drafts stay hidden)
        #[arg(long)]
        preview: bool,

        /// Watch for content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Do not reload when content changes
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag, route)
        #[arg(default_value = "post")]
        r#type: String,

        /// Evaluate visibility as in preview mode
        #[arg(long)]
        preview: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "privileged_contexts=debug,privctx=debug,info"
    } else {
        "privileged_contexts=info,privctx=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    match cli.command {
        Commands::Generate { preview, watch } => {
            let blog = privileged_contexts::Blog::new(&base_dir)?;
            tracing::info!("Generating routes from {:?}", blog.content_dir);

            blog.generate(preview)?;
            println!("Generated successfully!");

            if watch {
                privileged_contexts::commands::generate::watch(&blog, preview)?;
            }
        }

        Commands::Server {
            port,
            ip,
            r#static,
        } => {
            let blog = privileged_contexts::Blog::new(&base_dir)?;
            tracing::info!("Starting preview server at http://{}:{}", ip, port);
            privileged_contexts::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let blog = privileged_contexts::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, preview } => {
            let blog = privileged_contexts::Blog::new(&base_dir)?;
            privileged_contexts::commands::list::run(&blog, &r#type, preview)?;
        }

        Commands::Version => {
            println!("privctx version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
