//! CLI entry point for excerpt-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use excerpt_rs::commands::render::RenderOptions;

#[derive(Parser)]
#[command(name = "excerpt-rs")]
#[command(version)]
#[command(about = "Render blog-post excerpt cards from static-site content nodes", long_about = None)]
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
    /// Render excerpt cards into an index page
    #[command(alias = "r")]
    Render {
        /// Content nodes: a JSON/YAML/markdown file or a directory (defaults to source_dir)
        input: Option<PathBuf>,

        /// Output file (defaults to <public_dir>/index.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the bare fragments instead of writing a page
        #[arg(long, conflicts_with_all = ["output", "watch"])]
        stdout: bool,

        /// Re-render when the input or configuration changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List content nodes as they would be rendered
    List {
        /// Content nodes (defaults to source_dir)
        input: Option<PathBuf>,
    },

    /// Remove the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "excerpt_rs=debug,info"
    } else {
        "excerpt_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Render {
            input,
            output,
            stdout,
            watch,
        } => {
            let site = excerpt_rs::Site::new(&base_dir)?;
            let options = RenderOptions {
                input,
                output,
                stdout,
            };

            tracing::info!("Rendering excerpts...");
            excerpt_rs::commands::render::run(&site, &options)?;

            if watch {
                excerpt_rs::commands::render::watch(&site, &options).await?;
            }
        }

        Commands::List { input } => {
            let site = excerpt_rs::Site::new(&base_dir)?;
            excerpt_rs::commands::list::run(&site, input.as_deref())?;
        }

        Commands::Clean => {
            let site = excerpt_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("excerpt-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
