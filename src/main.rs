//! CLI entry point for blog-posts-block

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_posts_block::commands;

#[derive(Parser)]
#[command(name = "blog-posts-block")]
#[command(version)]
#[command(about = "Render a recent posts listing block from a directory of Markdown posts", long_about = None)]
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

#[derive(clap::Args)]
struct AttributeArgs {
    /// Attributes file (.json, .yml, .yaml or .toml)
    #[arg(short, long)]
    attributes: Option<PathBuf>,

    /// Override one attribute, e.g. --set numberOfPosts=3
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the block and print the HTML fragment
    #[command(alias = "r")]
    Render {
        #[command(flatten)]
        attrs: AttributeArgs,
    },

    /// Validate block attributes and print their normalized form
    Validate {
        #[command(flatten)]
        attrs: AttributeArgs,
    },

    /// Print the block registration descriptor
    Metadata,

    /// List store content
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Start the preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_posts_block=debug,info"
    } else {
        "blog_posts_block=info"
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
        Commands::Render { attrs } => {
            let site = blog_posts_block::Site::new(&base_dir)?;
            let overrides = commands::load_attributes(attrs.attributes.as_deref(), &attrs.set)?;
            println!("{}", commands::render::run(&site, &overrides)?);
        }

        Commands::Validate { attrs } => {
            let raw = commands::load_attributes(attrs.attributes.as_deref(), &attrs.set)?;
            let (json, summary) = commands::validate::run(&raw)?;
            println!("{}", json);
            eprintln!("{}", summary);
        }

        Commands::Metadata => {
            println!("{}", commands::metadata::run()?);
        }

        Commands::List { r#type } => {
            let site = blog_posts_block::Site::new(&base_dir)?;
            commands::list::run(&site, &r#type)?;
        }

        Commands::Serve { port, ip } => {
            let site = blog_posts_block::Site::new(&base_dir)?;
            tracing::info!("Serving posts from {:?}", site.source_dir);
            blog_posts_block::server::start(&site, &ip, port).await?;
        }

        Commands::Version => {
            println!("blog-posts-block version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
