//! faqbook
//!
//! Scrapes the AWS FAQ index into a single static HTML book.

use anyhow::Context;
use clap::Parser;
use faqbook::{Config, ConfigBuilder, Pipeline};
use std::path::PathBuf;

/// faqbook command line
#[derive(Parser, Debug)]
#[command(name = "faqbook")]
#[command(version)]
#[command(about = "Scrape every AWS service FAQ into one HTML page with a table of contents")]
struct Args {
    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Index page to crawl
    #[arg(long)]
    base_url: Option<String>,

    /// Max simultaneous requests
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Short-names to exclude (comma separated)
    #[arg(long, value_delimiter = ',')]
    skip: Option<Vec<String>>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output HTML file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for downloaded images
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Stylesheet href linked from the page
    #[arg(long)]
    stylesheet: Option<String>,

    /// Write the document without pretty printing
    #[arg(long)]
    no_pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let base = match self.config {
            Some(ref path) => Config::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        let mut builder = ConfigBuilder::from_config(base);
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(limit) = self.concurrency {
            builder = builder.concurrency(limit);
        }
        if let Some(skip) = self.skip {
            builder = builder.skip(skip);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        if let Some(output) = self.output {
            builder = builder.output(output);
        }
        if let Some(dir) = self.images_dir {
            builder = builder.images_dir(dir);
        }
        if let Some(href) = self.stylesheet {
            builder = builder.stylesheet(href);
        }
        if self.no_pretty {
            builder = builder.pretty(false);
        }
        Ok(builder.build())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let config = args.into_config()?;
    tracing::info!(
        "{} {} crawling {} (concurrency {})",
        faqbook::NAME,
        faqbook::VERSION,
        config.base_url,
        config.concurrency
    );

    let pipeline = Pipeline::new(config).context("invalid configuration")?;
    pipeline.run().await.context("scrape run failed")?;
    Ok(())
}
