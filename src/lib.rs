//! faqbook - AWS FAQ scraper
//!
//! Crawls the public AWS FAQ index, follows every per-service FAQ page,
//! isolates each page's FAQ body with per-service rules, downloads the
//! images it references and writes one static HTML book with a table of
//! contents.
//!
//! # Architecture
//!
//! ```text
//! index page ──▶ SectionIndexer ──▶ [Section]
//!                                      │  (bounded fan-out)
//!                                      ▼
//!                      PageFetcher ──▶ ContentExtractor (RuleTable)
//!                                      │
//!                                      ▼
//!                  TocGenerator + DocumentAssembler ──▶ ImageFetcher
//!                                      │
//!                                      ▼
//!                                  index.html
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use faqbook::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder().concurrency(4).output("aws-faqs.html").build();
//!     let summary = Pipeline::new(config)?.run().await?;
//!     println!("{} sections", summary.sections);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assemble;
pub mod config;
pub mod dom;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod images;
pub mod index;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod toc;

// Re-exports for convenience
pub use assemble::DocumentAssembler;
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use extraction::{ContentExtractor, Extraction, RuleTable};
pub use fetch::PageFetcher;
pub use images::{ImageFetcher, ImageOutcome};
pub use index::{Section, SectionIndexer};
pub use pipeline::Pipeline;
pub use stats::{RunStats, RunSummary};
pub use toc::{TocGenerator, TocLink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
