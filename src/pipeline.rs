//! End-to-end run
//!
//! index page → sections → per-service pages (bounded fan-out) → ToC and
//! body → images (same bound) → output file. Results stay in index order
//! regardless of completion order, and the first fetch error aborts the run.

use crate::assemble::DocumentAssembler;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extraction::{ContentExtractor, Extraction};
use crate::fetch::PageFetcher;
use crate::images::{ImageFetcher, ImageOutcome};
use crate::index::{Section, SectionIndexer};
use crate::stats::{RunStats, RunSummary};
use crate::toc::TocGenerator;
use futures::future::try_join_all;
use scraper::Html;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument};
use url::Url;

/// One configured scrape run
pub struct Pipeline {
    config: Config,
    base: Url,
    fetcher: PageFetcher,
    indexer: SectionIndexer,
    extractor: ContentExtractor,
    toc: TocGenerator,
    assembler: DocumentAssembler,
    stats: RunStats,
}

impl Pipeline {
    /// Validate the config and prepare every stage
    pub fn new(config: Config) -> Result<Self> {
        let base = config.validate()?;
        Ok(Self {
            base,
            fetcher: PageFetcher::new(&config)?,
            indexer: SectionIndexer::new()?,
            extractor: ContentExtractor::new(config.rules.clone())?,
            toc: TocGenerator::new(config.rules.clone())?,
            assembler: DocumentAssembler::new(&config)?,
            stats: RunStats::new(),
            config,
        })
    }

    /// The run's counters
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Scrape everything and write the book
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn run(&self) -> Result<RunSummary> {
        let sections = self.index().await?;
        let sections = self.fetch_sections(sections).await?;
        let html = self.render(&sections).await?;

        if let Err(e) = tokio::fs::write(&self.config.output, html).await {
            error!("Failed to write {}: {}", self.config.output.display(), e);
            return Err(e.into());
        }
        info!("done!");

        let summary = self
            .stats
            .snapshot(sections.len(), self.config.output.clone());
        info!(
            "Wrote {} sections to {} ({} misses, {} images downloaded, {} cached) in {}ms",
            summary.sections,
            summary.output.display(),
            summary.extraction_misses,
            summary.images_downloaded,
            summary.images_skipped,
            summary.elapsed_ms
        );
        Ok(summary)
    }

    /// Fetch the index page and list its sections
    pub async fn index(&self) -> Result<Vec<Section>> {
        let doc = self.fetcher.fetch_document(self.base.as_str()).await?;
        Ok(self.indexer.index(&doc, &self.base, &self.config.skip))
    }

    /// Fetch and extract every section, at most `concurrency` at a time
    pub async fn fetch_sections(&self, sections: Vec<Section>) -> Result<Vec<Section>> {
        let limit = Semaphore::new(self.config.concurrency);
        let limit = &limit;
        let tasks = sections.into_iter().map(|section| async move {
            let _permit = limit
                .acquire()
                .await
                .map_err(|e| Error::generic(format!("Fetch limiter closed: {}", e)))?;
            self.fetch_section(section).await
        });
        try_join_all(tasks).await
    }

    async fn fetch_section(&self, mut section: Section) -> Result<Section> {
        let mut doc = self.fetcher.fetch_document(&section.url).await?;
        self.stats.record_page();
        section.content = Some(self.extract_page(&section.name, &mut doc).html);
        Ok(section)
    }

    /// Extract a service page's FAQ body, counting misses
    pub fn extract_page(&self, name: &str, doc: &mut Html) -> Extraction {
        let extraction = self.extractor.extract(name, doc);
        if extraction.missed {
            self.stats.record_miss();
        }
        extraction
    }

    /// Build the final markup, downloading the images it references
    async fn render(&self, sections: &[Section]) -> Result<String> {
        let toc = self.toc.render(sections);
        let body = self.assembler.body(sections);
        let shell = self.assembler.shell(&toc, &body);

        let sources = {
            let doc = Html::parse_document(&shell);
            self.assembler.image_sources(&doc, &self.base)
        };
        self.fetch_images(&sources).await?;
        info!("fetch images done!");

        let mut doc = Html::parse_document(&shell);
        self.assembler.finish(&mut doc, &self.base)
    }

    /// Download images, at most `concurrency` at a time
    pub async fn fetch_images(&self, sources: &[String]) -> Result<Vec<ImageOutcome>> {
        tokio::fs::create_dir_all(&self.config.images_dir).await?;
        let images = ImageFetcher::new(
            &self.fetcher,
            &self.base,
            &self.config.images_dir,
            &self.stats,
        );
        let images = &images;
        let limit = Semaphore::new(self.config.concurrency);
        let limit = &limit;
        let tasks = sources.iter().map(|src| async move {
            let _permit = limit
                .acquire()
                .await
                .map_err(|e| Error::generic(format!("Image limiter closed: {}", e)))?;
            images.fetch(src).await
        });
        try_join_all(tasks).await
    }
}
