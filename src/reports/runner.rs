//! Report runs
//!
//! Every run takes a [`RunToken`] from [`ReportSession::begin`]. Only the
//! holder of the latest token may draw; a run that finishes after a newer one
//! started returns [`RunOutcome::Stale`] and leaves the canvas alone.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use tracing::{info, warn};

use super::pipeline::{build, ReportOutput};
use super::{catalog, ReportId};
use crate::parsers::{DataSource, RecordLoader, SalesCsvParser};
use crate::render::{Canvas, ChartRenderer, Tooltip};
use crate::services::Config;
use crate::types::{OrderLine, Result};

/// Identifies one run; later runs get larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The drawing surface of one report container and its tooltip
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub canvas: Canvas,
    pub tooltip: Tooltip,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            tooltip: Tooltip::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Rendered(ReportOutput),
    /// The source could not be loaded; the fallback text was drawn
    Unavailable(String),
    /// A newer run started while this one was loading
    Stale,
}

pub struct ReportSession {
    loader: RecordLoader,
    source: DataSource,
    config: Config,
    current: AtomicU64,
}

impl ReportSession {
    pub fn new(config: Config) -> Result<Self> {
        let parser = SalesCsvParser::with_delimiter(config.delimiter_byte()?);
        Ok(Self {
            loader: RecordLoader::with_parser(Box::new(parser)),
            source: DataSource::parse(&config.input),
            config,
            current: AtomicU64::new(0),
        })
    }

    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    pub fn set_source(&mut self, source: DataSource) {
        self.source = source;
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start a new run; every earlier token becomes stale
    pub fn begin(&self) -> RunToken {
        RunToken(self.current.fetch_add(1, AtomicOrdering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RunToken) -> bool {
        self.current.load(AtomicOrdering::SeqCst) == token.0
    }

    /// Fetch and parse the configured source
    pub async fn load(&self) -> Result<Vec<OrderLine>> {
        self.loader.load(&self.source).await
    }

    /// Aggregate already loaded lines for one report
    pub fn build(&self, id: ReportId, lines: &[OrderLine]) -> ReportOutput {
        build(&catalog::spec(id), lines, &self.config)
    }

    /// Load, aggregate and draw one report into `target`
    pub async fn run(&self, id: ReportId, token: RunToken, target: &mut RenderTarget) -> RunOutcome {
        target.tooltip.reset();
        info!(report = %id, token = token.0, source = %self.source, "report run started");

        let loaded = self.load().await;
        if !self.is_current(token) {
            warn!(report = %id, token = token.0, "discarding stale report run");
            return RunOutcome::Stale;
        }

        match loaded {
            Ok(lines) => {
                let output = self.build(id, &lines);
                ChartRenderer::render(&output.chart, &mut target.canvas);
                target.tooltip.reset();
                info!(
                    report = %id,
                    rows = output.rows.len(),
                    marks = target.canvas.mark_count(),
                    "report rendered"
                );
                RunOutcome::Rendered(output)
            }
            Err(e) => {
                warn!(report = %id, error = %e, "report data unavailable");
                ChartRenderer::render_error(&mut target.canvas, id.title());
                target.tooltip.reset();
                RunOutcome::Unavailable(e.to_string())
            }
        }
    }
}
