use crate::workflow::config::PipelineConfig;
use anyhow::Context;
use chrono::{DateTime, Utc};
use sgvcore::prelude::{DisplayReading, GaugeRenderer, HttpSource, ReadingSource};
use std::path::PathBuf;

#[derive(Debug)]
pub struct RunSummary {
    pub reading: DisplayReading,
    pub output: PathBuf,
}

/// Drives one fetch -> transform -> render pass.
#[derive(Clone)]
pub struct Runner {
    config: PipelineConfig,
}

impl Runner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Fetches from the configured endpoint and renders against the wall clock.
    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let source = HttpSource::new(self.config.url.as_str())
            .context("building http client")?;
        self.execute(&source, Utc::now())
    }

    pub fn execute(
        &self,
        source: &dyn ReadingSource,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RunSummary> {
        let renderer = GaugeRenderer::new(self.config.render_config())
            .context("validating render config")?;

        let readings = source
            .fetch()
            .with_context(|| format!("fetching readings from {}", self.config.url))?;
        let reading =
            DisplayReading::from_readings(&readings, now).context("transforming readings")?;
        renderer
            .render_to_file(&reading, &self.config.output)
            .with_context(|| format!("rendering gauge to {}", self.config.output.display()))?;

        Ok(RunSummary {
            reading,
            output: self.config.output.clone(),
        })
    }
}
