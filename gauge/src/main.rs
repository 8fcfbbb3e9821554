use clap::Parser;
use log::info;
use sgvcore::render::RenderPreset;
use std::path::PathBuf;
use workflow::config::PipelineConfig;
use workflow::runner::Runner;

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Render the latest SGV reading as a gauge image")]
struct Args {
    /// Layout preset used when the config file carries no render block
    #[arg(long)]
    preset: Option<RenderPreset>,
    /// Load a pipeline config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Endpoint returning the newest-first entry array
    #[arg(long)]
    url: Option<String>,
    /// Where to write the PNG
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn pipeline_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Args::parse().pipeline_config()?;
    info!(
        "preset {} -> {} from {}",
        config.preset,
        config.output.display(),
        config.url
    );

    let summary = Runner::new(config).run()?;
    info!(
        "{:.1} mmol/L {} ({} min ago) written to {}",
        summary.reading.value,
        summary.reading.direction,
        summary.reading.minutes_ago_label(),
        summary.output.display()
    );
    println!("Image saved successfully!");

    Ok(())
}
