use anyhow::Context;
use serde::{Deserialize, Serialize};
use sgvcore::render::{RenderConfig, RenderPreset};
use sgvcore::source::DEFAULT_ENDPOINT;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "./sgv_gauge.png";

/// Everything a run needs, fixed before the pipeline starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub url: String,
    pub output: PathBuf,
    pub preset: RenderPreset,
    /// Full render block; replaces the preset when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_preset(RenderPreset::default())
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pipeline config {}", path_ref.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pipeline config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_preset(preset: RenderPreset) -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preset,
            render: None,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        self.render
            .clone()
            .unwrap_or_else(|| self.preset.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_use_hardcoded_endpoint_and_standard_preset() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.url, DEFAULT_ENDPOINT);
        assert_eq!(cfg.output, PathBuf::from("./sgv_gauge.png"));
        assert_eq!(cfg.render_config(), RenderPreset::Standard.config());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"url: http://ns.local/api/v1/entries/sgv.json\npreset: epaper\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = PipelineConfig::load(&path).unwrap();
        assert_eq!(cfg.url, "http://ns.local/api/v1/entries/sgv.json");
        assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cfg.render_config().pixel_size(), (400, 300));
    }

    #[test]
    fn render_block_overrides_preset() {
        let mut render = RenderPreset::Standard.config();
        render.title = "BG".into();
        render.bands.high.color = [255, 165, 0];
        let cfg = PipelineConfig {
            render: Some(render.clone()),
            ..PipelineConfig::from_preset(RenderPreset::Epaper)
        };

        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(yaml.as_bytes()).unwrap();
        let loaded = PipelineConfig::load(temp.into_temp_path()).unwrap();
        assert_eq!(loaded.render_config(), render);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"preset: [not, a, preset]\n").unwrap();
        let err = PipelineConfig::load(temp.into_temp_path()).unwrap_err();
        assert!(err.to_string().starts_with("parsing pipeline config"));
    }
}
