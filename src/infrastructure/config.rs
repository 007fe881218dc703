use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::Result;
use config::{ConfigError, FileFormat};
use serde::Deserialize;

use crate::core::{route::RouteTable, router::RouterOptions};

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "default_section_settle_ms")]
    pub section_settle_ms: u64,
    #[serde(default = "default_header_offset_px")]
    pub header_offset_px: f64,
    /// Frame pacing of the native scheduler
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_fade_out_ms() -> u64 {
    400
}

fn default_section_settle_ms() -> u64 {
    50
}

fn default_header_offset_px() -> f64 {
    100.0
}

fn default_frame_ms() -> u64 {
    16
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            section_settle_ms: default_section_settle_ms(),
            header_offset_px: default_header_offset_px(),
            frame_ms: default_frame_ms(),
        }
    }
}

/// Document description for the headless replay page
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct PageConfig {
    #[serde(default)]
    pub reduced_motion: bool,
    /// Anchor id to document offset
    #[serde(default)]
    pub sections: BTreeMap<String, f64>,
    /// Views that contain a heading
    #[serde(default)]
    pub headings: Vec<String>,
    /// View id to raw image-list attribute values
    #[serde(default)]
    pub images: BTreeMap<String, Vec<String>>,
    /// Registered global hook functions
    #[serde(default)]
    pub hooks: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    #[serde(default)]
    pub gallery_route: Option<String>,
    #[serde(default)]
    pub gallery_hook: Option<String>,
    #[serde(default)]
    pub link_marker: String,
    #[serde(default)]
    pub images_attribute: String,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub page: PageConfig,
}

impl Config {
    /// Defaults layered under user configuration files from the config dir
    pub fn new() -> Result<Self, ConfigError> {
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = Self::defaults()
            .set_default("_data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("_config_dir", config_dir.to_string_lossy().into_owned())?;

        let config_files = [
            ("config.json5", FileFormat::Json5),
            ("config.json", FileFormat::Json),
            ("config.yaml", FileFormat::Yaml),
            ("config.toml", FileFormat::Toml),
            ("config.ini", FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            if path.exists() {
                log::info!("loading configuration from {}", path.display());
            }
            builder = builder.add_source(config::File::from(path).format(*format).required(false));
        }

        builder.build()?.try_deserialize()
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::defaults().build()?.try_deserialize()
    }

    /// Embedded defaults overlaid with a JSON5 document
    pub fn from_json5(overrides: &str) -> Result<Self, ConfigError> {
        Self::defaults()
            .add_source(config::File::from_str(overrides, FileFormat::Json5))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(CONFIG, FileFormat::Json5))
    }

    pub fn route_table(&self) -> Result<RouteTable> {
        RouteTable::new(
            self.routes
                .iter()
                .map(|(key, view)| (key.as_str(), view.as_str())),
            self.gallery_route.as_deref(),
        )
    }

    pub fn router_options(&self) -> RouterOptions {
        let defaults = RouterOptions::default();
        RouterOptions {
            fade_out: Duration::from_millis(self.timing.fade_out_ms),
            section_settle: Duration::from_millis(self.timing.section_settle_ms),
            header_offset: self.timing.header_offset_px,
            gallery_hook: self.gallery_hook.clone().filter(|hook| !hook.is_empty()),
            images_attribute: if self.images_attribute.is_empty() {
                defaults.images_attribute
            } else {
                self.images_attribute.clone()
            },
        }
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.timing.frame_ms)
    }
}
