use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use log::info;
use serde::Deserialize;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
const DEFAULT_QUEUE_CAPACITY: usize = 2048;

#[derive(Deserialize, Debug, Clone)]
pub struct LoaderSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiSettings {
    pub target_port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SourceSettings {
    /// Base for sources given as relative paths. Absolute sources ignore it.
    pub base_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings"))
                .add_source(File::with_name("settings.local").required(false))
                .add_source(Environment::with_prefix("batch_loader").separator("__")),
        )?;

        info!("Loaded settings. {:#?}", settings);

        Ok(settings)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
