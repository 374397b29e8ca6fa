mod pricing;

pub use pricing::{PricingConfig, RushHourWindow};

use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File};
use dfc_error::Error;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
pub struct Log {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log: Log,
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl Settings {
    /// Loads settings from the workspace `config/` directory and `APP_*`
    /// environment variables. `DFC_CONFIG_ROOT` overrides the directory that
    /// holds `config/`.
    pub fn new() -> dfc_error::Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let root = match env::var("DFC_CONFIG_ROOT") {
            Ok(root) => Utf8PathBuf::from(root),
            Err(_) => {
                let cargo_manifest_dir = env::var("CARGO_MANIFEST_DIR")
                    .map_err(|e| Error::Config(e.to_string()))?;
                let mut path = Utf8PathBuf::from(cargo_manifest_dir);
                path.pop();
                path.pop();
                path.pop();
                path
            }
        };

        Self::load(&root, &run_mode, Self::environment())
    }

    /// `APP_PRICING__MAX_FEE=2000` sets `pricing.max_fee`.
    pub fn environment() -> Environment {
        Environment::with_prefix("app")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn load(
        root: &Utf8Path,
        run_mode: &str,
        environment: Environment,
    ) -> dfc_error::Result<Self> {
        let s = Config::builder()
            .add_source(File::with_name(root.join("config/default").as_str()))
            .add_source(
                File::with_name(root.join(format!("config/{}", run_mode)).as_str())
                    .required(false),
            )
            .add_source(File::with_name(root.join("config/local").as_str()).required(false))
            .add_source(environment)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let settings: Self = s
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings.pricing.validate()?;
        Ok(settings)
    }
}
