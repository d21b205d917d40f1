use crate::error::CoreError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment prefix for overrides, e.g. `APP_API__BASE_URL`.
pub const ENV_PREFIX: &str = "APP";

/// Resolve `<component>/config` relative to the working directory.
///
/// Works both from the workspace root and from inside the component's own
/// directory (as `cargo test` runs there).
pub fn configuration_directory(base_path: &Path, component: &str) -> PathBuf {
    if base_path.ends_with(component) {
        base_path.join("config")
    } else {
        base_path.join(component).join("config")
    }
}

/// Load layered settings for a component.
///
/// Sources, lowest precedence first: `config/base.yaml` (optional), then
/// `APP_`-prefixed environment variables using `__` as the nesting separator.
/// A `.env` file is honoured if present.
pub fn load_configuration<T: DeserializeOwned>(component: &str) -> Result<T, CoreError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir()?;
    let configuration_directory = configuration_directory(&base_path, component);

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
