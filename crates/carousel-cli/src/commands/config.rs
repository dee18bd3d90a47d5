use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use carousel_core::AppConfig;

pub fn run(config: &AppConfig, path: bool, defaults: bool, init: bool) -> Result<()> {
    if path {
        println!("{}", AppConfig::config_path().display());
        return Ok(());
    }
    if init {
        let config_path = AppConfig::config_path();
        write_defaults(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let content = if defaults {
        AppConfig::default().to_toml()?
    } else {
        config.to_toml()?
    };
    print!("{}", content);
    Ok(())
}

/// Write the default configuration to `path` unless a file is already there
fn write_defaults(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    AppConfig::default().save_to(path)?;
    info!(path = %path.display(), "default configuration written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_defaults_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("carousel-init-{}", std::process::id()));
        let path = dir.join("config.toml");

        write_defaults(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.carousel, AppConfig::default().carousel);

        assert!(write_defaults(&path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
