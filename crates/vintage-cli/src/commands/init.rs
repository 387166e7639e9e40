use std::path::PathBuf;

use vintage_core::config::{user_config_dir, VintageConfig};

/// Write the default configuration file.
///
/// Defaults to `~/vintage/vintage.yml`. An existing file is left alone unless
/// `force` is true.
pub fn cmd_init(path: Option<PathBuf>, force: bool) -> Result<(), String> {
    let target = match path {
        Some(path) => path,
        None => user_config_dir()
            .ok_or("Could not determine home directory")?
            .join("vintage.yml"),
    };

    if target.exists() && !force {
        println!(
            "Skipped: {} (already exists, use --force to overwrite)",
            target.display()
        );
        return Ok(());
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }

    let contents = VintageConfig::default_yaml().map_err(|e| e.to_string())?;
    std::fs::write(&target, contents)
        .map_err(|e| format!("Failed to write {}: {}", target.display(), e))?;

    println!("Wrote default configuration: {}", target.display());
    Ok(())
}
