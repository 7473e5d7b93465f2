//! Loading effect data from disk

use anyhow::{Context, Result};
use pko_effect::{EffectFile, PathPoints};
use std::fs;
use std::path::Path;

/// Load an effect from its JSON description
pub fn load_effect(path: &Path) -> Result<EffectFile> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read effect file {}", path.display()))?;
    let effect = EffectFile::from_json(&json)
        .with_context(|| format!("Failed to parse effect file {}", path.display()))?;
    log::info!(
        "Loaded effect '{}' with {} sub-effects",
        effect.name,
        effect.sub_effects.len()
    );
    Ok(effect)
}

/// Load path points from a JSON array of `[x, y, z]` triples
pub fn load_path(path: &Path) -> Result<PathPoints> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read path file {}", path.display()))?;
    let points: PathPoints = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse path file {}", path.display()))?;
    log::info!("Loaded path with {} points", points.len());
    Ok(points)
}
