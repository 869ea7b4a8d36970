use std::{fs::File, io::BufReader, path::Path};

use crate::{
    engine::canvas_engine::EngineOpts,
    foundation::error::{CanvasFxError, CanvasFxResult},
    hover::manager::HoverPlayOpts,
    render::pool::PixmapPoolOpts,
};

/// Startup configuration for a gallery: engine, hover admission and pixmap pool options.
///
/// Every section and field is optional in JSON; missing values take their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Options for every engine the gallery constructs.
    pub engine: EngineOpts,
    /// Hover preview admission.
    pub hover: HoverPlayOpts,
    /// Pixmap reuse.
    pub pool: PixmapPoolOpts,
}

impl GalleryConfig {
    /// Parse and validate a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CanvasFxResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CanvasFxError::serde(format!("parse gallery config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> CanvasFxResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CanvasFxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CanvasFxError::validation(format!("open gallery config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> CanvasFxResult<()> {
        if !self.engine.fps_window_ms.is_finite() || self.engine.fps_window_ms <= 0.0 {
            return Err(CanvasFxError::validation(
                "engine.fps_window_ms must be finite and > 0",
            ));
        }
        if self.hover.max_concurrent == 0 {
            return Err(CanvasFxError::validation("hover.max_concurrent must be >= 1"));
        }
        if self.pool.max_idle_per_size > self.pool.max_idle {
            return Err(CanvasFxError::validation(
                "pool.max_idle_per_size must not exceed pool.max_idle",
            ));
        }
        if let Some(device) = &self.engine.device
            && device.device_memory_gb.is_some_and(|gb| !gb.is_finite() || gb < 0.0)
        {
            return Err(CanvasFxError::validation(
                "engine.device.device_memory_gb must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
