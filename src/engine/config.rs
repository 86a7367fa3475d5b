use crate::{
    foundation::error::{JoltError, JoltResult},
    layer::model::LayerOpts,
};

/// Engine construction options.
///
/// Deserializes from JSON with every field optional; base layer options sit at the top level
/// next to the engine options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size from the host viewport instead of the fixed surface size.
    pub fullscreen: bool,
    /// Start the frame loop from the constructor.
    pub autostart: bool,
    /// Fixed surface width, used when no surface is supplied.
    pub width: u32,
    /// Fixed surface height, used when no surface is supplied.
    pub height: u32,
    #[serde(flatten)]
    pub base: LayerOpts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            autostart: true,
            // Default size of an unsized 2D canvas.
            width: 300,
            height: 150,
            base: LayerOpts::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> JoltResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| JoltError::validation(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> JoltResult<()> {
        let b = &self.base;
        let finite = [b.scale.x, b.scale.y, b.position.x, b.position.y, b.opacity]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(JoltError::validation(
                "base layer scale, position and opacity must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
