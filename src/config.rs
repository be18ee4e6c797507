use std::{path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    composite::OnionPlacement,
    export::ExportConfig,
    foundation::{
        core::Canvas,
        error::{FlipbookError, FlipbookResult},
    },
    paint::{DEFAULT_BRUSH_SIZE, MIN_BRUSH_SIZE, ToolState},
};

/// Startup settings for a drawing session.
///
/// Every field has a default, so a config file only needs the keys it
/// changes (`{"canvas": {"width": 320, "height": 240}}`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatorConfig {
    pub canvas: Canvas,
    pub initial_brush_size: u32,
    pub onion_skin: bool,
    pub onion_placement: OnionPlacement,
    pub frame_delay_ms: u64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            initial_brush_size: DEFAULT_BRUSH_SIZE,
            onion_skin: true,
            onion_placement: OnionPlacement::default(),
            frame_delay_ms: 100,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> FlipbookResult<()> {
        self.canvas.validate()?;
        if self.initial_brush_size < MIN_BRUSH_SIZE {
            return Err(FlipbookError::validation(format!(
                "initial brush size must be >= {MIN_BRUSH_SIZE}"
            )));
        }
        self.export_config().validate()
    }

    pub fn from_json(s: &str) -> FlipbookResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| FlipbookError::validation(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> FlipbookResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&s)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            frame_delay: self.frame_delay(),
            ..ExportConfig::default()
        }
    }

    pub fn tool_state(&self) -> ToolState {
        ToolState {
            brush_size: self.initial_brush_size,
            onion_skin: self.onion_skin,
            onion_placement: self.onion_placement,
            ..ToolState::default()
        }
    }
}
