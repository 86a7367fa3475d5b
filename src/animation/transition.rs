use std::str::FromStr;

use crate::{
    animation::ease::Ease,
    engine::Engine,
    foundation::{
        core::Vec2,
        error::{JoltError, JoltResult},
    },
    layer::model::Layer,
};

/// Callback fired once when a transition runs to completion.
///
/// It receives the engine, so it may chain another transition on the same layer.
pub type TransitionCallback = Box<dyn FnOnce(&mut Engine) -> anyhow::Result<()>>;

/// Built-in transition archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TransitionKind {
    /// Grow from nothing to full size while fading in.
    #[serde(rename = "expandIn")]
    ExpandIn,
    /// Grow past full size while fading out, then hide the layer.
    #[serde(rename = "shrinkOut")]
    ShrinkOut,
}

impl TransitionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::ExpandIn => "expandIn",
            Self::ShrinkOut => "shrinkOut",
        }
    }

    pub fn from_name(name: &str) -> JoltResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "expandin" | "expand_in" | "expand-in" => Ok(Self::ExpandIn),
            "shrinkout" | "shrink_out" | "shrink-out" => Ok(Self::ShrinkOut),
            other => Err(JoltError::validation(format!(
                "unknown transition kind '{other}'"
            ))),
        }
    }
}

impl FromStr for TransitionKind {
    type Err = JoltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Per-transition overrides.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionOpts {
    /// Duration in milliseconds.
    pub duration: f64,
    pub easing: Ease,
}

impl Default for TransitionOpts {
    fn default() -> Self {
        Self {
            duration: 750.0,
            easing: Ease::OutQuad,
        }
    }
}

impl TransitionOpts {
    pub fn validate(&self) -> JoltResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(JoltError::validation(format!(
                "transition duration must be finite and >= 0, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

/// Outcome of advancing a transition by one tick.
pub(crate) enum Progress {
    Running,
    Completed(Option<TransitionCallback>),
}

/// Eased scale/opacity animation attached to a single layer.
pub struct Transition {
    kind: TransitionKind,
    opts: TransitionOpts,
    start: Option<f64>,
    on_complete: Option<TransitionCallback>,
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("kind", &self.kind)
            .field("opts", &self.opts)
            .field("start", &self.start)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Transition {
    /// Create a transition and put `layer` into the kind's initial state.
    pub(crate) fn begin(
        kind: TransitionKind,
        opts: TransitionOpts,
        on_complete: Option<TransitionCallback>,
        layer: &mut Layer,
    ) -> Self {
        match kind {
            TransitionKind::ExpandIn => {
                layer.scale = Vec2::ZERO;
                layer.visible = true;
            }
            TransitionKind::ShrinkOut => {
                layer.scale = Vec2::new(1.0, 1.0);
            }
        }
        Self {
            kind,
            opts,
            start: None,
            on_complete,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn opts(&self) -> TransitionOpts {
        self.opts
    }

    /// Timestamp of the first update, once latched.
    pub fn start(&self) -> Option<f64> {
        self.start
    }

    /// Drop the completion callback without running it.
    pub(crate) fn into_callback(self) -> Option<TransitionCallback> {
        self.on_complete
    }

    /// Advance to `now`, writing scale/opacity into `layer`.
    ///
    /// On completion the layer is snapped to the terminal state and the callback is handed back
    /// to the caller, which must detach the transition.
    pub(crate) fn update(&mut self, now: f64, layer: &mut Layer) -> Progress {
        let start = *self.start.get_or_insert(now);
        let elapsed = now - start;
        let d = self.opts.duration;

        match self.kind {
            TransitionKind::ExpandIn => {
                let p = self.opts.easing.ease(elapsed, 0.0, 1.0, d);
                layer.scale = Vec2::new(p, p);
                layer.opacity = p;
            }
            TransitionKind::ShrinkOut => {
                let p = self.opts.easing.ease(elapsed, 1.0, 1.0, d);
                layer.scale = Vec2::new(p, p);
                layer.opacity = 2.0 - p;
            }
        }

        if elapsed < d {
            return Progress::Running;
        }

        layer.scale = Vec2::new(1.0, 1.0);
        layer.opacity = 1.0;
        if self.kind == TransitionKind::ShrinkOut {
            layer.visible = false;
        }
        Progress::Completed(self.on_complete.take())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
