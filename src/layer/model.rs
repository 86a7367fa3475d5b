use crate::{
    animation::transition::Transition,
    foundation::{
        core::{Canvas, Vec2},
        error::JoltResult,
    },
    render::{composite::CompositeParams, surface::Surface},
};

/// Initial state for a new layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerOpts {
    pub scale: Vec2,
    /// Translation applied when compositing.
    pub position: Vec2,
    /// Not clamped here; compositing clamps to `[0, 1]`.
    pub opacity: f64,
    pub visible: bool,
    /// Clear the surface at the start of every tick.
    pub autoclear: bool,
}

impl Default for LayerOpts {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            position: Vec2::ZERO,
            opacity: 1.0,
            visible: true,
            autoclear: false,
        }
    }
}

/// A named drawing target composited onto the base layer.
#[derive(Debug)]
pub struct Layer {
    name: String,
    surface: Surface,
    pub scale: Vec2,
    pub position: Vec2,
    pub opacity: f64,
    pub visible: bool,
    pub autoclear: bool,
    pub(crate) transition: Option<Transition>,
}

impl Layer {
    pub(crate) fn new(name: impl Into<String>, opts: LayerOpts, canvas: Canvas) -> JoltResult<Self> {
        Ok(Self::with_surface(
            name,
            opts,
            Surface::new(canvas.width, canvas.height)?,
        ))
    }

    pub(crate) fn with_surface(name: impl Into<String>, opts: LayerOpts, surface: Surface) -> Self {
        Self {
            name: name.into(),
            surface,
            scale: opts.scale,
            position: opts.position,
            opacity: opts.opacity,
            visible: opts.visible,
            autoclear: opts.autoclear,
            transition: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn has_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Issue drawing commands into this layer's surface.
    pub fn draw<F>(&mut self, f: F) -> JoltResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext),
    {
        self.surface.draw(f)
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub(crate) fn composite_params(&self, area: Canvas) -> CompositeParams {
        CompositeParams {
            scale: self.scale,
            position: self.position,
            opacity: self.opacity,
            area,
        }
    }
}
