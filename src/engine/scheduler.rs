use crate::{
    animation::transition::{Progress, Transition, TransitionCallback, TransitionKind, TransitionOpts},
    engine::{
        callbacks::{FrameCallbacks, FrameHandle},
        config::EngineConfig,
        host::{Host, TickId},
    },
    foundation::{
        core::{Canvas, FrameRGBA},
        error::{JoltError, JoltResult},
    },
    layer::{
        model::{Layer, LayerOpts},
        store::{BASE_LAYER, LayerStore},
    },
    render::{composite::CompositePath, surface::Surface},
};

/// Layer compositing engine driven by a [`Host`]'s tick requests.
///
/// Each tick advances active transitions, clears auto-clearing layers, composites visible layers
/// onto the base layer and then runs the frame callbacks. Everything happens on the caller's
/// thread; a tick runs to completion before the next one is requested.
pub struct Engine {
    host: Box<dyn Host>,
    fullscreen: bool,
    surface_size: Canvas,
    canvas: Canvas,
    running: bool,
    disposed: bool,
    now: f64,
    dt: f64,
    ticks: u64,
    pending: Option<TickId>,
    layers: LayerStore,
    callbacks: FrameCallbacks,
}

impl Engine {
    /// Create an engine with a freshly allocated `config.width x config.height` base surface.
    pub fn new(host: Box<dyn Host>, config: EngineConfig) -> JoltResult<Self> {
        let surface = Surface::new(config.width, config.height)?;
        Self::with_surface(surface, host, config)
    }

    /// Create an engine drawing onto an existing surface. Its size is the fixed surface size.
    pub fn with_surface(
        surface: Surface,
        host: Box<dyn Host>,
        config: EngineConfig,
    ) -> JoltResult<Self> {
        config.validate()?;
        let surface_size = surface.canvas();
        let mut layers = LayerStore::new();
        layers.insert(Layer::with_surface(BASE_LAYER, config.base, surface));

        let mut engine = Self {
            host,
            fullscreen: config.fullscreen,
            surface_size,
            canvas: surface_size,
            running: false,
            disposed: false,
            now: 0.0,
            dt: 0.0,
            ticks: 0,
            pending: None,
            layers,
            callbacks: FrameCallbacks::default(),
        };
        engine.resize(None)?;
        tracing::debug!(
            width = engine.canvas.width,
            height = engine.canvas.height,
            fullscreen = engine.fullscreen,
            "engine created"
        );

        if config.autostart {
            engine.start()?;
        }
        Ok(engine)
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Timestamp of the last tick, in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Milliseconds between the last two ticks.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// The tick this engine is waiting for, if any.
    pub fn pending_tick(&self) -> Option<TickId> {
        self.pending
    }

    pub fn base_name(&self) -> &'static str {
        BASE_LAYER
    }

    // -- frame scheduler --

    /// Reset the time baseline and run the first tick immediately.
    pub fn start(&mut self) -> JoltResult<()> {
        self.ensure_live()?;
        self.now = self.host.now_ms();
        self.running = true;
        tracing::debug!(now = self.now, "engine started");
        self.frame()
    }

    /// Stop scheduling ticks. Layers and callbacks are kept.
    pub fn stop(&mut self) {
        self.running = false;
        self.cancel_pending();
        tracing::debug!("engine stopped");
    }

    /// The tick routine. Call it when the host delivers the pending tick.
    ///
    /// An error from a user callback aborts the rest of this tick; the next tick is still
    /// requested if the engine is running.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn frame(&mut self) -> JoltResult<()> {
        self.cancel_pending();
        if !self.running || self.disposed {
            return Ok(());
        }

        let clock = self.host.now_ms();
        self.dt = clock - self.now;
        self.now = clock;
        self.ticks += 1;
        tracing::trace!(now = self.now, dt = self.dt, tick = self.ticks, "tick");

        let result = self
            .update_layers()
            .and_then(|()| self.run_frame_callbacks());

        if self.running && !self.disposed {
            // A callback may have restarted the engine, which already armed a tick.
            self.cancel_pending();
            self.pending = Some(self.host.request_tick());
        }
        result
    }

    /// Keep waiting for and running ticks while one is pending and `keep_going` agrees.
    ///
    /// Tick errors are logged and the loop carries on with the next tick. Returns the number of
    /// ticks run.
    pub fn run_while<F>(&mut self, mut keep_going: F) -> u64
    where
        F: FnMut(&Engine) -> bool,
    {
        let mut ran = 0;
        while let Some(id) = self.pending {
            if !keep_going(self) {
                break;
            }
            self.host.wait(id);
            if let Err(err) = self.frame() {
                tracing::warn!(error = %err, tick = self.ticks, "frame failed");
            }
            ran += 1;
        }
        ran
    }

    pub fn on_frame<F>(&mut self, callback: F) -> FrameHandle
    where
        F: FnMut(&mut Engine) -> anyhow::Result<()> + 'static,
    {
        self.callbacks.push(Box::new(callback))
    }

    /// Unregister a frame callback; returns whether it was registered.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.callbacks.cancel(handle)
    }

    pub fn frame_callback_count(&self) -> usize {
        self.callbacks.len()
    }

    fn update_layers(&mut self) -> JoltResult<()> {
        for name in self.layers.names() {
            if self.disposed {
                break;
            }
            // A callback earlier in this tick may have destroyed it.
            let Ok(layer) = self.layers.get_mut(&name) else {
                continue;
            };

            if let Some(mut transition) = layer.transition.take() {
                match transition.update(self.now, layer) {
                    Progress::Running => layer.transition = Some(transition),
                    Progress::Completed(callback) => {
                        tracing::debug!(layer = %name, kind = ?transition.kind(), "transition complete");
                        if let Some(callback) = callback {
                            callback(self)?;
                        }
                    }
                }
            }

            let canvas = self.canvas;
            let Ok(layer) = self.layers.get_mut(&name) else {
                continue;
            };
            if layer.autoclear {
                layer.clear();
            }
            if name != BASE_LAYER && layer.visible {
                self.layers.composite(&name, BASE_LAYER, canvas)?;
            }
        }
        Ok(())
    }

    fn run_frame_callbacks(&mut self) -> JoltResult<()> {
        let mut batch = self.callbacks.take();
        let mut result = Ok(());
        for (handle, callback) in batch.iter_mut() {
            if self.disposed {
                break;
            }
            if let Err(err) = callback(self) {
                tracing::debug!(handle = handle.0, error = %err, "frame callback failed");
                result = Err(JoltError::Other(err));
                break;
            }
        }
        self.callbacks.restore(batch);
        result
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.host.cancel_tick(id);
        }
    }

    // -- layers --

    /// Create (or replace) a layer sized to the engine.
    pub fn create_layer(&mut self, name: &str, opts: LayerOpts) -> JoltResult<&mut Layer> {
        self.ensure_live()?;
        let layer = Layer::new(name, opts, self.canvas)?;
        if self.layers.contains(name) {
            tracing::debug!(layer = name, "replacing layer");
        } else {
            tracing::debug!(layer = name, "layer created");
        }
        Ok(self.layers.insert(layer))
    }

    pub fn layer(&self, name: &str) -> JoltResult<&Layer> {
        self.layers.get(name)
    }

    pub fn layer_mut(&mut self, name: &str) -> JoltResult<&mut Layer> {
        self.layers.get_mut(name)
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.layers.names()
    }

    pub fn base_surface(&self) -> JoltResult<&Surface> {
        Ok(self.layers.get(BASE_LAYER)?.surface())
    }

    /// Copy of the base layer's pixels.
    pub fn snapshot(&self) -> JoltResult<FrameRGBA> {
        Ok(self.base_surface()?.to_frame())
    }

    /// Draw into a layer (the base layer when `name` is `None`).
    ///
    /// While stopped no tick will composite the layer, so it is composited onto the base layer
    /// right away.
    pub fn draw_onto<F>(&mut self, name: Option<&str>, f: F) -> JoltResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext),
    {
        self.ensure_live()?;
        let name = name.unwrap_or(BASE_LAYER);
        self.layers.get_mut(name)?.draw(f)?;
        if !self.running && name != BASE_LAYER {
            self.load(name)?;
        }
        Ok(())
    }

    /// Clear a layer (the base layer when `name` is `None`) to transparent.
    pub fn clear(&mut self, name: Option<&str>) -> JoltResult<()> {
        self.ensure_live()?;
        self.layers.get_mut(name.unwrap_or(BASE_LAYER))?.clear();
        Ok(())
    }

    /// Composite layer `src` onto layer `dst` using `src`'s scale, position and opacity.
    pub fn composite(&mut self, src: &str, dst: &str) -> JoltResult<CompositePath> {
        self.ensure_live()?;
        self.layers.composite(src, dst, self.canvas)
    }

    /// Composite the base layer onto `name`.
    pub fn save(&mut self, name: &str) -> JoltResult<CompositePath> {
        self.composite(BASE_LAYER, name)
    }

    /// Composite `name` onto the base layer.
    pub fn load(&mut self, name: &str) -> JoltResult<CompositePath> {
        self.composite(name, BASE_LAYER)
    }

    /// Recompute the engine size and reallocate one layer's surface, or all of them.
    ///
    /// Affected surfaces lose their content.
    pub fn resize(&mut self, name: Option<&str>) -> JoltResult<()> {
        self.ensure_live()?;
        self.canvas = if self.fullscreen {
            self.host.viewport()
        } else {
            self.surface_size
        };
        self.layers.resize(name, self.canvas)?;
        tracing::debug!(
            layer = name.unwrap_or("*"),
            width = self.canvas.width,
            height = self.canvas.height,
            "resized"
        );
        Ok(())
    }

    /// Change the fixed surface size and resize every layer.
    pub fn set_surface_size(&mut self, width: u32, height: u32) -> JoltResult<()> {
        self.surface_size = Canvas::new(width, height);
        self.resize(None)
    }

    /// Remove one layer, or tear down every layer and callback when `name` is `None`.
    ///
    /// Tearing everything down leaves the engine unusable.
    pub fn destroy_layer(&mut self, name: Option<&str>) -> JoltResult<()> {
        match name {
            Some(name) => {
                self.ensure_live()?;
                self.layers.remove(name)?;
                tracing::debug!(layer = name, "layer destroyed");
            }
            None => {
                self.teardown();
                tracing::debug!("all layers destroyed");
            }
        }
        Ok(())
    }

    /// Cancel the pending tick and release all layers and callbacks. Terminal.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        if !self.disposed {
            self.teardown();
            tracing::debug!("engine disposed");
        }
    }

    fn teardown(&mut self) {
        self.cancel_pending();
        self.layers.clear();
        self.callbacks.clear();
        self.running = false;
        self.disposed = true;
    }

    // -- transitions --

    /// Start a transition on `name`, discarding any transition already running there.
    ///
    /// A discarded transition's completion callback never runs.
    pub fn start_transition(
        &mut self,
        name: &str,
        kind: TransitionKind,
        opts: TransitionOpts,
        on_complete: Option<TransitionCallback>,
    ) -> JoltResult<()> {
        self.ensure_live()?;
        opts.validate()?;
        let layer = self.layers.get_mut(name)?;
        let transition = Transition::begin(kind, opts, on_complete, layer);
        if let Some(previous) = layer.transition.replace(transition) {
            tracing::debug!(layer = name, kind = ?previous.kind(), "transition superseded");
        }
        tracing::debug!(layer = name, kind = kind.name(), duration = opts.duration, easing = %opts.easing, "transition started");
        Ok(())
    }

    /// Detach the running transition from `name` without firing its completion callback, then
    /// run `callback`. Returns `false` (and skips `callback`) when nothing was running.
    pub fn end_transition(
        &mut self,
        name: &str,
        callback: Option<TransitionCallback>,
    ) -> JoltResult<bool> {
        self.ensure_live()?;
        let Some(transition) = self.layers.get_mut(name)?.transition.take() else {
            return Ok(false);
        };
        drop(transition.into_callback());
        tracing::debug!(layer = name, "transition ended");
        if let Some(callback) = callback {
            callback(self)?;
        }
        Ok(true)
    }

    fn ensure_live(&self) -> JoltResult<()> {
        if self.disposed {
            return Err(JoltError::Disposed);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;
