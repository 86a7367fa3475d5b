//! Jolt is a small real-time compositing and animation engine.
//!
//! An [`Engine`] owns a base surface and any number of named [`Layer`]s. Once per host tick it
//! advances each layer's eased transition, composites the visible layers onto the base layer
//! and then runs the registered frame callbacks.
//!
//! # Pieces
//!
//! - [`Ease`]: the Penner easing curves, addressable by name.
//! - Transitions: `expandIn` and `shrinkOut`, started with [`Engine::start_transition`].
//! - [`LayerStore`]: named layers in creation order, composited through [`vello_cpu`].
//! - [`Host`]: clock, viewport and tick requests. [`ManualHost`] steps time deterministically,
//!   [`IntervalHost`] uses the wall clock.
//!
//! Surfaces hold premultiplied RGBA8 pixels end-to-end.
#![forbid(unsafe_code)]

pub mod animation;
pub mod engine;
pub mod foundation;
pub mod layer;
pub mod render;

pub use crate::animation::ease::Ease;
pub use crate::animation::transition::{
    Transition, TransitionCallback, TransitionKind, TransitionOpts,
};
pub use crate::engine::Engine;
pub use crate::engine::callbacks::{FrameCallback, FrameHandle};
pub use crate::engine::config::EngineConfig;
pub use crate::engine::host::{
    Host, IntervalHost, MIN_TICK_INTERVAL_MS, ManualClock, ManualHost, TickId,
};
pub use crate::foundation::core::{Affine, Canvas, FrameRGBA, Vec2};
pub use crate::foundation::error::{JoltError, JoltResult};
pub use crate::layer::model::{Layer, LayerOpts};
pub use crate::layer::store::{BASE_LAYER, LayerStore};
pub use crate::render::composite::{CompositeParams, CompositePath};
pub use crate::render::surface::Surface;

pub use vello_cpu;
