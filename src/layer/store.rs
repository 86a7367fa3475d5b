use std::collections::HashMap;

use crate::{
    foundation::{
        core::Canvas,
        error::{JoltError, JoltResult},
    },
    layer::model::Layer,
    render::{
        composite::{CompositePath, composite},
        surface::Surface,
    },
};

/// Name of the layer that receives every composite.
pub const BASE_LAYER: &str = "default";

/// Named layers in creation order. The base layer is inserted first.
#[derive(Debug, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
    // Rebuilt on removal; lookups are per operation, not per pixel.
    index: HashMap<String, usize>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Register `layer`, replacing any layer of the same name in place.
    pub fn insert(&mut self, layer: Layer) -> &mut Layer {
        let i = match self.index.get(layer.name()).copied() {
            Some(i) => {
                self.layers[i] = layer;
                i
            }
            None => {
                let i = self.layers.len();
                self.index.insert(layer.name().to_string(), i);
                self.layers.push(layer);
                i
            }
        };
        &mut self.layers[i]
    }

    pub fn get(&self, name: &str) -> JoltResult<&Layer> {
        let i = self.position(name)?;
        Ok(&self.layers[i])
    }

    pub fn get_mut(&mut self, name: &str) -> JoltResult<&mut Layer> {
        let i = self.position(name)?;
        Ok(&mut self.layers[i])
    }

    pub fn names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn remove(&mut self, name: &str) -> JoltResult<Layer> {
        let i = self.position(name)?;
        let layer = self.layers.remove(i);
        self.reindex();
        Ok(layer)
    }

    /// Drop every layer, the base layer included.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.index.clear();
    }

    /// Reallocate one layer's surface, or every surface when `name` is `None`.
    pub fn resize(&mut self, name: Option<&str>, canvas: Canvas) -> JoltResult<()> {
        match name {
            Some(name) => self.get_mut(name)?.surface_mut().resize(canvas),
            None => {
                for layer in &mut self.layers {
                    layer.surface_mut().resize(canvas)?;
                }
                Ok(())
            }
        }
    }

    /// Composite layer `src` onto layer `dst` using `src`'s scale, position and opacity.
    pub fn composite(&mut self, src: &str, dst: &str, area: Canvas) -> JoltResult<CompositePath> {
        let si = self.position(src)?;
        let di = self.position(dst)?;
        let params = self.layers[si].composite_params(area);

        if si == di {
            let layer = &mut self.layers[si];
            let copy = Surface::from_premul_bytes(
                layer.surface().data(),
                layer.surface().width(),
                layer.surface().height(),
            )?;
            return composite(&copy, &params, layer.surface_mut());
        }

        let (src_layer, dst_layer) = if si < di {
            let (a, b) = self.layers.split_at_mut(di);
            (&a[si], &mut b[0])
        } else {
            let (a, b) = self.layers.split_at_mut(si);
            (&b[0], &mut a[di])
        };
        composite(src_layer.surface(), &params, dst_layer.surface_mut())
    }

    fn position(&self, name: &str) -> JoltResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| JoltError::layer_not_found(name))
    }

    fn reindex(&mut self) {
        self.index = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name().to_string(), i))
            .collect();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/store.rs"]
mod tests;
