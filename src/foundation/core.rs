use crate::foundation::error::{JoltError, JoltResult};

pub use kurbo::{Affine, Vec2};

/// Pixel dimensions of a drawing surface or host viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions as the `u16` pair the rasterizer works with.
    pub fn to_u16(self) -> JoltResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| JoltError::surface(format!("surface width exceeds u16: {}", self.width)))?;
        let h: u16 = self.height.try_into().map_err(|_| {
            JoltError::surface(format!("surface height exceeds u16: {}", self.height))
        })?;
        Ok((w, h))
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half extents used to anchor scale-about-center compositing.
    pub fn half(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// A copy of a surface's pixels as RGBA8.
///
/// Surfaces store **premultiplied alpha**; the `premultiplied` flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight (non-premultiplied) alpha, e.g. before PNG encoding.
    pub fn into_straight(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
