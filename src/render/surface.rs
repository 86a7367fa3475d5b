use std::sync::Arc;

use crate::{
    foundation::{
        core::{Canvas, FrameRGBA},
        error::{JoltError, JoltResult},
    },
    render::composite::over_in_place,
};

/// An owned premultiplied RGBA8 pixel buffer with immediate-mode drawing.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.canvas.width)
            .field("height", &self.canvas.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> JoltResult<Self> {
        let canvas = Canvas::new(width, height);
        let (w, h) = canvas.to_u16()?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> JoltResult<Self> {
        let canvas = Canvas::new(width, height);
        let (w, h) = canvas.to_u16()?;
        if bytes.len() != canvas.byte_len() {
            return Err(JoltError::surface("surface byte len mismatch"));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            })
            .collect::<Vec<_>>();
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Premultiplied pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Clear every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Reallocate at `canvas`. Prior content is discarded, even when the size is unchanged.
    pub fn resize(&mut self, canvas: Canvas) -> JoltResult<()> {
        let (w, h) = canvas.to_u16()?;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.canvas = canvas;
        Ok(())
    }

    /// Issue drawing commands against this surface.
    ///
    /// `vello_cpu` renders into a fresh buffer, so commands are rasterized into a scratch pixmap
    /// and then composited source-over, accumulating on top of existing content.
    pub fn draw<F>(&mut self, f: F) -> JoltResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext),
    {
        if self.canvas.is_empty() {
            return Ok(());
        }
        let (w, h) = self.canvas.to_u16()?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        f(&mut ctx);
        ctx.flush();

        let mut scratch = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut scratch);
        over_in_place(self.data_mut(), scratch.data_as_u8_slice(), 1.0)
    }

    /// Copy out the pixels.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    /// Snapshot the pixels as an image paint.
    pub(crate) fn to_image(&self) -> JoltResult<vello_cpu::Image> {
        let copy = Surface::from_premul_bytes(self.data(), self.width(), self.height())?;
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(copy.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
