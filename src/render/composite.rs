use crate::{
    foundation::{
        core::{Affine, Canvas, Vec2},
        error::{JoltError, JoltResult},
    },
    render::surface::Surface,
};

pub type PremulRgba8 = [u8; 4];

/// Scales below this magnitude collapse the layer to nothing.
const MIN_SCALE: f64 = 1e-9;

/// Premultiplied source-over of one pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> JoltResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(JoltError::surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over `src` onto `dst` with its top-left corner at `(dx, dy)`, clipped to `dst`.
///
/// The surfaces may differ in size.
pub fn over_at(dst: &mut Surface, src: &Surface, dx: i64, dy: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    // Offsets beyond these bounds draw nothing; clamping keeps the clip math in range.
    let dx = dx.clamp(-sw, dw);
    let dy = dy.clamp(-sh, dh);

    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = (dx + sw).min(dw);
    let y1 = (dy + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_bytes = src.data();
    let dst_bytes = dst.data_mut();
    for y in y0..y1 {
        let sy = y - dy;
        for x in x0..x1 {
            let sx = x - dx;
            let si = ((sy * sw + sx) * 4) as usize;
            let di = ((y * dw + x) * 4) as usize;
            let s = &src_bytes[si..si + 4];
            let d = &mut dst_bytes[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
    }
}

/// How a layer is placed onto its destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeParams {
    pub scale: Vec2,
    pub position: Vec2,
    pub opacity: f64,
    /// Engine dimensions; the source is stretched to this area and scaled about its center.
    pub area: Canvas,
}

/// Which code path a composite took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositePath {
    /// Identity scale: straight pixel copy, opacity ignored.
    Direct,
    /// Scale-about-center with opacity.
    Scaled,
    /// Nothing visible to draw (collapsed scale, zero opacity or empty surfaces).
    Skipped,
}

/// Composite `src` onto `dst`.
pub fn composite(
    src: &Surface,
    params: &CompositeParams,
    dst: &mut Surface,
) -> JoltResult<CompositePath> {
    if src.canvas().is_empty() || dst.canvas().is_empty() {
        return Ok(CompositePath::Skipped);
    }

    if params.scale == Vec2::new(1.0, 1.0) {
        over_at(
            dst,
            src,
            params.position.x.round() as i64,
            params.position.y.round() as i64,
        );
        return Ok(CompositePath::Direct);
    }

    let opacity = params.opacity.clamp(0.0, 1.0);
    if params.scale.x.abs() < MIN_SCALE || params.scale.y.abs() < MIN_SCALE || opacity <= 0.0 {
        return Ok(CompositePath::Skipped);
    }

    let transform = scaled_transform(params, src.canvas());
    let (w, h) = dst.canvas().to_u16()?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(src.to_image()?);
    let faded = opacity < 1.0;
    if faded {
        ctx.push_opacity_layer(opacity as f32);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(src.width()),
        f64::from(src.height()),
    ));
    if faded {
        ctx.pop_layer();
    }
    ctx.flush();

    let mut scratch = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut scratch);
    over_in_place(dst.data_mut(), scratch.data_as_u8_slice(), 1.0)?;
    Ok(CompositePath::Scaled)
}

/// `T(position) * T(half) * S(scale) * T(-half) * S(area / src)`.
pub fn scaled_transform(params: &CompositeParams, src: Canvas) -> Affine {
    let half = params.area.half();
    let stretch = Affine::scale_non_uniform(
        f64::from(params.area.width) / f64::from(src.width.max(1)),
        f64::from(params.area.height) / f64::from(src.height.max(1)),
    );
    Affine::translate(params.position)
        * Affine::translate(half)
        * Affine::scale_non_uniform(params.scale.x, params.scale.y)
        * Affine::translate(-half)
        * stretch
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
