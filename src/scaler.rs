use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::renderer::{Frame, Shading};

/// Pixel size of one glyph cell in the window.
pub const CELL_W: usize = 8;
pub const CELL_H: usize = 16;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

#[inline]
fn gray(v: u8) -> u32 {
    pack_rgb(v, v, v)
}

/// Glyph to color mapping derived from the active shading, so custom glyph
/// sets still get a near-bright / far-dark ramp.
pub struct Palette {
    entries: Vec<(char, u32)>,
    fallback: u32,
}

impl Palette {
    pub fn from_shading(shading: &Shading) -> Self {
        const X_RAMP: [u8; 4] = [230, 180, 120, 70];
        const Y_RAMP: [u8; 4] = [170, 130, 90, 55];

        // Floor and sky first so they win over a tier glyph that reuses them.
        let mut entries = vec![
            (shading.floor, pack_rgb(40, 40, 40)),
            (shading.ceiling, pack_rgb(30, 30, 70)),
        ];
        for (&ch, &v) in shading.x_side.iter().zip(&X_RAMP) {
            entries.push((ch, gray(v)));
        }
        for (&ch, &v) in shading.y_side.iter().zip(&Y_RAMP) {
            entries.push((ch, gray(v)));
        }
        Self {
            entries,
            fallback: pack_rgb(200, 200, 120),
        }
    }

    #[inline]
    pub fn color(&self, ch: char) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == ch)
            .map_or(self.fallback, |&(_, rgb)| rgb)
    }

    pub fn frame_colors(&self, frame: &Frame) -> Vec<u32> {
        let mut out = Vec::with_capacity(frame.width() * frame.height());
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                out.push(frame.get(x, y).map_or(self.fallback, |ch| self.color(ch)));
            }
        }
        out
    }
}

/// Precomputed mapping from destination pixels to source cells.
pub struct ScaleLut {
    col: Vec<usize>,
    row: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            col: Vec::new(),
            row: Vec::new(),
        }
    }

    #[inline]
    pub fn dst_size(&self) -> (usize, usize) {
        (self.col.len(), self.row.len())
    }
}

/// Nearest-cell lookup; cells stay crisp blocks.
pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    let col = (0..dst_w)
        .map(|x| (x * src_w / dst_w).min(src_w - 1))
        .collect();
    let row = (0..dst_h)
        .map(|y| (y * src_h / dst_h).min(src_h - 1))
        .collect();
    ScaleLut { col, row }
}

/// Parallel stretch of per-cell colors onto the window buffer.
/// Rows are processed in parallel for cache friendly writes.
pub fn blit_cells(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    if dw == 0 || lut.col.len() != dw {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.row.par_iter())
        .for_each(|(dst_row, &sy)| {
            let base = sy * sw;
            for (px, &sx) in dst_row.iter_mut().zip(&lut.col) {
                *px = src[base + sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_maps_cells_to_blocks() {
        let lut = build_scale_lut(8, 4, 2, 2);
        assert_eq!(lut.col, vec![0, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(lut.row, vec![0, 0, 1, 1]);
        assert_eq!(lut.dst_size(), (8, 4));
    }

    #[test]
    fn blit_fills_every_pixel() {
        let lut = build_scale_lut(4, 2, 2, 1);
        let mut dst = vec![0u32; 8];
        blit_cells(&mut dst, 4, &[1, 2], 2, &lut);
        assert_eq!(dst, vec![1, 1, 2, 2, 1, 1, 2, 2]);
    }

    #[test]
    fn palette_darkens_with_distance() {
        let shading = Shading::default();
        let palette = Palette::from_shading(&shading);
        let near = palette.color('#') & 0xFF;
        let far = palette.color('=') & 0xFF;
        assert!(near > far);
        assert!(palette.color('#') > palette.color('@'));
        assert_eq!(palette.color('.'), pack_rgb(40, 40, 40));
        assert_eq!(palette.color('Z'), pack_rgb(200, 200, 120));
    }
}
