use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed nearest source column/row for every destination pixel.
#[derive(Debug, Default)]
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }
}

/// Map a `dst_w x dst_h` window onto the `src_w x src_h` render target.
/// With `flip_y` the first source row lands on the bottom of the window.
pub fn build_scale_lut(
    dst_w: usize,
    dst_h: usize,
    src_w: usize,
    src_h: usize,
    flip_y: bool,
) -> ScaleLut {
    let nearest = |d: usize, dst: usize, src: usize| {
        // sample at pixel centres
        let s = ((d as f32 + 0.5) * src as f32 / dst as f32) as usize;
        s.min(src.saturating_sub(1))
    };

    let src_x = (0..dst_w).map(|x| nearest(x, dst_w, src_w)).collect();
    let src_y = (0..dst_h)
        .map(|y| {
            let sy = nearest(y, dst_h, src_h);
            if flip_y { src_h - 1 - sy } else { sy }
        })
        .collect();

    ScaleLut { src_x, src_y }
}

/// Parallel nearest-neighbour stretch, one destination row per task.
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let row = &src[lut.src_y[y] * sw..][..sw];
        for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
            *px = row[sx];
        }
    });
}
