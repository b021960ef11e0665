/// Dense time series `q[eqn, step, i, j]`, stored row-major in one buffer.
///
/// Filled once by the loader, read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSeries {
    meqn: usize,
    frames: usize,
    mx: usize,
    my: usize,
    data: Vec<f64>,
}

impl StateSeries {
    /// Zeroed series with `frames` snapshots of an `mx x my` grid.
    pub fn zeros(meqn: usize, frames: usize, mx: usize, my: usize) -> Self {
        Self {
            meqn,
            frames,
            mx,
            my,
            data: vec![0.0; meqn * frames * mx * my],
        }
    }

    /// `(meqn, frames, mx, my)`.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.meqn, self.frames, self.mx, self.my)
    }

    pub fn meqn(&self) -> usize {
        self.meqn
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    fn offset(&self, eqn: usize, step: usize) -> usize {
        debug_assert!(eqn < self.meqn && step < self.frames);
        (eqn * self.frames + step) * self.mx * self.my
    }

    #[inline]
    pub fn get(&self, eqn: usize, step: usize, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.mx && j < self.my);
        self.data[self.offset(eqn, step) + i * self.my + j]
    }

    /// One equation at one step: `mx` rows of `my` values.
    pub fn slab(&self, eqn: usize, step: usize) -> &[f64] {
        let start = self.offset(eqn, step);
        &self.data[start..start + self.mx * self.my]
    }

    pub(crate) fn slab_mut(&mut self, eqn: usize, step: usize) -> &mut [f64] {
        let start = self.offset(eqn, step);
        let len = self.mx * self.my;
        &mut self.data[start..start + len]
    }

    /// Row `i` of the slab for `eqn` at `step`.
    pub fn row(&self, eqn: usize, step: usize, i: usize) -> &[f64] {
        let slab = self.slab(eqn, step);
        &slab[i * self.my..(i + 1) * self.my]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let q = StateSeries::zeros(4, 3, 2, 5);
        assert_eq!(q.shape(), (4, 3, 2, 5));
        assert_eq!(q.slab(3, 2).len(), 10);
        assert!(q.slab(0, 0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_slabs_do_not_overlap() {
        let mut q = StateSeries::zeros(2, 2, 2, 2);
        q.slab_mut(1, 0).fill(3.0);
        assert!(q.slab(0, 0).iter().all(|&v| v == 0.0));
        assert!(q.slab(0, 1).iter().all(|&v| v == 0.0));
        assert!(q.slab(1, 0).iter().all(|&v| v == 3.0));
        assert!(q.slab(1, 1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_get_row_major_within_slab() {
        let mut q = StateSeries::zeros(1, 1, 2, 3);
        q.slab_mut(0, 0).copy_from_slice(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(q.get(0, 0, 0, 2), 2.0);
        assert_eq!(q.get(0, 0, 1, 0), 10.0);
        assert_eq!(q.row(0, 0, 1), &[10.0, 11.0, 12.0]);
    }
}
