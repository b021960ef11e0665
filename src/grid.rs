use crate::error::{Error, Result};
use crate::ingest::GridMeta;

/// Cell centres `low + spacing/2 + k*spacing` strictly below `upper`.
pub fn cell_centres(low: f64, spacing: f64, upper: f64) -> Result<Vec<f64>> {
    if !(spacing > 0.0) || !spacing.is_finite() {
        return Err(Error::InvalidSpacing { spacing });
    }
    let start = low + spacing / 2.0;
    let count = ((upper - start) / spacing).ceil().max(0.0) as usize;
    Ok((0..count).map(|k| start + k as f64 * spacing).collect())
}

/// Cell-centre coordinates and their 2-D meshes.
///
/// Meshes are `y.len()` rows of `x.len()` columns: `xgrid[r][c] = x[c]`,
/// `ygrid[r][c] = y[r]`, stored flat and row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub dx: f64,
    pub dy: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub xgrid: Vec<f64>,
    pub ygrid: Vec<f64>,
}

impl Grid {
    pub fn new(meta: &GridMeta, upper: f64) -> Result<Self> {
        let x = cell_centres(meta.xlow, meta.dx, upper)?;
        let y = cell_centres(meta.ylow, meta.dy, upper)?;
        let (xgrid, ygrid) = meshgrid(&x, &y);
        Ok(Self {
            dx: meta.dx,
            dy: meta.dy,
            x,
            y,
            xgrid,
            ygrid,
        })
    }

    /// `(rows, cols)` of the meshes.
    pub fn mesh_shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }
}

fn meshgrid(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut xgrid = Vec::with_capacity(x.len() * y.len());
    let mut ygrid = Vec::with_capacity(x.len() * y.len());
    for &yr in y {
        for &xc in x {
            xgrid.push(xc);
            ygrid.push(yr);
        }
    }
    (xgrid, ygrid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(mx: usize, my: usize, dx: f64, dy: f64) -> GridMeta {
        GridMeta { mx, my, xlow: 0.0, ylow: 0.0, dx, dy }
    }

    #[test]
    fn test_quarter_spacing_centres() {
        let grid = Grid::new(&meta(4, 4, 0.25, 0.25), 1.0).unwrap();
        assert_eq!(grid.x, vec![0.125, 0.375, 0.625, 0.875]);
        assert_eq!(grid.y, vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn test_centre_count_matches_cells() {
        for mx in [1usize, 3, 10, 50, 128] {
            let dx = 1.0 / mx as f64;
            let x = cell_centres(0.0, dx, 1.0).unwrap();
            assert_eq!(x.len(), mx, "mx = {mx}");
            assert!(x.iter().all(|&v| v < 1.0));
        }
    }

    #[test]
    fn test_centres_stop_at_upper_bound() {
        // Domain wider than the unit square is clipped at 1.
        let x = cell_centres(0.0, 0.25, 1.0).unwrap();
        let wide = cell_centres(0.5, 0.25, 1.0).unwrap();
        assert_eq!(x.len(), 4);
        assert_eq!(wide, vec![0.625, 0.875]);
    }

    #[test]
    fn test_non_positive_spacing_rejected() {
        assert!(matches!(
            cell_centres(0.0, 0.0, 1.0),
            Err(Error::InvalidSpacing { .. })
        ));
        assert!(cell_centres(0.0, -0.1, 1.0).is_err());
        assert!(cell_centres(0.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_meshgrid_layout() {
        let grid = Grid::new(&meta(2, 3, 0.5, 1.0 / 3.0), 1.0).unwrap();
        assert_eq!(grid.mesh_shape(), (3, 2));
        // Flat index r * 2 + c.
        assert_eq!(grid.xgrid[2], grid.x[0]);
        assert_eq!(grid.xgrid[5], grid.x[1]);
        assert_eq!(grid.ygrid[5], grid.y[2]);
        assert_eq!(grid.ygrid[1], grid.y[0]);
    }

    #[test]
    fn test_spacing_carried_from_metadata() {
        let grid = Grid::new(&meta(4, 2, 0.25, 0.5), 1.0).unwrap();
        assert_eq!(grid.dx, 0.25);
        assert_eq!(grid.dy, 0.5);
    }
}
