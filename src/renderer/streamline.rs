// Streamline tracing over a cell-centred velocity field.
//
// Seeds come from a coarse occupancy mask walked as an inward spiral from the
// boundary. A seed is used only when its mask cell is still free; the traced
// line marks every cell it passes through but is never cut short by cells
// already marked, so lines run until they leave the domain, stall, or reach
// the length cap.

use crate::grid::Grid;

/// Mask cells per axis at density 1.
const MASK_CELLS_PER_DENSITY: f64 = 30.0;
/// Integration steps per mask cell.
const STEPS_PER_CELL: f64 = 4.0;
/// Lines shorter than this (in unit-domain lengths) are discarded.
const MIN_LENGTH: f64 = 0.1;
/// Cap on each direction of a line, in unit-domain lengths.
const MAX_HALF_LENGTH: f64 = 2.0;

/// Velocity components on the cell-centre grid, addressed in unit coordinates.
pub struct VectorField<'a> {
    u: &'a [f64],
    v: &'a [f64],
    rows: usize,
    cols: usize,
    row_len: usize,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl<'a> VectorField<'a> {
    /// `u`/`v` are slabs with rows of `row_len` values; row index follows `y`,
    /// column index follows `x`. Returns `None` when the grid is too small
    /// to interpolate over (fewer than two centres on an axis).
    pub fn new(u: &'a [f64], v: &'a [f64], row_len: usize, grid: &Grid) -> Option<Self> {
        if row_len == 0 {
            return None;
        }
        let rows = grid.y.len().min(u.len() / row_len);
        let cols = grid.x.len().min(row_len);
        if rows < 2 || cols < 2 {
            return None;
        }
        Some(Self {
            u,
            v,
            rows,
            cols,
            row_len,
            x0: grid.x[0],
            x1: grid.x[cols - 1],
            y0: grid.y[0],
            y1: grid.y[rows - 1],
        })
    }

    /// Bilinear sample at unit coordinates `(s, t)` in `[0, 1]^2`.
    pub fn sample(&self, s: f64, t: f64) -> (f64, f64) {
        let fc = s.clamp(0.0, 1.0) * (self.cols - 1) as f64;
        let fr = t.clamp(0.0, 1.0) * (self.rows - 1) as f64;
        let c0 = (fc.floor() as usize).min(self.cols - 2);
        let r0 = (fr.floor() as usize).min(self.rows - 2);
        let fx = fc - c0 as f64;
        let fy = fr - r0 as f64;

        let at = |field: &[f64], r: usize, c: usize| field[r * self.row_len + c];
        let lerp = |field: &[f64]| {
            at(field, r0, c0) * (1.0 - fx) * (1.0 - fy)
                + at(field, r0, c0 + 1) * fx * (1.0 - fy)
                + at(field, r0 + 1, c0) * (1.0 - fx) * fy
                + at(field, r0 + 1, c0 + 1) * fx * fy
        };
        (lerp(self.u), lerp(self.v))
    }

    /// Unit coordinates to data coordinates.
    pub fn to_data(&self, s: f64, t: f64) -> (f64, f64) {
        (
            self.x0 + s * (self.x1 - self.x0),
            self.y0 + t * (self.y1 - self.y0),
        )
    }

    /// Unit-speed direction of the flow at `(s, t)`, in unit coordinates.
    fn direction(&self, s: f64, t: f64) -> Option<(f64, f64)> {
        let (u, v) = self.sample(s, t);
        let ds = u / (self.x1 - self.x0);
        let dt = v / (self.y1 - self.y0);
        let speed = (ds * ds + dt * dt).sqrt();
        if !speed.is_finite() || speed < 1e-12 {
            return None;
        }
        Some((ds / speed, dt / speed))
    }
}

/// Inward spiral over an `nx x ny` grid, starting at the lower-left corner.
pub fn spiral_seeds(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(nx * ny);
    let (mut xfirst, mut yfirst) = (0isize, 1isize);
    let (mut xlast, mut ylast) = (nx as isize - 1, ny as isize - 1);
    let (mut x, mut y) = (0isize, 0isize);
    let mut dir = 0u8; // 0 right, 1 up, 2 left, 3 down

    for _ in 0..nx * ny {
        out.push((x as usize, y as usize));
        match dir {
            0 => {
                x += 1;
                if x >= xlast {
                    xlast -= 1;
                    dir = 1;
                }
            }
            1 => {
                y += 1;
                if y >= ylast {
                    ylast -= 1;
                    dir = 2;
                }
            }
            2 => {
                x -= 1;
                if x <= xfirst {
                    xfirst += 1;
                    dir = 3;
                }
            }
            _ => {
                y -= 1;
                if y <= yfirst {
                    yfirst += 1;
                    dir = 0;
                }
            }
        }
    }
    out
}

struct OccupancyMask {
    n: usize,
    cells: Vec<bool>,
    trajectory: Vec<usize>,
}

impl OccupancyMask {
    fn new(n: usize) -> Self {
        Self { n, cells: vec![false; n * n], trajectory: Vec::new() }
    }

    fn cell_of(&self, s: f64, t: f64) -> usize {
        let i = ((s * self.n as f64) as usize).min(self.n - 1);
        let j = ((t * self.n as f64) as usize).min(self.n - 1);
        j * self.n + i
    }

    fn is_free(&self, i: usize, j: usize) -> bool {
        !self.cells[j * self.n + i]
    }

    fn start_trajectory(&mut self) {
        self.trajectory.clear();
    }

    fn visit(&mut self, s: f64, t: f64) {
        let c = self.cell_of(s, t);
        if !self.cells[c] {
            self.cells[c] = true;
            self.trajectory.push(c);
        }
    }

    fn undo_trajectory(&mut self) {
        for &c in &self.trajectory {
            self.cells[c] = false;
        }
        self.trajectory.clear();
    }
}

/// Midpoint integration from `start` with signed step `h`; the start point is not included.
fn integrate(
    field: &VectorField,
    start: (f64, f64),
    h: f64,
    mask: &mut OccupancyMask,
) -> Vec<(f64, f64)> {
    let max_steps = (MAX_HALF_LENGTH / h.abs()) as usize;
    let inside = |s: f64, t: f64| (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t);
    let mut points = Vec::new();
    let (mut s, mut t) = start;

    for _ in 0..max_steps {
        let Some((k1s, k1t)) = field.direction(s, t) else { break };
        let (ms, mt) = (s + 0.5 * h * k1s, t + 0.5 * h * k1t);
        if !inside(ms, mt) {
            break;
        }
        let Some((k2s, k2t)) = field.direction(ms, mt) else { break };
        let (ns, nt) = (s + h * k2s, t + h * k2t);
        if !inside(ns, nt) {
            break;
        }
        s = ns;
        t = nt;
        mask.visit(s, t);
        points.push((s, t));
    }
    points
}

/// Trace streamlines of `field`; each line is a polyline in data coordinates.
pub fn trace_streamlines(field: &VectorField, density: f64) -> Vec<Vec<(f64, f64)>> {
    let n = ((MASK_CELLS_PER_DENSITY * density) as usize).max(1);
    let h = 1.0 / (n as f64 * STEPS_PER_CELL);
    let mut mask = OccupancyMask::new(n);
    let mut lines = Vec::new();

    for (i, j) in spiral_seeds(n, n) {
        if !mask.is_free(i, j) {
            continue;
        }
        let seed = ((i as f64 + 0.5) / n as f64, (j as f64 + 0.5) / n as f64);
        mask.start_trajectory();
        mask.visit(seed.0, seed.1);

        let backward = integrate(field, seed, -h, &mut mask);
        let forward = integrate(field, seed, h, &mut mask);
        if ((backward.len() + forward.len()) as f64) * h < MIN_LENGTH {
            mask.undo_trajectory();
            continue;
        }

        let line = backward
            .into_iter()
            .rev()
            .chain(std::iter::once(seed))
            .chain(forward)
            .map(|(s, t)| field.to_data(s, t))
            .collect();
        lines.push(line);
    }
    lines
}
