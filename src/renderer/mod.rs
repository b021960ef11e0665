mod color;
mod font;
mod streamline;

// Re-export public API
pub use color::{map_to_rgba, normalize, ColorMap};
pub use streamline::{spiral_seeds, trace_streamlines, VectorField};

use color::{BAR_GAP, BAR_WIDTH, LABEL_GAP, TICK_LEN};
use font::{FONT_HEIGHT, FONT_WIDTH};

use crate::config::{StreamlineConfig, VectorConfig};
use crate::grid::Grid;
use crate::series::StateSeries;

/// Equation indices of the velocity components and pressure.
pub const U_EQN: usize = 0;
pub const V_EQN: usize = 1;
pub const PRESSURE_EQN: usize = 2;

/// Axis tick count per axis (0, 0.2, ..., 1.0 on the unit square).
const AXIS_TICKS: usize = 6;
const COLORBAR_TICKS: usize = 7;

const MARGIN_LEFT: usize = 52;
const MARGIN_RIGHT: usize = 14;
const MARGIN_TOP: usize = 12;
const MARGIN_BOTTOM: usize = 44;
const MIN_PLOT: usize = 16;

const BACKGROUND: u8 = 255;
const INK: [u8; 3] = [0, 0, 0];
const AXIS_LABEL_SCALE: usize = 2;

/// Pressure scaled by the dynamic pressure of the lid.
const PRESSURE_LABEL: &str = "p/(rho U^2)";

/// What is drawn over the pressure heatmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay {
    /// Velocity arrows at every `stride`-th cell; length equals speed in data units.
    Quiver { stride: usize },
    /// Streamlines seeded on a `30 * density` mask.
    Streamlines { density: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotStyle {
    pub vmin: f64,
    pub vmax: f64,
    pub colormap: ColorMap,
    pub overlay: Overlay,
    pub colorbar: bool,
    pub colorbar_label: String,
}

impl PlotStyle {
    pub fn vector(cfg: &VectorConfig) -> Self {
        Self {
            vmin: cfg.vmin,
            vmax: cfg.vmax,
            colormap: ColorMap::CoolWarm,
            overlay: Overlay::Quiver { stride: cfg.quiver_stride.max(1) },
            colorbar: cfg.colorbar,
            colorbar_label: PRESSURE_LABEL.into(),
        }
    }

    pub fn streamline(cfg: &StreamlineConfig) -> Self {
        Self {
            vmin: cfg.vmin,
            vmax: cfg.vmax,
            colormap: ColorMap::CoolWarm,
            overlay: Overlay::Streamlines { density: cfg.density },
            colorbar: cfg.colorbar,
            colorbar_label: PRESSURE_LABEL.into(),
        }
    }

    /// Evenly spaced colorbar tick values from `vmin` to `vmax`.
    pub fn colorbar_ticks(&self) -> Vec<f64> {
        let step = (self.vmax - self.vmin) / (COLORBAR_TICKS - 1) as f64;
        (0..COLORBAR_TICKS)
            .map(|k| {
                let v = self.vmin + k as f64 * step;
                if v.abs() < step.abs() * 1e-6 { 0.0 } else { v }
            })
            .collect()
    }
}

/// Pixel layout of one frame: a square plot area with margins for ticks and
/// labels, plus an optional colorbar on the right.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotLayout {
    pub frame_width: usize,
    pub frame_height: usize,
    pub plot_x: usize,
    pub plot_y: usize,
    pub plot_size: usize,
    /// Axis limits, identical for x and y.
    pub lo: f64,
    pub hi: f64,
    pub colorbar: bool,
}

impl PlotLayout {
    /// Fit a square plot with axis range `[0, upper]` into `width x height` pixels.
    /// The frame grows when the request is too small for the margins.
    pub fn fit(width: usize, height: usize, upper: f64, colorbar: bool) -> Self {
        let right = MARGIN_RIGHT + if colorbar { color::BAR_TOTAL } else { 0 };
        let avail_w = width.saturating_sub(MARGIN_LEFT + right);
        let avail_h = height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM);
        let plot_size = avail_w.min(avail_h).max(MIN_PLOT);

        let frame_width = width.max(MARGIN_LEFT + plot_size + right);
        let frame_height = height.max(MARGIN_TOP + plot_size + MARGIN_BOTTOM);
        let spare_w = frame_width - (MARGIN_LEFT + plot_size + right);
        let spare_h = frame_height - (MARGIN_TOP + plot_size + MARGIN_BOTTOM);

        Self {
            frame_width,
            frame_height,
            plot_x: MARGIN_LEFT + spare_w / 2,
            plot_y: MARGIN_TOP + spare_h / 2,
            plot_size,
            lo: 0.0,
            hi: upper,
            colorbar,
        }
    }

    /// Pixels per data unit.
    pub fn scale(&self) -> f64 {
        self.plot_size as f64 / (self.hi - self.lo)
    }

    /// Data coordinates to frame pixel coordinates (y grows downward).
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let s = self.scale();
        (
            self.plot_x as f64 + (x - self.lo) * s,
            self.plot_y as f64 + (self.hi - y) * s,
        )
    }

    /// Data coordinates at the centre of plot pixel `(px, py)`.
    fn data_at(&self, px: usize, py: usize) -> (f64, f64) {
        let s = self.scale();
        (
            self.lo + (px as f64 + 0.5) / s,
            self.hi - (py as f64 + 0.5) / s,
        )
    }

    pub fn buffer_len(&self) -> usize {
        self.frame_width * self.frame_height * 4
    }
}

// Alpha blend: dst = dst * (1 - alpha) + src * alpha
#[inline]
fn alpha_blend(buf: &mut [u8], off: usize, color: [u8; 3], alpha: f64) {
    for c in 0..3 {
        let dst = buf[off + c] as f64;
        buf[off + c] = (dst * (1.0 - alpha) + color[c] as f64 * alpha).round() as u8;
    }
}

#[inline]
fn put_pixel(buf: &mut [u8], frame_width: usize, x: usize, y: usize, rgba: [u8; 4]) {
    let off = (y * frame_width + x) * 4;
    buf[off..off + 4].copy_from_slice(&rgba);
}

/// Bresenham line drawing with alpha-blended color, clipped to the plot area.
fn draw_line_blended(
    buf: &mut [u8],
    layout: &PlotLayout,
    x0: isize,
    y0: isize,
    x1: isize,
    y1: isize,
    color: [u8; 3],
    alpha: f64,
) {
    let (left, top) = (layout.plot_x as isize, layout.plot_y as isize);
    let (right, bottom) = (left + layout.plot_size as isize, top + layout.plot_size as isize);
    let mut cx = x0;
    let mut cy = y0;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if cx >= left && cx < right && cy >= top && cy < bottom {
            let off = (cy as usize * layout.frame_width + cx as usize) * 4;
            alpha_blend(buf, off, color, alpha);
        }
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
}

/// Nearest cell index for coordinate `v` on centres starting at `first` with `spacing`.
fn nearest_cell(v: f64, first: f64, spacing: f64, count: usize) -> Option<usize> {
    let f = ((v - first) / spacing + 0.5).floor();
    if f < 0.0 || f >= count as f64 { None } else { Some(f as usize) }
}

/// Pressure heatmap: each cell is a flat patch centred on its cell centre.
fn draw_heatmap(
    buf: &mut [u8],
    q: &StateSeries,
    grid: &Grid,
    frame: usize,
    layout: &PlotLayout,
    style: &PlotStyle,
) {
    let (_, _, mx, my) = q.shape();
    let rows = grid.y.len().min(mx);
    let cols = grid.x.len().min(my);
    if rows == 0 || cols == 0 {
        return;
    }
    let pressure = q.slab(PRESSURE_EQN, frame);

    for py in 0..layout.plot_size {
        for px in 0..layout.plot_size {
            let (x, y) = layout.data_at(px, py);
            let (Some(c), Some(r)) = (
                nearest_cell(x, grid.x[0], grid.dx, cols),
                nearest_cell(y, grid.y[0], grid.dy, rows),
            ) else {
                continue;
            };
            let t = normalize(pressure[r * my + c], style.vmin, style.vmax);
            let rgba = map_to_rgba(t, style.colormap);
            put_pixel(buf, layout.frame_width, layout.plot_x + px, layout.plot_y + py, rgba);
        }
    }
}

/// Arrows with tails at the sampled cell centres.
fn draw_quiver(
    buf: &mut [u8],
    q: &StateSeries,
    grid: &Grid,
    frame: usize,
    layout: &PlotLayout,
    stride: usize,
) {
    let (_, _, mx, my) = q.shape();
    let rows = grid.y.len().min(mx);
    let cols = grid.x.len().min(my);
    let alpha = 1.0;

    for r in (0..rows).step_by(stride) {
        for c in (0..cols).step_by(stride) {
            let u = q.get(U_EQN, frame, r, c);
            let v = q.get(V_EQN, frame, r, c);
            let mag = (u * u + v * v).sqrt();
            if !(mag > 0.0) || !mag.is_finite() {
                continue;
            }
            let (tx, ty) = layout.to_pixel(grid.x[c], grid.y[r]);
            let (hx, hy) = layout.to_pixel(grid.x[c] + u, grid.y[r] + v);
            let (x0, y0) = (tx.round() as isize, ty.round() as isize);
            let (x1, y1) = (hx.round() as isize, hy.round() as isize);

            // Draw shaft
            draw_line_blended(buf, layout, x0, y0, x1, y1, INK, alpha);

            // Draw arrowhead (two lines from tip at ±150° from direction)
            let len_px = ((hx - tx).powi(2) + (hy - ty).powi(2)).sqrt();
            if len_px > 2.0 {
                let head_len = 5.0_f64.min(len_px * 0.35);
                let dir_x = (hx - tx) / len_px;
                let dir_y = (hy - ty) / len_px;
                let cos_a = -0.866_f64;
                let sin_a = 0.5_f64;
                for &sign in &[1.0_f64, -1.0] {
                    let ax = (dir_x * cos_a - dir_y * sin_a * sign) * head_len;
                    let ay = (dir_x * sin_a * sign + dir_y * cos_a) * head_len;
                    let ex = (x1 as f64 + ax).round() as isize;
                    let ey = (y1 as f64 + ay).round() as isize;
                    draw_line_blended(buf, layout, x1, y1, ex, ey, INK, alpha);
                }
            }
        }
    }
}

fn draw_streamlines(
    buf: &mut [u8],
    q: &StateSeries,
    grid: &Grid,
    frame: usize,
    layout: &PlotLayout,
    density: f64,
) {
    let (_, _, _, my) = q.shape();
    let Some(field) = VectorField::new(q.slab(U_EQN, frame), q.slab(V_EQN, frame), my, grid) else {
        return;
    };
    for line in trace_streamlines(&field, density) {
        for w in line.windows(2) {
            let (ax, ay) = layout.to_pixel(w[0].0, w[0].1);
            let (bx, by) = layout.to_pixel(w[1].0, w[1].1);
            draw_line_blended(
                buf,
                layout,
                ax.round() as isize,
                ay.round() as isize,
                bx.round() as isize,
                by.round() as isize,
                INK,
                0.8,
            );
        }
    }
}

fn fill_rect(
    buf: &mut [u8],
    frame_width: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    color: [u8; 3],
) {
    for yy in y..y + h {
        for xx in x..x + w {
            put_pixel(buf, frame_width, xx, yy, [color[0], color[1], color[2], 255]);
        }
    }
}

fn draw_rect_border(
    buf: &mut [u8],
    frame_width: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    color: [u8; 3],
) {
    fill_rect(buf, frame_width, x, y, w, 1, color);
    fill_rect(buf, frame_width, x, y + h - 1, w, 1, color);
    fill_rect(buf, frame_width, x, y, 1, h, color);
    fill_rect(buf, frame_width, x + w - 1, y, 1, h, color);
}

fn text_width(text: &str) -> usize {
    text.len() * (FONT_WIDTH + 1)
}

/// Spines, ticks every fifth of the range, tick labels and `x`/`y` axis labels.
fn draw_axes(buf: &mut [u8], layout: &PlotLayout) {
    let fw = layout.frame_width;
    let (px, py, size) = (layout.plot_x, layout.plot_y, layout.plot_size);
    draw_rect_border(buf, fw, px, py, size, size, INK);

    let step = (layout.hi - layout.lo) / (AXIS_TICKS - 1) as f64;
    for k in 0..AXIS_TICKS {
        let value = layout.lo + k as f64 * step;
        let label = format!("{value:.1}");
        let offset = (k * (size - 1)) / (AXIS_TICKS - 1);

        // x ticks below the bottom spine
        let tx = px + offset;
        fill_rect(buf, fw, tx, py + size, 1, TICK_LEN, INK);
        let lx = tx.saturating_sub(text_width(&label) / 2);
        font::draw_text(buf, fw, lx, py + size + TICK_LEN + 2, &label, INK);

        // y ticks left of the left spine, 0 at the bottom
        let ty = py + size - 1 - offset;
        fill_rect(buf, fw, px - TICK_LEN, ty, TICK_LEN, 1, INK);
        let lx = (px - TICK_LEN - 2).saturating_sub(text_width(&label));
        let ly = ty.saturating_sub(FONT_HEIGHT / 2);
        font::draw_text(buf, fw, lx, ly, &label, INK);
    }

    let (cw, ch) = (FONT_WIDTH * AXIS_LABEL_SCALE, FONT_HEIGHT * AXIS_LABEL_SCALE);
    let x_label_x = px + size / 2 - font::text_width_sized("x", cw) / 2;
    let x_label_y = py + size + TICK_LEN + FONT_HEIGHT + 8;
    font::draw_text_sized(buf, fw, x_label_x, x_label_y, "x", INK, cw, ch);
    let y_label_y = py + size / 2 - ch / 2;
    font::draw_text_sized(buf, fw, 4, y_label_y, "y", INK, cw, ch);
}

/// Vertical colorbar right of the plot: `vmax` at the top, `vmin` at the bottom.
fn draw_colorbar(buf: &mut [u8], layout: &PlotLayout, style: &PlotStyle) {
    let fw = layout.frame_width;
    let bar_x = layout.plot_x + layout.plot_size + BAR_GAP;
    let (top, h) = (layout.plot_y, layout.plot_size);

    for y in 0..h {
        let t = 1.0 - y as f64 / (h - 1) as f64;
        let rgba = map_to_rgba(t, style.colormap);
        for bx in 0..BAR_WIDTH {
            put_pixel(buf, fw, bar_x + bx, top + y, rgba);
        }
    }
    draw_rect_border(buf, fw, bar_x, top, BAR_WIDTH, h, INK);

    let ticks = style.colorbar_ticks();
    let step = (style.vmax - style.vmin).abs() / (COLORBAR_TICKS - 1) as f64;
    let decimals = if step > 0.0 { (-step.log10().floor()).max(0.0) as usize } else { 2 };
    let tick_x = bar_x + BAR_WIDTH;
    let label_x = tick_x + TICK_LEN + LABEL_GAP;
    for value in ticks {
        let t = normalize(value, style.vmin, style.vmax);
        let y = top + ((1.0 - t) * (h - 1) as f64).round() as usize;
        fill_rect(buf, fw, tick_x, y, TICK_LEN, 1, INK);
        let label = format!("{value:.decimals$}");
        font::draw_text(buf, fw, label_x, y.saturating_sub(FONT_HEIGHT / 2), &label, INK);
    }

    // Title above the bar, clear of the top tick label.
    let title_y = top.saturating_sub(FONT_HEIGHT + 4);
    font::draw_text(buf, fw, bar_x, title_y, &style.colorbar_label, INK);
}

/// Render frame `frame` of `q` into a pre-allocated RGBA buffer.
/// The buffer is resized and cleared to white as needed.
pub fn render_into(
    buf: &mut Vec<u8>,
    q: &StateSeries,
    grid: &Grid,
    frame: usize,
    layout: &PlotLayout,
    style: &PlotStyle,
) {
    buf.resize(layout.buffer_len(), 0);
    buf.fill(BACKGROUND);

    draw_heatmap(buf, q, grid, frame, layout, style);
    match style.overlay {
        Overlay::Quiver { stride } => draw_quiver(buf, q, grid, frame, layout, stride.max(1)),
        Overlay::Streamlines { density } => draw_streamlines(buf, q, grid, frame, layout, density),
    }
    draw_axes(buf, layout);
    if layout.colorbar {
        draw_colorbar(buf, layout, style);
    }
}

/// Frame generator for an animation driver: call once per frame index.
pub fn frame_renderer<'a>(
    q: &'a StateSeries,
    grid: &'a Grid,
    layout: &'a PlotLayout,
    style: &'a PlotStyle,
) -> impl Fn(usize, &mut Vec<u8>) + 'a {
    move |frame, buf| render_into(buf, q, grid, frame, layout, style)
}
