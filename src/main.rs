use std::path::{Path, PathBuf};

use clawplot::animation::Animation;
use clawplot::config::{self, Config};
use clawplot::error::Result;
use clawplot::grid::Grid;
use clawplot::ingest;
use clawplot::renderer::{frame_renderer, PlotLayout, PlotStyle};
use clawplot::series::StateSeries;

fn render_animation(
    name: &str,
    q: &StateSeries,
    grid: &Grid,
    frames: usize,
    cfg: &Config,
    style: &PlotStyle,
    output: &Path,
) -> Result<()> {
    let layout = PlotLayout::fit(cfg.plot.width, cfg.plot.height, cfg.plot.upper, style.colorbar);
    log::info!(
        "rendering {name}: {frames} frames at {}x{}",
        layout.frame_width, layout.frame_height
    );
    let anim = Animation::record(
        name,
        frames,
        layout.frame_width,
        layout.frame_height,
        cfg.plot.interval_ms,
        frame_renderer(q, grid, &layout, style),
    )?;
    anim.write_html(output)
}

fn run(cfg: &Config) -> Result<()> {
    let meta = ingest::load_metadata(&cfg.input)?;
    let parameters = ingest::read_parameters(&cfg.input.parameters_path())?;
    print!("{parameters}");
    let q = ingest::load_series(&cfg.input, &meta)?;

    let grid = Grid::new(&meta.grid, cfg.plot.upper)?;
    let (rows, cols) = grid.mesh_shape();
    log::debug!("mesh {rows}x{cols}");

    let frames = meta.run.steps;
    render_animation(
        "vector field",
        &q,
        &grid,
        frames,
        cfg,
        &PlotStyle::vector(&cfg.vector),
        &cfg.vector.output,
    )?;
    render_animation(
        "streamlines",
        &q,
        &grid,
        frames,
        cfg,
        &PlotStyle::streamline(&cfg.streamline),
        &cfg.streamline.output,
    )
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
    let cfg = config::load(&config_path);

    if let Err(e) = run(&cfg) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
