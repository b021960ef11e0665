//! Reads solver output into a [`StateSeries`].
//!
//! Metadata is read first (grid header, then run config), so a bad header
//! fails before any step file is opened. Each step file is then parsed and
//! reshaped into the series; any error aborts the whole load.

mod metadata;
mod naming;
mod table;

pub use metadata::{first_column, load_grid_meta, load_run_meta, GridMeta, RunMeta};
pub use naming::{step_path, step_suffix};
pub use table::{parse_table, reshape_into, StepTable};

use std::path::{Path, PathBuf};

use crate::config::InputConfig;
use crate::error::{Error, Result};
use crate::renderer::PRESSURE_EQN;
use crate::series::StateSeries;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metadata {
    pub grid: GridMeta,
    pub run: RunMeta,
}

/// Parse one step file and write it into `series` at `step`.
pub fn load_step(
    path: &Path,
    header_lines: usize,
    grid: &GridMeta,
    series: &mut StateSeries,
    step: usize,
) -> Result<()> {
    let text = metadata::read_text(path)?;
    let table = parse_table(&text, path, header_lines, series.meqn())?;
    log::debug!("{}: {} rows", path.display(), table.rows());
    reshape_into(&table, path, grid.mx, grid.my, series, step)
}

/// Equations the renderer reads: velocity components and pressure.
const MIN_EQUATIONS: usize = PRESSURE_EQN + 1;

/// Number of `f64` slots for `meqn * frames * mx * my`, if it fits in memory.
fn series_len(meqn: usize, frames: usize, mx: usize, my: usize) -> Option<usize> {
    let len = meqn.checked_mul(frames)?.checked_mul(mx)?.checked_mul(my)?;
    (len <= isize::MAX as usize / std::mem::size_of::<f64>()).then_some(len)
}

/// Validate `input` and read the grid header and run config.
///
/// No step file beyond the header is opened.
pub fn load_metadata(input: &InputConfig) -> Result<Metadata> {
    if input.meqn < MIN_EQUATIONS {
        return Err(Error::InvalidValue {
            path: input.dir.clone(),
            name: "meqn",
            value: input.meqn as f64,
            reason: "must be at least 3",
        });
    }

    let grid = load_grid_meta(&input.header_path())?;
    log::info!("mx = {}, my = {}", grid.mx, grid.my);
    log::info!("dx = {}", grid.dx);

    let run = load_run_meta(&input.run_config_path())?;
    log::info!("steps = {}", run.steps);

    Ok(Metadata { grid, run })
}

/// Read every step `0..=steps` described by `meta` into a new series.
pub fn load_series(input: &InputConfig, meta: &Metadata) -> Result<StateSeries> {
    let Metadata { grid, run } = meta;
    let too_large = |name: &'static str, value: f64, path: PathBuf| Error::InvalidValue {
        path,
        name,
        value,
        reason: "state series does not fit in memory",
    };
    let frames = run
        .steps
        .checked_add(1)
        .ok_or_else(|| too_large("steps", run.steps as f64, input.run_config_path()))?;
    if series_len(input.meqn, frames, grid.mx, grid.my).is_none() {
        let cells = grid.mx as f64 * grid.my as f64;
        return Err(too_large("mx * my", cells, input.header_path()));
    }

    let mut series = StateSeries::zeros(input.meqn, frames, grid.mx, grid.my);
    for step in 0..frames {
        let path = step_path(&input.dir, &input.step_prefix, step);
        load_step(&path, input.header_lines, grid, &mut series, step)?;
    }
    log::info!("loaded {frames} frames from {}", input.dir.display());
    Ok(series)
}

/// Load metadata and every step `0..=steps` described by `input`.
pub fn load(input: &InputConfig) -> Result<(Metadata, StateSeries)> {
    let meta = load_metadata(input)?;
    let series = load_series(input, &meta)?;
    Ok((meta, series))
}

/// Free-text solver parameters, returned verbatim.
pub fn read_parameters(path: &Path) -> Result<String> {
    metadata::read_text(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;

    fn header(mx: usize, my: usize) -> String {
        let dx = 1.0 / mx as f64;
        let dy = 1.0 / my as f64;
        format!(
            "1  grid_number\n1  AMR_level\n{mx}  mx\n{my}  my\n\
             0.0  xlow\n0.0  ylow\n{dx:e}  dx\n{dy:e}  dy\n"
        )
    }

    fn claw_data(steps: usize) -> String {
        let mut text = String::from("# generated\n\n");
        for n in 0..9 {
            text.push_str(&format!("{n}   =: filler\n"));
        }
        text.push_str(&format!("{steps}   =: num_output_times\n"));
        text
    }

    /// Step file where equation `k` holds `base + k` in every cell.
    fn constant_step(mx: usize, my: usize, base: f64) -> String {
        let mut text = header(mx, my);
        for j in 0..my {
            for _ in 0..mx {
                text.push_str(&format!(
                    "{:e} {:e} {:e} {:e}\n",
                    base,
                    base + 1.0,
                    base + 2.0,
                    base + 3.0
                ));
            }
            if j + 1 < my {
                text.push('\n');
            }
        }
        text
    }

    fn input_for(dir: &Path) -> InputConfig {
        InputConfig {
            dir: dir.to_path_buf(),
            ..InputConfig::default()
        }
    }

    fn write_run(dir: &Path, mx: usize, my: usize, steps: usize) {
        fs::write(dir.join("claw.data"), claw_data(steps)).unwrap();
        for step in 0..=steps {
            fs::write(
                step_path(dir, "fort.q", step),
                constant_step(mx, my, 100.0 * step as f64),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_load_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 2, 2, 2);

        let (meta, q) = load(&input_for(dir.path())).unwrap();
        assert_eq!(meta.grid.mx, 2);
        assert_eq!(meta.grid.my, 2);
        assert_eq!(meta.run.steps, 2);
        assert_eq!(q.shape(), (4, 3, 2, 2));

        for step in 0..3 {
            for k in 0..4 {
                let expected = 100.0 * step as f64 + k as f64;
                assert!(
                    q.slab(k, step).iter().all(|&v| v == expected),
                    "slab ({k}, {step}) should be {expected}, got {:?}",
                    q.slab(k, step)
                );
            }
        }
    }

    #[test]
    fn test_load_missing_step_file() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 2, 2, 2);
        fs::remove_file(step_path(dir.path(), "fort.q", 2)).unwrap();

        let err = load(&input_for(dir.path())).unwrap_err();
        match err {
            Error::Missing { path, .. } => assert_eq!(path, dir.path().join("fort.q0002")),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_short_header_fails_before_step_parsing() {
        let dir = tempfile::tempdir().unwrap();
        // Only the header exists; a step-file read would report Missing instead.
        fs::write(dir.path().join("fort.q0000"), "1\n1\n4\n4\n0.0\n").unwrap();

        let err = load(&input_for(dir.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, Error::Truncated { .. }), "got {err:?}");
    }

    #[test]
    fn test_too_few_equations_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing on disk: any file read would report Missing instead.
        let input = InputConfig {
            meqn: 2,
            ..input_for(dir.path())
        };
        let err = load(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, Error::InvalidValue { name: "meqn", .. }), "got {err:?}");
    }

    #[test]
    fn test_oversized_grid_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("fort.q0000"),
            "1\n1\n1e10  mx\n1e10  my\n0.0\n0.0\n1e-10  dx\n1e-10  dy\n",
        )
        .unwrap();
        fs::write(dir.path().join("claw.data"), claw_data(0)).unwrap();

        let err = load(&input_for(dir.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, Error::InvalidValue { name: "mx * my", .. }), "got {err:?}");
    }

    #[test]
    fn test_series_len_limits() {
        assert_eq!(series_len(4, 3, 2, 2), Some(48));
        assert_eq!(series_len(4, 1, 10_000_000_000, 10_000_000_000), None);
        assert_eq!(series_len(4, usize::MAX, 1, 1), None);
    }

    #[test]
    fn test_metadata_loads_without_step_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fort.q0000"), header(2, 2)).unwrap();
        fs::write(dir.path().join("claw.data"), claw_data(3)).unwrap();
        let input = input_for(dir.path());

        let meta = load_metadata(&input).unwrap();
        assert_eq!(meta.run.steps, 3);
        // The header alone has no data rows, so the series load fails afterwards.
        assert_eq!(load_series(&input, &meta).unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_step_with_missing_row_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), 2, 2, 1);
        let path = step_path(dir.path(), "fort.q", 1);
        let text = fs::read_to_string(&path).unwrap();
        let trimmed: Vec<&str> = text.lines().collect();
        fs::write(&path, trimmed[..trimmed.len() - 1].join("\n")).unwrap();

        let err = load(&input_for(dir.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_custom_prefix_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("run");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("claw.data"), claw_data(0)).unwrap();
        fs::write(sub.join("state0000"), constant_step(2, 2, 5.0)).unwrap();

        let input = InputConfig {
            dir: sub.clone(),
            header: "state0000".into(),
            step_prefix: "state".into(),
            ..InputConfig::default()
        };
        let (_, q) = load(&input).unwrap();
        assert_eq!(q.shape(), (4, 1, 2, 2));
        assert_eq!(q.get(2, 0, 1, 1), 7.0);
    }

    #[test]
    fn test_read_parameters_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setprob.data");
        let text = "# setprob\n1.0e-2   =: nu\n  0.9 =: cfl\n";
        fs::write(&path, text).unwrap();
        assert_eq!(read_parameters(&path).unwrap(), text);
        assert!(read_parameters(&PathBuf::from("nope/setprob.data")).is_err());
    }
}
