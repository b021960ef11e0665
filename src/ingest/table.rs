// Per-step table reader and the reshape into the state series.

use std::path::Path;

use crate::error::{Error, Result};
use crate::series::StateSeries;

/// Data rows of one step file, first `meqn` columns only, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct StepTable {
    meqn: usize,
    rows: usize,
    values: Vec<f64>,
}

impl StepTable {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn meqn(&self) -> usize {
        self.meqn
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.meqn + col]
    }

    /// Equations as rows, flattened cell index as columns.
    pub fn transpose(&self) -> Vec<Vec<f64>> {
        (0..self.meqn)
            .map(|k| (0..self.rows).map(|r| self.value(r, k)).collect())
            .collect()
    }
}

/// Skip `header_lines` raw lines, then read every non-blank row.
pub fn parse_table(text: &str, path: &Path, header_lines: usize, meqn: usize) -> Result<StepTable> {
    let mut values = Vec::new();
    let mut rows = 0;

    for (n, line) in text.lines().enumerate().skip(header_lines) {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.peek().is_none() {
            continue;
        }
        let mut taken = 0;
        for token in tokens.take(meqn) {
            let v = token.parse::<f64>().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                line: n + 1,
                token: token.to_string(),
            })?;
            values.push(v);
            taken += 1;
        }
        if taken < meqn {
            return Err(Error::ShapeMismatch {
                path: path.to_path_buf(),
                detail: format!("line {} has {taken} columns, need {meqn}", n + 1),
            });
        }
        rows += 1;
    }

    Ok(StepTable { meqn, rows, values })
}

/// Write one parsed table into `series` at `step`.
///
/// For every equation `k` and outer index `j in 0..mx`, the run of `mx`
/// consecutive values starting at flat index `j * mx` becomes row `j` of
/// the slab, so table row `r` lands at `(r / mx, r % mx)`. Runs of `mx`
/// values only fill rows of length `my`, hence non-square grids are
/// rejected before anything is written.
pub fn reshape_into(
    table: &StepTable,
    path: &Path,
    mx: usize,
    my: usize,
    series: &mut StateSeries,
    step: usize,
) -> Result<()> {
    let shape_err = |detail: String| Error::ShapeMismatch {
        path: path.to_path_buf(),
        detail,
    };

    if table.rows != mx * my {
        return Err(shape_err(format!(
            "expected {} rows ({mx} x {my}), found {}",
            mx * my,
            table.rows
        )));
    }
    if mx != my {
        return Err(shape_err(format!(
            "runs of {mx} values cannot fill rows of {my} cells"
        )));
    }
    if table.meqn != series.meqn() {
        return Err(shape_err(format!(
            "table has {} equations, series has {}",
            table.meqn,
            series.meqn()
        )));
    }

    let columns = table.transpose();
    for (k, column) in columns.iter().enumerate() {
        let slab = series.slab_mut(k, step);
        for j in 0..mx {
            slab[j * my..(j + 1) * my].copy_from_slice(&column[j * mx..(j + 1) * mx]);
        }
    }
    Ok(())
}
