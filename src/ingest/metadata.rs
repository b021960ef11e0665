// Header and run-config readers.
//
// Both files are read as a single "first column": one token per non-blank,
// non-comment line. Values sit at fixed row offsets in that column.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Rows of the header column holding mx, my, xlow, ylow, dx, dy.
const GRID_ROWS: [(usize, &str); 6] = [
    (2, "mx"),
    (3, "my"),
    (4, "xlow"),
    (5, "ylow"),
    (6, "dx"),
    (7, "dy"),
];

/// Row of the run-config column holding the number of output times.
const STEPS_ROW: (usize, &str) = (9, "steps");

/// Cell counts, domain origin and cell spacing of the uniform grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMeta {
    pub mx: usize,
    pub my: usize,
    pub xlow: f64,
    pub ylow: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunMeta {
    /// Last output index; frames `0..=steps` are on disk.
    pub steps: usize,
}

/// First whitespace-delimited token of every non-blank line, `#` comments stripped.
pub fn first_column(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|line| {
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            };
            line.split_whitespace().next()
        })
        .collect()
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Missing {
        path: path.to_path_buf(),
        source,
    })
}

fn number(column: &[&str], path: &Path, (row, name): (usize, &'static str)) -> Result<f64> {
    let token = column[row];
    token.parse::<f64>().map_err(|_| Error::NotNumeric {
        path: path.to_path_buf(),
        row,
        name,
        token: token.to_string(),
    })
}

fn require_rows(column: &[&str], path: &Path, needed: usize) -> Result<()> {
    if column.len() < needed {
        return Err(Error::Truncated {
            path: path.to_path_buf(),
            needed,
            found: column.len(),
        });
    }
    Ok(())
}

/// Truncate a stored count to an integer, as the solver writes counts as plain numbers.
fn count(value: f64, path: &Path, name: &'static str, min: f64) -> Result<usize> {
    if !value.is_finite() || value.trunc() < min {
        return Err(Error::InvalidValue {
            path: path.to_path_buf(),
            name,
            value,
            reason: if min > 0.0 { "must be positive" } else { "must not be negative" },
        });
    }
    Ok(value.trunc() as usize)
}

fn spacing(value: f64, path: &Path, name: &'static str) -> Result<f64> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(Error::InvalidValue {
            path: path.to_path_buf(),
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

pub fn parse_grid_meta(text: &str, path: &Path) -> Result<GridMeta> {
    let column = first_column(text);
    require_rows(&column, path, GRID_ROWS[5].0 + 1)?;

    let mut values = [0.0; 6];
    for (slot, &entry) in values.iter_mut().zip(GRID_ROWS.iter()) {
        *slot = number(&column, path, entry)?;
    }
    let [mx, my, xlow, ylow, dx, dy] = values;

    Ok(GridMeta {
        mx: count(mx, path, "mx", 1.0)?,
        my: count(my, path, "my", 1.0)?,
        xlow,
        ylow,
        dx: spacing(dx, path, "dx")?,
        dy: spacing(dy, path, "dy")?,
    })
}

pub fn parse_run_meta(text: &str, path: &Path) -> Result<RunMeta> {
    let column = first_column(text);
    require_rows(&column, path, STEPS_ROW.0 + 1)?;
    let steps = number(&column, path, STEPS_ROW)?;
    Ok(RunMeta {
        steps: count(steps, path, STEPS_ROW.1, 0.0)?,
    })
}

pub fn load_grid_meta(path: &Path) -> Result<GridMeta> {
    parse_grid_meta(&read_text(path)?, path)
}

pub fn load_run_meta(path: &Path) -> Result<RunMeta> {
    parse_run_meta(&read_text(path)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "\
1                 grid_number
1                 AMR_level
50                mx
40                my
0.000000E+00      xlow
0.000000E+00      ylow
2.000000E-02      dx
2.500000E-02      dy

0.1 0.2 0.3 0.4
";

    const CLAW_DATA: &str = "\
########################################################
### DO NOT EDIT THIS FILE:  GENERATED AUTOMATICALLY ####
########################################################

2                    =: num_dim
0.000000e+00  0.000000e+00 =: lower
1.000000e+00  1.000000e+00 =: upper
50 50                =: num_cells

4                    =: num_eqn
1                    =: num_waves
0                    =: num_aux

0.000000             =: t0
1                    =: output_style
120                  =: num_output_times
";

    #[test]
    fn test_first_column_skips_blank_and_comment_lines() {
        let col = first_column("# title\n\n  7  seven\n8 # eight\n   \n9\n");
        assert_eq!(col, vec!["7", "8", "9"]);
    }

    #[test]
    fn test_parse_grid_meta() {
        let meta = parse_grid_meta(HEADER, Path::new("fort.q0000")).unwrap();
        assert_eq!(meta.mx, 50);
        assert_eq!(meta.my, 40);
        assert_eq!(meta.xlow, 0.0);
        assert_eq!(meta.ylow, 0.0);
        assert!((meta.dx - 0.02).abs() < 1e-15);
        assert!((meta.dy - 0.025).abs() < 1e-15);
    }

    #[test]
    fn test_parse_run_meta_reads_tenth_row() {
        let run = parse_run_meta(CLAW_DATA, Path::new("claw.data")).unwrap();
        assert_eq!(run.steps, 120);
    }

    #[test]
    fn test_grid_meta_too_short_is_config_error() {
        let text = "1\n1\n4\n4\n0.0\n0.0\n0.25\n";
        let err = parse_grid_meta(text, Path::new("fort.q0000")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(
            matches!(err, Error::Truncated { needed: 8, found: 7, .. }),
            "expected Truncated, got {err:?}"
        );
    }

    #[test]
    fn test_run_meta_too_short_is_config_error() {
        let text = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let err = parse_run_meta(text, Path::new("claw.data")).unwrap_err();
        assert!(matches!(err, Error::Truncated { needed: 10, found: 9, .. }));
    }

    #[test]
    fn test_non_numeric_extracted_value() {
        let text = HEADER.replace("2.000000E-02", "abc");
        let err = parse_grid_meta(&text, Path::new("fort.q0000")).unwrap_err();
        match err {
            Error::NotNumeric { row, name, token, .. } => {
                assert_eq!(row, 6);
                assert_eq!(name, "dx");
                assert_eq!(token, "abc");
            }
            other => panic!("expected NotNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_unused_row_is_ignored() {
        let text = HEADER.replacen("1                 grid_number", "grid  number", 1);
        assert!(parse_grid_meta(&text, Path::new("fort.q0000")).is_ok());
    }

    #[test]
    fn test_zero_cells_rejected() {
        let text = HEADER.replace("50                mx", "0                 mx");
        let err = parse_grid_meta(&text, Path::new("fort.q0000")).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { name: "mx", .. }), "got {err:?}");
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let text = HEADER.replace("2.500000E-02", "-2.5E-02");
        let err = parse_grid_meta(&text, Path::new("fort.q0000")).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { name: "dy", .. }), "got {err:?}");
    }

    #[test]
    fn test_float_cell_count_truncates() {
        let text = HEADER.replace("50                mx", "50.0              mx");
        let meta = parse_grid_meta(&text, Path::new("fort.q0000")).unwrap();
        assert_eq!(meta.mx, 50);
    }

    #[test]
    fn test_missing_file() {
        let err = load_grid_meta(Path::new("no/such/fort.q0000")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, Error::Missing { .. }));
    }
}
