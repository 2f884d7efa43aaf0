//! Loading incidence matrices from comma-separated text.
//!
//! One row per patch, one column per lamp, no header. Blank lines are
//! ignored and fields may carry surrounding whitespace.

use std::fs;
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::{DesignError, Result};

/// Read a matrix file.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<DMatrix<f64>> {
    let text = fs::read_to_string(path.as_ref())?;
    let a = parse_matrix(&text)?;
    log::debug!(
        "loaded {}x{} matrix from {}",
        a.nrows(),
        a.ncols(),
        path.as_ref().display()
    );
    Ok(a)
}

/// Parse comma-separated, non-negative values into a matrix.
pub fn parse_matrix(text: &str) -> Result<DMatrix<f64>> {
    let mut values = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let start = values.len();
        for field in line.split(',') {
            let field = field.trim();
            let v: f64 = field.parse().map_err(|_| DesignError::Parse {
                line: line_no,
                message: format!("invalid number {field:?}"),
            })?;
            if !(v.is_finite() && v >= 0.0) {
                return Err(DesignError::Parse {
                    line: line_no,
                    message: format!("entry {v} must be finite and non-negative"),
                });
            }
            values.push(v);
        }

        let width = values.len() - start;
        match ncols {
            None => ncols = Some(width),
            Some(n) if n != width => {
                return Err(DesignError::Parse {
                    line: line_no,
                    message: format!("expected {n} columns, found {width}"),
                })
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.ok_or_else(|| DesignError::Parse {
        line: 0,
        message: "no data rows".into(),
    })?;
    Ok(DMatrix::from_row_slice(nrows, ncols, &values))
}

/// Format a matrix as comma-separated text, one row per line.
pub fn format_matrix(a: &DMatrix<f64>) -> String {
    let mut out = String::new();
    for row in a.row_iter() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let a = parse_matrix("0.1, 0.2,0.3\n\n 1,2,3 \n").unwrap();
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(a[(0, 1)], 0.2);
        assert_eq!(a[(1, 2)], 3.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_matrix("1,2\n3\n").unwrap_err();
        match err {
            DesignError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected 2 columns"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_negative_and_garbage_rejected() {
        assert!(matches!(
            parse_matrix("1,-2\n"),
            Err(DesignError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_matrix("1,2\n1,x\n"),
            Err(DesignError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_matrix("1,inf\n"),
            Err(DesignError::Parse { line: 1, .. })
        ));
        assert!(parse_matrix("\n \n").is_err());
    }

    #[test]
    fn test_format_parses_back() {
        let a = DMatrix::from_row_slice(2, 2, &[0.25, 1.0, 0.0, 3.5]);
        let text = format_matrix(&a);
        assert_eq!(text, "0.25,1\n0,3.5\n");
        assert_eq!(parse_matrix(&text).unwrap(), a);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_matrix("/nonexistent/illumopt/matrix.csv").unwrap_err();
        assert!(matches!(err, DesignError::Io(_)));
    }
}
