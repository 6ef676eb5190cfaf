//! Named-column table over a sample-major `Array2<f64>`.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use super::DataError;

/// A table of `f64` columns addressed by name.
///
/// Storage is sample-major (`[n_rows, n_columns]`) so that a row can be
/// handed to a predictor without copying. Column order is preserved and
/// matches the order columns were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Frame {
    /// Create a frame from column names and a `[n_rows, n_columns]` array.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self, DataError> {
        if columns.len() != values.ncols() {
            return Err(DataError::ShapeMismatch {
                expected: columns.len(),
                got: values.ncols(),
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { columns, values })
    }

    /// Create a frame from `(name, values)` pairs of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, |(_, v)| v.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Array2::zeros((n_rows, columns.len()));

        for (j, (name, column)) in columns.into_iter().enumerate() {
            let name = name.into();
            if column.len() != n_rows {
                return Err(DataError::RaggedColumn {
                    column: name,
                    expected: n_rows,
                    got: column.len(),
                });
            }
            values.column_mut(j).assign(&ArrayView1::from(&column));
            names.push(name);
        }

        Self::new(names, values)
    }

    /// An empty frame with the given header.
    pub fn empty(columns: Vec<String>) -> Result<Self, DataError> {
        let n = columns.len();
        Self::new(columns, Array2::zeros((0, n)))
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// View of a single column by name.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>, DataError> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    /// Copy the named columns into a sample-major feature matrix.
    pub fn select(&self, names: &[&str]) -> Result<Array2<f64>, DataError> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.values.select(Axis(1), &indices))
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, name: impl Into<String>, column: ArrayView1<'_, f64>) -> Result<(), DataError> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if column.len() != self.n_rows() {
            return Err(DataError::RaggedColumn {
                column: name,
                expected: self.n_rows(),
                got: column.len(),
            });
        }
        self.values.push_column(column)?;
        self.columns.push(name);
        Ok(())
    }

    /// All values, `[n_rows, n_columns]`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Frame {
        Frame::from_columns(vec![
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![4.0, 5.0, 6.0]),
            ("c", vec![7.0, 8.0, 9.0]),
        ])
        .unwrap()
    }

    #[test]
    fn from_columns_is_sample_major() {
        let frame = sample();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_columns(), 3);
        assert_eq!(frame.values().row(1).to_vec(), vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn select_reorders_columns() {
        let frame = sample();
        let x = frame.select(&["c", "a"]).unwrap();
        assert_eq!(x, array![[7.0, 1.0], [8.0, 2.0], [9.0, 3.0]]);
    }

    #[test]
    fn missing_column_is_reported() {
        let frame = sample();
        assert!(matches!(frame.column("z"), Err(DataError::MissingColumn(name)) if name == "z"));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let result = Frame::from_columns(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(matches!(result, Err(DataError::RaggedColumn { .. })));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let result = Frame::from_columns(vec![("a", vec![1.0]), ("a", vec![2.0])]);
        assert!(matches!(result, Err(DataError::DuplicateColumn(_))));
    }

    #[test]
    fn push_column_appends() {
        let mut frame = sample();
        frame.push_column("d", ArrayView1::from(&[0.0, 0.5, 1.0])).unwrap();
        assert_eq!(frame.column_names().last().map(String::as_str), Some("d"));
        assert_eq!(frame.column("d").unwrap().to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn empty_frame_keeps_header() {
        let frame = Frame::empty(vec!["x1".into(), "x2".into()]).unwrap();
        assert_eq!(frame.n_rows(), 0);
        assert_eq!(frame.column_names(), &["x1".to_string(), "x2".to_string()]);
    }
}
