use std::iter::Sum;
use std::ops::AddAssign;

/// Compressed sparse row matrix. Absent entries are implicitly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy> CsrMatrix<T> {
    /// Build from one entry list per row. Entries are sorted by column here;
    /// each column must appear at most once per row.
    pub fn from_rows<I>(n_cols: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<(usize, T)>>,
    {
        let mut indptr = vec![0];
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for mut row in rows {
            row.sort_unstable_by_key(|(col, _)| *col);
            for (col, value) in row {
                debug_assert!(col < n_cols, "column {col} out of bounds");
                indices.push(col);
                values.push(value);
            }
            indptr.push(indices.len());
        }
        Self { n_rows: indptr.len() - 1, n_cols, indptr, indices, values }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(column, value)` pairs of a row, ascending by column.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let (start, end) = if r < self.n_rows { (self.indptr[r], self.indptr[r + 1]) } else { (0, 0) };
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Same sparsity pattern, each value mapped through `f(column, value)`.
    pub fn map_values<U, F>(&self, mut f: F) -> CsrMatrix<U>
    where
        F: FnMut(usize, T) -> U,
    {
        CsrMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            values: self.indices.iter().zip(&self.values).map(|(c, v)| f(*c, *v)).collect(),
        }
    }

    pub fn get(&self, r: usize, c: usize) -> T
    where
        T: Default,
    {
        if r >= self.n_rows {
            return T::default();
        }
        let (start, end) = (self.indptr[r], self.indptr[r + 1]);
        match self.indices[start..end].binary_search(&c) {
            Ok(pos) => self.values[start + pos],
            Err(_) => T::default(),
        }
    }

    pub fn row_sum(&self, r: usize) -> T
    where
        T: Sum<T>,
    {
        self.row(r).map(|(_, v)| v).sum()
    }

    pub fn column_sums(&self) -> Vec<T>
    where
        T: Default + AddAssign,
    {
        let mut sums = vec![T::default(); self.n_cols];
        for (c, v) in self.indices.iter().zip(&self.values) {
            sums[*c] += *v;
        }
        sums
    }
}

impl CsrMatrix<f64> {
    /// Euclidean norm of a row.
    pub fn row_norm(&self, r: usize) -> f64 {
        self.row(r).map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Dot product of a row with a dense vector of length `n_cols`.
    pub fn row_dot(&self, r: usize, dense: &[f64]) -> f64 {
        self.row(r)
            .map(|(c, v)| v * dense.get(c).copied().unwrap_or(0.0))
            .sum()
    }
}
