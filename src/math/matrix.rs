use rand::Rng;
use std::f64::consts::PI;

use crate::error::{check_dim, NnError, Result};

/// Dense row-major matrix of `f64`.
///
/// Dimensions are carried explicitly and every shape-sensitive operation
/// checks them, returning `NnError::DimensionMismatch` instead of panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from rows; every row must have the same length.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        for row in &data {
            check_dim(cols, row.len())?;
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal_with<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// He initialization: N(0, sqrt(2 / cols)), `cols` being the fan-in.
    ///
    /// Suited to ReLU-family layers, which zero half of their inputs on average.
    pub fn he_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal_with(rows, cols, (2.0 / cols.max(1) as f64).sqrt(), rng)
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / cols)), `cols` being the fan-in.
    pub fn xavier_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal_with(rows, cols, (1.0 / cols.max(1) as f64).sqrt(), rng)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// `self · x` for a column vector `x` of length `cols`.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_dim(self.cols, x.len())?;
        Ok(self.data.iter()
            .map(|row| row.iter().zip(x).map(|(w, v)| w * v).sum())
            .collect())
    }

    /// `selfᵀ · y` for a column vector `y` of length `rows`.
    pub fn transpose_mul_vec(&self, y: &[f64]) -> Result<Vec<f64>> {
        check_dim(self.rows, y.len())?;
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(y) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += w * scale;
            }
        }
        Ok(res)
    }

    /// Standard matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        check_dim(self.cols, rhs.rows)?;

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Outer product `a · bᵀ`, shape `a.len() × b.len()`.
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        Matrix {
            rows: a.len(),
            cols: b.len(),
            data: a.iter().map(|&x| b.iter().map(|&y| x * y).collect()).collect(),
        }
    }

    /// Adds `bias` to every row in place.
    pub fn add_row_vector(&mut self, bias: &[f64]) -> Result<()> {
        check_dim(self.cols, bias.len())?;
        for row in &mut self.data {
            for (x, b) in row.iter_mut().zip(bias) {
                *x += b;
            }
        }
        Ok(())
    }

    /// `self += scale * other`, element-wise.
    pub fn scaled_add(&mut self, other: &Matrix, scale: f64) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(NnError::DimensionMismatch {
                expected: self.rows * self.cols,
                got: other.rows * other.cols,
            });
        }
        for (row, other_row) in self.data.iter_mut().zip(&other.data) {
            for (x, y) in row.iter_mut().zip(other_row) {
                *x += scale * y;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }
}
