//! natural cubic spline through tabulated points

use crate::error::{DpError, Result};

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// second derivatives at the knots
    m: Vec<f64>,
}

impl CubicSpline {
    /// `x` has to be strictly increasing and at least two points long
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<CubicSpline> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(DpError::InvalidInput(format!(
                "spline needs two or more points with matching lengths, got {} and {}",
                x.len(),
                y.len()
            )));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(DpError::InvalidInput(
                "spline abscissae must be strictly increasing".to_string(),
            ));
        }
        let m = second_derivatives(&x, &y);
        Ok(CubicSpline { x, y, m })
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// value at `x`, `None` outside of the tabulated range
    pub fn eval(&self, x: f64) -> Option<f64> {
        if !(self.x_min()..=self.x_max()).contains(&x) {
            return None;
        }
        let n = self.x.len();
        let i = self.x.partition_point(|&xi| xi <= x).clamp(1, n - 1) - 1;
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - x) / h;
        let b = (x - self.x[i]) / h;
        let y = a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0;
        Some(y)
    }
}

/// tridiagonal solve for the knot curvatures with zero curvature at both ends
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        let a = h0 / 6.0;
        let b = (h0 + h1) / 3.0;
        let c = h1 / 6.0;
        let d = (y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0;
        let denom = b - a * c_prime[i - 1];
        c_prime[i] = c / denom;
        d_prime[i] = (d - a * d_prime[i - 1]) / denom;
    }
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}
