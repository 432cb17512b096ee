//! Polynomials along a member axis

use serde::{Deserialize, Serialize};

/// Polynomial in the local coordinate `x`, coefficients in ascending order
/// (`coefficients[i]` multiplies `x^i`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of coefficients minus one; zero for an empty polynomial
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate with Horner's scheme
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// First derivative; a constant differentiates to an empty polynomial
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.coefficients.iter().map(|c| c * factor).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eval() {
        // 1 + 2x + 3x^2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(p.eval(0.0), 1.0);
        assert_relative_eq!(p.eval(2.0), 17.0);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn test_derivative() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.derivative().coefficients(), &[2.0, 6.0, 12.0]);
        assert!(Polynomial::new(vec![5.0]).derivative().coefficients().is_empty());
        assert_eq!(Polynomial::default().eval(3.0), 0.0);
    }

    #[test]
    fn test_serializes_as_array() {
        let p = Polynomial::new(vec![1.0, 0.5]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.0,0.5]");
    }
}
