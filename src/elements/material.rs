//! Material properties

use serde::{Deserialize, Serialize};

/// Linear elastic isotropic material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    e: f64,
    /// Poisson's ratio
    nu: f64,
    /// Shear modulus, derived from E and nu
    g: f64,
}

impl Material {
    /// Create a material from Young's modulus and Poisson's ratio.
    /// G is calculated as E / (2 + 2 * nu)
    pub fn new(e: f64, nu: f64) -> Self {
        Self {
            e,
            nu,
            g: e / (2.0 + 2.0 * nu),
        }
    }

    /// Young's modulus
    pub fn e(&self) -> f64 {
        self.e
    }

    /// Poisson's ratio
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Shear modulus
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Structural steel, E = 200 GPa, nu = 0.3
    pub fn steel() -> Self {
        Self::new(200e9, 0.3)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
