//! Section properties for frame elements

use serde::{Deserialize, Serialize};

use super::Material;

/// Cross-section properties for bar elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area
    pub area: f64,
    /// Moment of inertia about local y-axis
    pub iy: f64,
    /// Moment of inertia about local z-axis
    pub iz: f64,
    /// Torsional (polar) moment of inertia
    pub j: f64,
}

impl Section {
    /// Create a section with all properties given directly
    pub fn new(area: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { area, iy, iz, j }
    }

    /// Create a solid rectangular section.
    ///
    /// `width` runs along local y and `height` along local z, so
    /// Iy = h·w³/12 and Iz = w·h³/12. The polar inertia is Iy + Iz.
    pub fn rectangular(width: f64, height: f64) -> Self {
        let iy = height * width.powi(3) / 12.0;
        let iz = width * height.powi(3) / 12.0;
        Self {
            area: width * height,
            iy,
            iz,
            j: iy + iz,
        }
    }

    /// Create a solid circular section
    pub fn circular(radius: f64) -> Self {
        let i = std::f64::consts::PI * radius.powi(4) / 4.0;
        Self {
            area: std::f64::consts::PI * radius.powi(2),
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::rectangular(0.2, 0.2)
    }
}

/// The six stiffness scalars an element needs: E, G, A, J, Iy, Iz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementProperties {
    pub e: f64,
    pub g: f64,
    pub a: f64,
    pub j: f64,
    pub iy: f64,
    pub iz: f64,
}

impl ElementProperties {
    /// Combine a material and a section
    pub fn new(material: &Material, section: &Section) -> Self {
        Self {
            e: material.e(),
            g: material.g(),
            a: section.area,
            j: section.j,
            iy: section.iy,
            iz: section.iz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        let expected_iy = 0.5 * 0.3_f64.powi(3) / 12.0;
        let expected_iz = 0.3 * 0.5_f64.powi(3) / 12.0;

        assert!((section.area - 0.15).abs() < 1e-12);
        assert!((section.iy - expected_iy).abs() < 1e-12);
        assert!((section.iz - expected_iz).abs() < 1e-12);
        assert!((section.j - (expected_iy + expected_iz)).abs() < 1e-12);
    }

    #[test]
    fn test_unit_square() {
        let section = Section::rectangular(1.0, 1.0);
        assert!((section.iz - 1.0 / 12.0).abs() < 1e-15);
        assert!((section.j - 1.0 / 6.0).abs() < 1e-15);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.25);
        let expected_a = std::f64::consts::PI * 0.0625;

        assert!((section.area - expected_a).abs() < 1e-12);
        assert!((section.iy - section.iz).abs() < 1e-15);
        assert!((section.j - 2.0 * section.iy).abs() < 1e-15);
    }

    #[test]
    fn test_properties_from_parts() {
        let props = ElementProperties::new(&Material::new(1.0, 1.0), &Section::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(props.g, 0.25);
        assert_eq!(props.a, 2.0);
        assert_eq!(props.iz, 4.0);
    }
}
