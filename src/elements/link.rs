//! Boundary links: which of a node's six DOFs are held in place

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Global translation axis, used by the directional link presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// DOF index of the translation along this axis
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(FrameError::UnknownDirection(s.to_string())),
        }
    }
}

/// Restriction mask over the six DOFs of a node.
///
/// Bit `r` set means DOF `r` (DX, DY, DZ, RX, RY, RZ) is blocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    mask: u8,
}

impl Link {
    const ALL: u8 = 0b11_1111;
    const TRANSLATIONS: u8 = 0b00_0111;

    /// No restrictions
    pub fn free() -> Self {
        Self::default()
    }

    /// Blocks all six DOFs
    pub fn mount() -> Self {
        Self { mask: Self::ALL }
    }

    /// Blocks the three translations, rotations stay free
    pub fn fixed_support() -> Self {
        Self {
            mask: Self::TRANSLATIONS,
        }
    }

    /// Blocks a single translation along `direction`
    pub fn support(direction: Axis) -> Self {
        Self {
            mask: 1 << direction.index(),
        }
    }

    /// Blocks the two translations that are not along `direction`
    pub fn ring(direction: Axis) -> Self {
        Self {
            mask: Self::TRANSLATIONS & !(1 << direction.index()),
        }
    }

    /// Generic link from a six-entry restriction vector of 0/1 values
    pub fn from_vector(restrictions: &[u8]) -> Result<Self, FrameError> {
        if restrictions.len() != 6 {
            return Err(FrameError::InvalidInput(format!(
                "link vector needs 6 entries, got {}",
                restrictions.len()
            )));
        }
        let mut mask = 0;
        for (dof, &flag) in restrictions.iter().enumerate() {
            match flag {
                0 => {}
                1 => mask |= 1 << dof,
                other => {
                    return Err(FrameError::InvalidInput(format!(
                        "link vector entries must be 0 or 1, got {other}"
                    )))
                }
            }
        }
        Ok(Self { mask })
    }

    /// Generic link from explicit flags
    pub fn with_restraints(restrictions: [bool; 6]) -> Self {
        let mask = restrictions
            .iter()
            .enumerate()
            .fold(0, |acc, (dof, &blocked)| if blocked { acc | 1 << dof } else { acc });
        Self { mask }
    }

    /// Whether DOF `dof` (0-5) is blocked
    pub fn is_restricted(&self, dof: usize) -> bool {
        dof < 6 && self.mask & (1 << dof) != 0
    }

    /// Restriction flags as an array [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [bool; 6] {
        std::array::from_fn(|dof| self.is_restricted(dof))
    }

    /// List of restrained DOF indices (0-5)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        (0..6).filter(|&dof| self.is_restricted(dof)).collect()
    }

    /// List of free DOF indices (0-5)
    pub fn free_dofs(&self) -> Vec<usize> {
        (0..6).filter(|&dof| !self.is_restricted(dof)).collect()
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.mask != 0
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.mask.count_ones() as usize
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for blocked in self.as_array() {
            f.write_str(if blocked { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount() {
        let link = Link::mount();
        assert_eq!(link.num_restrained(), 6);
        assert!(link.free_dofs().is_empty());
    }

    #[test]
    fn test_fixed_support() {
        let link = Link::fixed_support();
        assert_eq!(link.restrained_dofs(), vec![0, 1, 2]);
        assert_eq!(link.to_string(), "111000");
    }

    #[test]
    fn test_directional_presets() {
        assert_eq!(Link::support(Axis::Y).restrained_dofs(), vec![1]);
        assert_eq!(Link::ring(Axis::Y).restrained_dofs(), vec![0, 2]);
        assert_eq!(Link::ring(Axis::X).restrained_dofs(), vec![1, 2]);
    }

    #[test]
    fn test_from_vector() {
        let link = Link::from_vector(&[1, 0, 1, 0, 0, 1]).unwrap();
        assert_eq!(link.restrained_dofs(), vec![0, 2, 5]);
        assert_eq!(link, Link::with_restraints([true, false, true, false, false, true]));

        assert!(Link::from_vector(&[1, 0, 1]).is_err());
        assert!(Link::from_vector(&[2, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("Z".parse::<Axis>().unwrap(), Axis::Z);
        assert!(matches!("w".parse::<Axis>(), Err(FrameError::UnknownDirection(_))));
    }
}
