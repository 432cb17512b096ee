//! Two-node beam kernels: local stiffness, equivalent nodal forces,
//! static condensation of hinged ends and the elastic line.
//!
//! Local DOF order is `[u1, v1, w1, θx1, θy1, θz1, u2, v2, w2, θx2, θy2, θz2]`.
//! Bending in the x-y plane uses Iz with θz = dv/dx, bending in the x-z plane
//! uses Iy with θy = -dw/dx.

use nalgebra::DMatrix;

use super::{Mat, Mat12, Polynomial, Vec12};
use crate::elements::ElementProperties;
use crate::error::{FrameError, FrameResult};
use crate::loads::DistributedLoad;

/// Relative diagonal below which a released DOF counts as stiffness free
const ZERO_STIFFNESS: f64 = 1e-14;

/// Local stiffness of a beam rigidly connected at both ends
pub fn beam_stiffness_rigid(p: &ElementProperties, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = p.e * p.a / l;
    let gj_l = p.g * p.j / l;

    let eiy_l3 = p.e * p.iy / l3;
    let eiy_l2 = p.e * p.iy / l2;
    let eiy_l = p.e * p.iy / l;

    let eiz_l3 = p.e * p.iz / l3;
    let eiz_l2 = p.e * p.iz / l2;
    let eiz_l = p.e * p.iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Local stiffness of a beam hinged at both ends: axial terms only
pub fn beam_stiffness_truss(p: &ElementProperties, length: f64) -> Mat12 {
    let ea_l = p.e * p.a / length;
    let mut k = Mat12::zeros();
    k[(0, 0)] = ea_l;
    k[(0, 6)] = -ea_l;
    k[(6, 0)] = -ea_l;
    k[(6, 6)] = ea_l;
    k
}

/// Local stiffness of a beam hinged at its start node.
///
/// Start rotations carry no stiffness, and neither does torsion.
pub fn beam_stiffness_hinged_start(p: &ElementProperties, length: f64) -> Mat12 {
    let l = length;
    let ea_l = p.e * p.a / l;

    let y1 = 3.0 * p.e * p.iz / (l * l * l);
    let y2 = 3.0 * p.e * p.iz / (l * l);
    let y3 = 3.0 * p.e * p.iz / l;

    let z1 = 3.0 * p.e * p.iy / (l * l * l);
    let z2 = 3.0 * p.e * p.iy / (l * l);
    let z3 = 3.0 * p.e * p.iy / l;

    #[rustfmt::skip]
    let data = [
        ea_l,  0.0,  0.0,  0.0, 0.0, 0.0, -ea_l, 0.0,  0.0,  0.0, 0.0,  0.0,
        0.0,   y1,   0.0,  0.0, 0.0, 0.0, 0.0,   -y1,  0.0,  0.0, 0.0,  y2,
        0.0,   0.0,  z1,   0.0, 0.0, 0.0, 0.0,   0.0,  -z1,  0.0, -z2,  0.0,
        0.0,   0.0,  0.0,  0.0, 0.0, 0.0, 0.0,   0.0,  0.0,  0.0, 0.0,  0.0,
        0.0,   0.0,  0.0,  0.0, 0.0, 0.0, 0.0,   0.0,  0.0,  0.0, 0.0,  0.0,
        0.0,   0.0,  0.0,  0.0, 0.0, 0.0, 0.0,   0.0,  0.0,  0.0, 0.0,  0.0,
        -ea_l, 0.0,  0.0,  0.0, 0.0, 0.0, ea_l,  0.0,  0.0,  0.0, 0.0,  0.0,
        0.0,   -y1,  0.0,  0.0, 0.0, 0.0, 0.0,   y1,   0.0,  0.0, 0.0,  -y2,
        0.0,   0.0,  -z1,  0.0, 0.0, 0.0, 0.0,   0.0,  z1,   0.0, z2,   0.0,
        0.0,   0.0,  0.0,  0.0, 0.0, 0.0, 0.0,   0.0,  0.0,  0.0, 0.0,  0.0,
        0.0,   0.0,  -z2,  0.0, 0.0, 0.0, 0.0,   0.0,  z2,   0.0, z3,   0.0,
        0.0,   y2,   0.0,  0.0, 0.0, 0.0, 0.0,   -y2,  0.0,  0.0, 0.0,  y3,
    ];

    Mat12::from_row_slice(&data)
}

/// Local stiffness of a beam hinged at its end node.
///
/// End rotations carry no stiffness, and neither does torsion.
pub fn beam_stiffness_hinged_end(p: &ElementProperties, length: f64) -> Mat12 {
    let l = length;
    let ea_l = p.e * p.a / l;

    let y1 = 3.0 * p.e * p.iz / (l * l * l);
    let y2 = 3.0 * p.e * p.iz / (l * l);
    let y3 = 3.0 * p.e * p.iz / l;

    let z1 = 3.0 * p.e * p.iy / (l * l * l);
    let z2 = 3.0 * p.e * p.iy / (l * l);
    let z3 = 3.0 * p.e * p.iy / l;

    #[rustfmt::skip]
    let data = [
        ea_l,  0.0,  0.0,  0.0, 0.0,  0.0, -ea_l, 0.0,  0.0,  0.0, 0.0, 0.0,
        0.0,   y1,   0.0,  0.0, 0.0,  y2,  0.0,   -y1,  0.0,  0.0, 0.0, 0.0,
        0.0,   0.0,  z1,   0.0, -z2,  0.0, 0.0,   0.0,  -z1,  0.0, 0.0, 0.0,
        0.0,   0.0,  0.0,  0.0, 0.0,  0.0, 0.0,   0.0,  0.0,  0.0, 0.0, 0.0,
        0.0,   0.0,  -z2,  0.0, z3,   0.0, 0.0,   0.0,  z2,   0.0, 0.0, 0.0,
        0.0,   y2,   0.0,  0.0, 0.0,  y3,  0.0,   -y2,  0.0,  0.0, 0.0, 0.0,
        -ea_l, 0.0,  0.0,  0.0, 0.0,  0.0, ea_l,  0.0,  0.0,  0.0, 0.0, 0.0,
        0.0,   -y1,  0.0,  0.0, 0.0,  -y2, 0.0,   y1,   0.0,  0.0, 0.0, 0.0,
        0.0,   0.0,  -z1,  0.0, z2,   0.0, 0.0,   0.0,  z1,   0.0, 0.0, 0.0,
        0.0,   0.0,  0.0,  0.0, 0.0,  0.0, 0.0,   0.0,  0.0,  0.0, 0.0, 0.0,
        0.0,   0.0,  0.0,  0.0, 0.0,  0.0, 0.0,   0.0,  0.0,  0.0, 0.0, 0.0,
        0.0,   0.0,  0.0,  0.0, 0.0,  0.0, 0.0,   0.0,  0.0,  0.0, 0.0, 0.0,
    ];

    Mat12::from_row_slice(&data)
}

/// Pick the stiffness table matching the hinge flags
pub fn beam_local_stiffness(
    p: &ElementProperties,
    length: f64,
    start_hinged: bool,
    end_hinged: bool,
) -> Mat12 {
    match (start_hinged, end_hinged) {
        (false, false) => beam_stiffness_rigid(p, length),
        (true, false) => beam_stiffness_hinged_start(p, length),
        (false, true) => beam_stiffness_hinged_end(p, length),
        (true, true) => beam_stiffness_truss(p, length),
    }
}

/// Local DOFs condensed out of a beam with the given hinges.
///
/// A start hinge frees all three start rotations. An end hinge frees the two
/// end bending rotations, plus end torsion when the start is not already
/// hinged (one torsion release is enough to make the member torsion free).
pub fn released_dofs(start_hinged: bool, end_hinged: bool) -> Vec<usize> {
    let mut dofs = Vec::new();
    if start_hinged {
        dofs.extend([3, 4, 5]);
    }
    if end_hinged {
        if !start_hinged {
            dofs.push(9);
        }
        dofs.extend([10, 11]);
    }
    dofs
}

/// Equivalent nodal forces of a linearly varying line load on a rigid beam.
///
/// Work-equivalent loads: positive with the load direction, so they add to
/// the applied nodal loads on the right-hand side.
pub fn beam_equivalent_forces(load: &DistributedLoad, length: f64) -> Vec12 {
    let l = length;
    let l2 = l * l;
    let s = load.start;
    let e = load.end;

    let mut f = Vec12::zeros();

    // Axial
    f[0] = (s[0] / 3.0 + e[0] / 6.0) * l;
    f[6] = (s[0] / 6.0 + e[0] / 3.0) * l;

    // Local y
    f[1] = (7.0 * s[1] / 20.0 + 3.0 * e[1] / 20.0) * l;
    f[7] = (3.0 * s[1] / 20.0 + 7.0 * e[1] / 20.0) * l;
    f[5] = (s[1] / 20.0 + e[1] / 30.0) * l2;
    f[11] = -(s[1] / 30.0 + e[1] / 20.0) * l2;

    // Local z
    f[2] = (7.0 * s[2] / 20.0 + 3.0 * e[2] / 20.0) * l;
    f[8] = (3.0 * s[2] / 20.0 + 7.0 * e[2] / 20.0) * l;
    f[4] = -(s[2] / 20.0 + e[2] / 30.0) * l2;
    f[10] = (s[2] / 30.0 + e[2] / 20.0) * l2;

    f
}

/// Rigid stiffness for condensing equivalent forces.
///
/// The force correction `k12 · k22⁻¹` only depends on stiffness ratios within
/// one bending plane, so zero section constants are replaced by one. Hinged
/// members without bending stiffness then still pass their fixed-end moments
/// on as end shears.
pub fn load_transfer_stiffness(p: &ElementProperties, length: f64) -> Mat12 {
    let unit = |v: f64| if v > 0.0 { v } else { 1.0 };
    let reference = ElementProperties {
        e: unit(p.e),
        g: unit(p.g),
        a: unit(p.a),
        j: unit(p.j),
        iy: unit(p.iy),
        iz: unit(p.iz),
    };
    beam_stiffness_rigid(&reference, length)
}

fn kept_dofs(released: &[usize]) -> Vec<usize> {
    (0..12).filter(|i| !released.contains(i)).collect()
}

fn sub_matrix(k: &Mat12, rows: &[usize], cols: &[usize]) -> Mat {
    DMatrix::from_fn(rows.len(), cols.len(), |i, j| k[(rows[i], cols[j])])
}

/// Released DOFs that carry stiffness. A released DOF with a zero diagonal
/// (J = 0 for torsion, I = 0 for bending) has an all-zero row and column in
/// the positive semidefinite `k`, so leaving it out of `k22` is the
/// pseudo-inverse of the full block.
fn stiff_released(k: &Mat12, released: &[usize]) -> Vec<usize> {
    let scale = k.amax();
    released
        .iter()
        .copied()
        .filter(|&r| k[(r, r)].abs() > ZERO_STIFFNESS * scale)
        .collect()
}

fn released_block_inverse(k: &Mat12, released: &[usize]) -> FrameResult<Mat> {
    sub_matrix(k, released, released)
        .try_inverse()
        .ok_or_else(|| FrameError::MathError("released block of beam stiffness is singular".into()))
}

/// Static condensation `k11 - k12 · k22⁻¹ · k21` over the released DOFs.
///
/// Rows and columns of released DOFs are zero in the result.
pub fn condense_stiffness(k: &Mat12, released: &[usize]) -> FrameResult<Mat12> {
    if released.is_empty() {
        return Ok(*k);
    }
    let kept = kept_dofs(released);
    let active = stiff_released(k, released);

    let mut k_condensed = sub_matrix(k, &kept, &kept);
    if !active.is_empty() {
        let k12 = sub_matrix(k, &kept, &active);
        let k21 = sub_matrix(k, &active, &kept);
        let k22_inv = released_block_inverse(k, &active)?;
        k_condensed -= &k12 * &k22_inv * &k21;
    }

    let mut result = Mat12::zeros();
    for (i, &ki) in kept.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            result[(ki, kj)] = k_condensed[(i, j)];
        }
    }
    Ok(result)
}

/// Condensed equivalent forces `f1 - k12 · k22⁻¹ · f2`, zero on released DOFs
pub fn condense_forces(f: &Vec12, k: &Mat12, released: &[usize]) -> FrameResult<Vec12> {
    if released.is_empty() {
        return Ok(*f);
    }
    let kept = kept_dofs(released);
    let active = stiff_released(k, released);

    let mut result = Vec12::zeros();
    for &ki in &kept {
        result[ki] = f[ki];
    }
    if active.is_empty() || active.iter().all(|&r| f[r] == 0.0) {
        return Ok(result);
    }

    let k12 = sub_matrix(k, &kept, &active);
    let k22_inv = released_block_inverse(k, &active)?;
    let f2 = DMatrix::from_fn(active.len(), 1, |i, _| f[active[i]]);
    let correction = &k12 * &k22_inv * &f2;

    for (i, &ki) in kept.iter().enumerate() {
        result[ki] -= correction[(i, 0)];
    }
    Ok(result)
}

/// Fill in the released DOFs of a local displacement vector.
///
/// The released entries follow from the unloaded-hinge condition
/// `k21 · d1 + k22 · d2 = f2`, using the rigid stiffness `k` and the rigid
/// equivalent forces `f`. Released DOFs without stiffness keep the nodal value.
pub fn recover_released(d: &Vec12, f: &Vec12, k: &Mat12, released: &[usize]) -> FrameResult<Vec12> {
    let active = stiff_released(k, released);
    if active.is_empty() {
        return Ok(*d);
    }
    let kept = kept_dofs(released);

    let k21 = sub_matrix(k, &active, &kept);
    let k22_inv = released_block_inverse(k, &active)?;
    let d1 = DMatrix::from_fn(kept.len(), 1, |i, _| d[kept[i]]);
    let f2 = DMatrix::from_fn(active.len(), 1, |i, _| f[active[i]]);

    let d2 = &k22_inv * (f2 - &k21 * &d1);

    let mut result = *d;
    for (i, &ri) in active.iter().enumerate() {
        result[ri] = d2[(i, 0)];
    }
    Ok(result)
}

/// End conditions and load of one bending plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendingPlane {
    /// Deflection at x = 0
    pub w0: f64,
    /// Deflection at x = L
    pub w_l: f64,
    /// Slope dw/dx at x = 0
    pub phi0: f64,
    /// Slope dw/dx at x = L
    pub phi_l: f64,
    /// Load density at x = 0
    pub q0: f64,
    /// Load density gradient
    pub dq: f64,
    /// Bending stiffness EI
    pub ei: f64,
}

/// Deflection polynomial solving `EI w'''' = q0 + dq·x` with the plane's
/// end deflections and slopes. Always six coefficients.
pub fn elastic_line(plane: &BendingPlane, length: f64) -> Polynomial {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let c0 = plane.w0;
    let c1 = plane.phi0;
    let (c4, c5) = if plane.ei != 0.0 {
        (plane.q0 / (24.0 * plane.ei), plane.dq / (120.0 * plane.ei))
    } else {
        (0.0, 0.0)
    };

    let a = plane.w_l - c0 - c1 * l - c4 * l2 * l2 - c5 * l2 * l3;
    let b = plane.phi_l - c1 - 4.0 * c4 * l3 - 5.0 * c5 * l2 * l2;

    let c3 = b / l2 - 2.0 * a / l3;
    let c2 = 3.0 * a / l2 - b / l;

    Polynomial::new(vec![c0, c1, c2, c3, c4, c5])
}
