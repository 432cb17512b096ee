//! Mathematical kernels for the direct stiffness method

pub mod beam;
pub mod polynomial;
pub mod solver;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

pub use beam::{
    beam_equivalent_forces, beam_local_stiffness, beam_stiffness_hinged_end,
    beam_stiffness_hinged_start, beam_stiffness_rigid, beam_stiffness_truss,
    condense_forces, condense_stiffness, elastic_line, load_transfer_stiffness, recover_released,
    released_dofs, BendingPlane,
};
pub use polynomial::Polynomial;
pub use solver::{solver_for, CholeskySolver, LinearSolver, LuSolver};

pub type Mat = DMatrix<f64>;
pub type Vector = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for two-node element stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for two-node element forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// DOFs carried by every node
pub const DOFS_PER_NODE: usize = 6;

/// Below this |local x × member axis| the rotation axis is treated as undefined
const AXIS_EPS: f64 = 1e-12;

/// Global DOF indices of an element, in node order, six per node
/// (x, y, z, rx, ry, rz).
pub fn address_table(node_indices: &[usize]) -> Vec<usize> {
    node_indices
        .iter()
        .flat_map(|&node| (0..DOFS_PER_NODE).map(move |r| node * DOFS_PER_NODE + r))
        .collect()
}

/// 3x3 rotation taking the local x-axis onto the start→end direction.
///
/// Built from a quaternion with axis `x × d` and angle `acos(x · d)`, so the
/// rotation is the minimal one and stays defined for vertical members.
/// Columns of the result are the local axes expressed in global coordinates.
pub fn orientation_block(start: &[f64; 3], end: &[f64; 3]) -> Mat3 {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let dz = end[2] - start[2];

    let alpha1 = dy.atan2(dx);
    let alpha2 = dz.atan2((dx * dx + dy * dy).sqrt());
    let theta = (alpha1.cos() * alpha2.cos()).clamp(-1.0, 1.0).acos();

    let axis = Vec3::new(0.0, -alpha2.sin(), alpha1.sin() * alpha2.cos());
    let norm = axis.norm();
    let n = if norm > AXIS_EPS {
        axis / norm
    } else if theta < std::f64::consts::FRAC_PI_2 {
        // Along +x or zero length
        return Mat3::identity();
    } else {
        // Along -x: half turn about global z
        Vec3::z()
    };

    let half = theta / 2.0;
    let q1 = half.cos();
    let q = n * half.sin();

    Mat3::identity() * (q1 * q1 - q.dot(&q)) + q * q.transpose() * 2.0 + q.cross_matrix() * (2.0 * q1)
}

/// Element orientation matrix: `orientation_block` tiled down the diagonal
/// once per group of three DOFs.
pub fn orientation_matrix(start: &[f64; 3], end: &[f64; 3], node_count: usize) -> Mat {
    let block = orientation_block(start, end);
    let size = node_count * DOFS_PER_NODE;
    let mut r = Mat::zeros(size, size);
    for offset in (0..size).step_by(3) {
        r.fixed_view_mut::<3, 3>(offset, offset).copy_from(&block);
    }
    r
}

/// Eliminate DOF `dof` with prescribed value `value` from `k · u = f`.
///
/// Moves the column's contribution to the right-hand side, clears row and
/// column `dof`, puts 1 on the diagonal and `value` in `f[dof]`. Applying
/// several restraints gives the same system in any order.
pub fn apply_restraint(mut k: Mat, mut f: Vector, dof: usize, value: f64) -> (Mat, Vector) {
    if value != 0.0 {
        for j in 0..k.nrows() {
            if j != dof {
                f[j] -= k[(j, dof)] * value;
            }
        }
    }
    k.row_mut(dof).fill(0.0);
    k.column_mut(dof).fill(0.0);
    k[(dof, dof)] = 1.0;
    f[dof] = value;
    (k, f)
}

/// Largest |a_ij - a_ji|
pub fn max_asymmetry(m: &Mat) -> f64 {
    let mut worst = 0.0_f64;
    for i in 0..m.nrows() {
        for j in (i + 1)..m.ncols() {
            worst = worst.max((m[(i, j)] - m[(j, i)]).abs());
        }
    }
    worst
}
