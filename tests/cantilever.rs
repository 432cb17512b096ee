use approx::assert_relative_eq;
use frame_solver::prelude::*;

// E = A = L = P = 1, G arbitrary
fn unit_cantilever(section: Section, tip_load: NodeLoad) -> FrameSystem {
    let props = ElementProperties::new(&Material::new(1.0, 0.0), &section);
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0.0).with_link(Link::mount()),
        Node::new(1, 1.0, 0.0, 0.0).with_load(tip_load),
    ];
    let mut system = FrameSystem::new(nodes, vec![Beam::new(0, 0, 1, props).into()]).unwrap();
    system.solve().unwrap();
    system
}

#[test]
fn unit_inertia_tip_deflection_is_one_third() {
    let system = unit_cantilever(Section::new(1.0, 1.0, 1.0, 1.0), NodeLoad::force(0.0, 1.0, 0.0));

    let tip = system.node_displacement(1).unwrap();
    assert_relative_eq!(tip.dy, 1.0 / 3.0, max_relative = 1e-10);
    assert_relative_eq!(tip.rz, 0.5, max_relative = 1e-10);
    assert_relative_eq!(tip.dx, 0.0, epsilon = 1e-12);
    assert_relative_eq!(tip.dz, 0.0, epsilon = 1e-12);

    let root = system.node_reactions(0).unwrap();
    assert_relative_eq!(root.fy, -1.0, epsilon = 1e-10);
    assert_relative_eq!(root.mz, -1.0, epsilon = 1e-10);

    let results = system.beam(0).unwrap().results().unwrap();
    assert_relative_eq!(results.elastic_line_y.eval(1.0), 1.0 / 3.0, max_relative = 1e-10);
    assert_relative_eq!(results.elastic_line_y.eval(0.5), 5.0 / 48.0, max_relative = 1e-10);
    assert_relative_eq!(results.bending_moment_y.eval(0.0), 1.0, epsilon = 1e-10);
    assert_relative_eq!(results.bending_moment_y.eval(1.0), 0.0, epsilon = 1e-10);
    assert_relative_eq!(results.shear_force_y.eval(0.3), -1.0, epsilon = 1e-10);
}

#[test]
fn unit_square_section_tip_deflection() {
    // Iz = 1/12, so PL³/(3EIz) = 4
    let system = unit_cantilever(Section::rectangular(1.0, 1.0), NodeLoad::force(0.0, 1.0, 0.0));
    let tip = system.node_displacement(1).unwrap();
    assert_relative_eq!(tip.dy, 4.0, max_relative = 1e-10);
}

#[test]
fn out_of_plane_load_rotates_about_negative_y() {
    let system = unit_cantilever(Section::new(1.0, 1.0, 1.0, 1.0), NodeLoad::force(0.0, 0.0, 1.0));

    let tip = system.node_displacement(1).unwrap();
    assert_relative_eq!(tip.dz, 1.0 / 3.0, max_relative = 1e-10);
    assert_relative_eq!(tip.ry, -0.5, max_relative = 1e-10);

    let results = system.beam(0).unwrap().results().unwrap();
    assert_relative_eq!(results.elastic_line_z.eval(1.0), 1.0 / 3.0, max_relative = 1e-10);
    assert_relative_eq!(results.bending_moment_z.eval(0.0), 1.0, epsilon = 1e-10);
}

#[test]
fn axial_and_torsional_tip_loads() {
    let system = unit_cantilever(
        Section::new(2.0, 1.0, 1.0, 4.0),
        NodeLoad::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
    );

    // PL/EA and TL/GJ with G = 1/2
    let tip = system.node_displacement(1).unwrap();
    assert_relative_eq!(tip.dx, 0.5, max_relative = 1e-10);
    assert_relative_eq!(tip.rx, 0.5, max_relative = 1e-10);

    let results = system.beam(0).unwrap().results().unwrap();
    assert_relative_eq!(results.normal_force, 1.0, max_relative = 1e-10);
    assert_relative_eq!(results.torsion, 1.0, max_relative = 1e-10);

    let (start, end) = system.beam_end_forces(0).unwrap();
    assert_relative_eq!(start.axial, end.axial, epsilon = 1e-10);
}

#[test]
fn forced_tip_displacement_matches_stiffness() {
    // Prescribed tip deflection of 1/3 needs the same unit reaction as a unit load
    let props = ElementProperties::new(&Material::new(1.0, 0.0), &Section::new(1.0, 1.0, 1.0, 1.0));
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0.0).with_link(Link::mount()),
        Node::new(1, 1.0, 0.0, 0.0).with_forced_displacement([0.0, 1.0 / 3.0, 0.0]),
    ];
    let mut system = FrameSystem::new(nodes, vec![Beam::new(0, 0, 1, props).into()]).unwrap();
    system.solve().unwrap();

    let tip = system.node_displacement(1).unwrap();
    assert_relative_eq!(tip.dy, 1.0 / 3.0, max_relative = 1e-10);
    assert_relative_eq!(tip.rz, 0.5, max_relative = 1e-10);
    assert_relative_eq!(system.node_reactions(1).unwrap().fy, 1.0, epsilon = 1e-10);
    assert_relative_eq!(system.node_reactions(0).unwrap().fy, -1.0, epsilon = 1e-10);
}
