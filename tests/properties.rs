//! Structural properties checked over generated frames

use approx::assert_relative_eq;
use frame_solver::math::{
    apply_restraint, beam_local_stiffness, max_asymmetry, orientation_block, solver_for, Mat,
    Vec3, Vector, DOFS_PER_NODE,
};
use frame_solver::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;

/// Stiffness scalars, open sections (J = 0) included
fn arb_properties() -> impl Strategy<Value = ElementProperties> {
    (
        1.0..10.0,
        0.0..0.4,
        0.5..2.0,
        0.5..2.0,
        0.5..2.0,
        prop_oneof![Just(0.0), 0.5..2.0],
    )
        .prop_map(|(e, nu, area, iy, iz, j)| {
            ElementProperties::new(&Material::new(e, nu), &Section::new(area, iy, iz, j))
        })
}

fn arb_hinges() -> impl Strategy<Value = BeamHinges> {
    prop_oneof![
        Just(BeamHinges::none()),
        Just(BeamHinges::start()),
        Just(BeamHinges::end()),
        Just(BeamHinges::both()),
    ]
}

fn arb_direction() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_filter("direction too short", |v| Vec3::from(*v).norm() > 0.2)
        .prop_map(|v| {
            let n = Vec3::from(v).normalize();
            [n[0], n[1], n[2]]
        })
}

fn arb_node_load() -> impl Strategy<Value = NodeLoad> {
    prop::array::uniform6(-1.0..1.0f64).prop_map(NodeLoad::from_array)
}

fn arb_line_load() -> impl Strategy<Value = Option<DistributedLoad>> {
    prop::option::of(
        (prop::array::uniform3(-1.0..1.0f64), prop::array::uniform3(-1.0..1.0f64))
            .prop_map(|(start, end)| DistributedLoad::new(start, end)),
    )
}

/// One beam of a tree grown from node 0, ending at a new node
#[derive(Debug, Clone)]
struct Branch {
    parent: Index,
    direction: [f64; 3],
    length: f64,
    properties: ElementProperties,
    line_load: Option<DistributedLoad>,
    load: NodeLoad,
}

fn arb_tree() -> impl Strategy<Value = Vec<Branch>> {
    let branch = (
        any::<Index>(),
        arb_direction(),
        1.0..3.0,
        arb_properties(),
        arb_line_load(),
        arb_node_load(),
    )
        .prop_map(|(parent, direction, length, properties, line_load, load)| Branch {
            parent,
            direction,
            length,
            properties,
            line_load,
            load,
        });
    prop::collection::vec(branch, 1..8)
}

/// Node 0 is mounted and every beam is between 1 and 3 long. A node reached
/// by a beam without torsion stiffness has its rotations held, so the
/// system is always stable.
fn build_tree(branches: &[Branch], offset: [f64; 3]) -> (Vec<Node>, Vec<Element>) {
    let mut coords = vec![[0.0; 3]];
    let mut nodes = vec![Node::new(0, offset[0], offset[1], offset[2]).with_link(Link::mount())];
    let mut elements: Vec<Element> = Vec::new();

    for (i, branch) in branches.iter().enumerate() {
        let id = i + 1;
        let parent = branch.parent.index(id);
        let p = coords[parent];
        let c: [f64; 3] = std::array::from_fn(|k| p[k] + branch.direction[k] * branch.length);
        coords.push(c);

        let mut node = Node::new(id, c[0] + offset[0], c[1] + offset[1], c[2] + offset[2])
            .with_load(branch.load);
        if branch.properties.j == 0.0 {
            node = node.with_link(Link::with_restraints([false, false, false, true, true, true]));
        }
        nodes.push(node);

        let mut beam = Beam::new(i, parent, id, branch.properties);
        if let Some(load) = branch.line_load {
            beam = beam.with_load(load);
        }
        elements.push(beam.into());
    }

    (nodes, elements)
}

/// Global resultant of every point and line load
fn applied_resultant(nodes: &[Node], elements: &[Element]) -> Vec3 {
    let mut applied = Vec3::zeros();
    for node in nodes {
        let load = node.load.as_array();
        applied += Vec3::new(load[0], load[1], load[2]);
    }
    for beam in elements.iter().filter_map(Element::as_beam) {
        if let Some(load) = &beam.load {
            let start = &nodes[beam.start_node()];
            let end = &nodes[beam.end_node()];
            let local = load.resultant(start.distance_to(end));
            applied += orientation_block(&start.coords(), &end.coords())
                * Vec3::new(local[0], local[1], local[2]);
        }
    }
    applied
}

fn assembled(nodes: Vec<Node>, elements: Vec<Element>) -> FrameSystem {
    let mut system = FrameSystem::new(nodes, elements).unwrap();
    system.compute_local_matrices().unwrap();
    system.assemble().unwrap();
    system
}

/// Two beams with links and prescribed values mixed on the same nodes
fn restraint_fixture() -> FrameSystem {
    let props = ElementProperties::new(&Material::new(100.0, 0.25), &Section::new(1.0, 0.5, 0.8, 0.3));
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0.0).with_link(Link::mount()),
        Node::new(1, 2.0, 1.0, 0.0)
            .with_link(Link::with_restraints([false, true, true, true, false, false]))
            .with_forced_displacement([0.0, 0.01, -0.02])
            .with_load(NodeLoad::new(1.0, 0.0, 0.0, 0.0, 0.5, -0.5)),
        Node::new(2, 3.0, 1.0, 2.0)
            .with_forced_rotation([0.0, 0.0, 0.005])
            .with_load(NodeLoad::force(0.0, -2.0, 1.0)),
    ];
    let elements = vec![
        Beam::new(0, 0, 1, props).into(),
        Beam::new(1, 1, 2, props).into(),
    ];
    let mut system = assembled(nodes, elements);
    system.apply_boundary_conditions().unwrap();
    system
}

proptest! {
    #[test]
    fn global_stiffness_is_symmetric(
        points in prop::collection::vec(prop::array::uniform3(-5.0..5.0f64), 3..9),
        links in prop::collection::vec((any::<Index>(), any::<Index>(), arb_properties(), arb_hinges()), 0..16),
    ) {
        let nodes: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Node::new(i, p[0], p[1], p[2]))
            .collect();

        let mut elements: Vec<Element> = Vec::new();
        for (a, b, properties, hinges) in &links {
            let (a, b) = (a.index(nodes.len()), b.index(nodes.len()));
            if a == b || nodes[a].distance_to(&nodes[b]) < 0.1 {
                continue;
            }
            elements.push(Beam::new(elements.len(), a, b, *properties).with_hinges(*hinges).into());
        }

        let system = assembled(nodes, elements);
        let k = system.global_stiffness().unwrap();
        prop_assert!(k.iter().all(|v| v.is_finite()));
        prop_assert!(max_asymmetry(k) <= 1e-10 * k.amax().max(1.0));
    }

    #[test]
    fn translation_does_not_change_stiffness(
        branches in arb_tree(),
        offset in prop::array::uniform3(-20.0..20.0f64),
    ) {
        let (nodes, elements) = build_tree(&branches, [0.0; 3]);
        let original = assembled(nodes, elements);
        let (nodes, elements) = build_tree(&branches, offset);
        let moved = assembled(nodes, elements);

        let a = original.global_stiffness().unwrap();
        let b = moved.global_stiffness().unwrap();
        let scale = a.amax();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9 * scale);
        }

        for (ea, eb) in original.elements().iter().zip(moved.elements()) {
            let ka = &ea.computed_matrices().unwrap().local_stiffness;
            let kb = &eb.computed_matrices().unwrap().local_stiffness;
            for (x, y) in ka.iter().zip(kb.iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9 * ka.amax());
            }
        }
    }

    #[test]
    fn both_hinges_leave_a_truss(p in arb_properties(), length in 0.5..5.0f64) {
        let axial = [(0, 0), (0, 6), (6, 0), (6, 6)];
        let k = beam_local_stiffness(&p, length, true, true);
        let ea_l = p.e * p.a / length;

        for i in 0..12 {
            for j in 0..12 {
                if axial.contains(&(i, j)) {
                    let expected = if i == j { ea_l } else { -ea_l };
                    assert_relative_eq!(k[(i, j)], expected, max_relative = 1e-10);
                } else {
                    assert_relative_eq!(k[(i, j)], 0.0, epsilon = 1e-9 * ea_l);
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn loads_and_reactions_balance(branches in arb_tree()) {
        let (nodes, elements) = build_tree(&branches, [0.0; 3]);
        let applied = applied_resultant(&nodes, &elements);

        let mut system = FrameSystem::new(nodes, elements).unwrap();
        system.solve().unwrap();

        // Only supports carry reactions
        let mut reactions = Vec3::zeros();
        for node in system.nodes() {
            let r = node.reactions();
            for i in 0..3 {
                if node.is_restrained(i) {
                    reactions[i] += r[i];
                }
            }
        }

        let total = reactions + applied;
        prop_assert!(total.norm() < 1e-8, "unbalanced by {:e}", total.norm());
        prop_assert!(system.free_dof_residual() < 1e-8);
        prop_assert!(system.force_imbalance() < 1e-8);
    }

    #[test]
    fn restraint_order_does_not_change_solution(keys in prop::collection::vec(any::<u64>(), 24)) {
        let system = restraint_fixture();
        let mut restraints = Vec::new();
        for node in system.nodes() {
            for r in 0..DOFS_PER_NODE {
                if node.is_restrained(r) {
                    restraints.push((node.dof_offset() + r, node.forced_displacements[r]));
                }
            }
        }
        prop_assert!(restraints.len() >= 10 && restraints.len() <= keys.len());

        let solver = solver_for(&AnalysisOptions::default());
        let (k_ref, f_ref) = system.restrained_system().unwrap();
        let reference = solver.solve(k_ref, f_ref).unwrap();

        let mut shuffled: Vec<(u64, (usize, f64))> =
            restraints.iter().enumerate().map(|(i, &r)| (keys[i], r)).collect();
        shuffled.sort_by_key(|&(key, _)| key);

        let mut k: Mat = system.global_stiffness().unwrap().clone();
        let mut f: Vector = system.global_forces().unwrap().clone();
        for &(_, (dof, value)) in &shuffled {
            (k, f) = apply_restraint(k, f, dof, value);
        }
        let u = solver.solve(&k, &f).unwrap();

        for (a, b) in reference.iter().zip(u.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12, max_relative = 1e-9);
        }
        for &(dof, value) in &restraints {
            assert_relative_eq!(u[dof], value, epsilon = 1e-12);
        }
    }
}

#[test]
fn skew_truss_member_keeps_four_entries() {
    let props = ElementProperties::new(&Material::new(3.0, 0.2), &Section::new(1.5, 0.0, 0.0, 0.0));
    let nodes = vec![Node::new(0, 0.0, 0.0, 0.0), Node::new(1, 1.0, 2.0, -2.0)];
    let beam = Beam::new(0, 0, 1, props).with_hinges(BeamHinges::both());
    let system = assembled(nodes, vec![beam.into()]);
    let k = &system.element(0).unwrap().computed_matrices().unwrap().local_stiffness;
    let nonzero = k.iter().filter(|v| v.abs() > 1e-9 * k.amax()).count();
    assert_eq!(nonzero, 4);
    assert_relative_eq!(k[(0, 0)], 1.5, max_relative = 1e-12);
}

#[test]
fn address_tables_cover_element_nodes() {
    let props = ElementProperties::new(&Material::steel(), &Section::default());
    let nodes: Vec<Node> = (0..5)
        .map(|i| Node::new(i, i as f64, (i * i) as f64 * 0.1, 0.0))
        .collect();
    let n_dofs = nodes.len() * DOFS_PER_NODE;
    let elements: Vec<Element> = vec![
        Beam::new(0, 3, 1, props).into(),
        Release::new(1, 0, 4).into(),
        CurvedBeam::new(2, 0, 2, 4, props).into(),
    ];
    let system = assembled(nodes, elements);

    for element in system.elements() {
        let table = element.address_table().unwrap();
        assert!(table.iter().all(|&dof| dof < n_dofs));

        let expected: Vec<usize> = element
            .node_indices()
            .iter()
            .flat_map(|&n| (n * DOFS_PER_NODE)..(n * DOFS_PER_NODE + DOFS_PER_NODE))
            .collect();
        assert_eq!(table, expected.as_slice());
    }

    let beam_table = system.element(0).unwrap().address_table().unwrap();
    assert_eq!(beam_table[..6], [18, 19, 20, 21, 22, 23]);
    assert_eq!(beam_table[6..], [6, 7, 8, 9, 10, 11]);
}
