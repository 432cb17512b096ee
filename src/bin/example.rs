//! Frame Solver Example - Simple Portal Frame

use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== Frame Solver Example: Portal Frame ===\n");

    // W12x26 (approximate properties)
    // A = 7.65 in² = 0.00494 m²
    // Iy = 17.3 in⁴ = 7.2e-6 m⁴
    // Iz = 204 in⁴ = 8.49e-5 m⁴
    // J = 0.3 in⁴ = 1.25e-7 m⁴
    let steel = Material::steel();
    let props = ElementProperties::new(&steel, &Section::new(0.00494, 7.2e-6, 8.49e-5, 1.25e-7));
    println!(
        "Steel: E={:.0}GPa, nu={}, G={:.1}GPa\n",
        steel.e() / 1e9,
        steel.nu(),
        steel.g() / 1e9
    );

    //     2 -------- 3
    //     |          |
    //     |          |
    //     0          1
    //   Mount      Mount

    let height = 4.0;
    let span = 6.0;

    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0.0).with_link(Link::mount()),
        Node::new(1, span, 0.0, 0.0).with_link(Link::mount()),
        // 10 kN lateral at roof level
        Node::new(2, 0.0, height, 0.0).with_load(NodeLoad::force(10000.0, 0.0, 0.0)),
        Node::new(3, span, height, 0.0),
    ];

    let elements: Vec<Element> = vec![
        Beam::new(0, 0, 2, props).into(),
        Beam::new(1, 1, 3, props).into(),
        // 20 kN/m downward on the girder
        Beam::new(2, 2, 3, props)
            .with_load(DistributedLoad::uniform([0.0, -20000.0, 0.0]))
            .into(),
    ];

    let mut system = FrameSystem::new(nodes, elements)?;
    println!("Running linear analysis...\n");
    system.solve()?;

    println!("Node Displacements:");
    for id in 0..4 {
        let disp = system.node_displacement(id)?;
        println!(
            "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
            id,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    println!("\nSupport Reactions:");
    for id in 0..2 {
        let rxn = system.node_reactions(id)?;
        println!(
            "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m, |M|={:.2}kN·m",
            id,
            rxn.fx / 1000.0,
            rxn.fy / 1000.0,
            rxn.mz / 1000.0,
            rxn.moment_magnitude() / 1000.0
        );
    }

    println!("\nBeam Forces:");
    for id in 0..3 {
        let (start, end) = system.beam_end_forces(id)?;
        println!(
            "  {}: N={:.2}kN, Vmax={:.2}kN, Mmax={:.2}kN·m",
            id,
            start.axial / 1000.0,
            start.shear_y.abs().max(end.shear_y.abs()) / 1000.0,
            start.moment_z.abs().max(end.moment_z.abs()) / 1000.0
        );
    }

    let girder = system.beam(2)?;
    if let Some(results) = girder.results() {
        println!(
            "\nGirder max |Mz| along span: {:.2}kN·m",
            results.max_moment(system.options().diagram_points) / 1000.0
        );
    }

    let summary = system.summary();
    println!("\nSummary:");
    println!(
        "  Max displacement: {:.4}mm at {:?}",
        summary.max_displacement * 1000.0,
        summary.max_disp_node
    );
    println!(
        "  Max reaction: {:.2}kN at {:?}",
        summary.max_reaction / 1000.0,
        summary.max_reaction_node
    );
    println!(
        "  Max axial: {:.2}kN in {:?}",
        summary.max_axial / 1000.0,
        summary.max_axial_beam
    );
    println!(
        "  Max moment: {:.2}kN·m in {:?}",
        summary.max_moment / 1000.0,
        summary.max_moment_beam
    );
    println!("  Force imbalance: {:.3e}", summary.force_imbalance);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
