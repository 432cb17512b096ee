//! Solve a frame document from the command line
//!
//! Usage: `frame-solve <input.json> [output.json] [--sequential] [--cholesky]
//! [--no-statics] [--singularity-tolerance <value>]`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;

use frame_solver::prelude::*;

struct Args {
    input: PathBuf,
    output: PathBuf,
    options: AnalysisOptions,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    input.with_file_name(format!("{}_output.json", stem))
}

fn parse_tolerance(value: &str) -> anyhow::Result<f64> {
    let tolerance: f64 = value
        .parse()
        .with_context(|| format!("invalid singularity tolerance '{}'", value))?;
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        bail!("singularity tolerance must be finite and non-negative, got {}", tolerance);
    }
    Ok(tolerance)
}

fn parse_args() -> anyhow::Result<Args> {
    let mut options = AnalysisOptions::default();
    let mut paths = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sequential" => options = options.sequential(),
            "--cholesky" => options = options.with_solver(SolverKind::Cholesky),
            "--no-statics" => options = options.with_statics_check(false),
            "--singularity-tolerance" => {
                let value = args.next().context("--singularity-tolerance needs a value")?;
                options = options.with_singularity_tolerance(parse_tolerance(&value)?);
            }
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            path => paths.push(PathBuf::from(path)),
        }
    }

    let mut paths = paths.into_iter();
    let Some(input) = paths.next() else {
        bail!(
            "usage: frame-solve <input.json> [output.json] [--sequential] [--cholesky] \
             [--no-statics] [--singularity-tolerance <value>]"
        );
    };
    let output = paths.next().unwrap_or_else(|| default_output(&input));
    if paths.next().is_some() {
        bail!("too many arguments");
    }

    Ok(Args {
        input,
        output,
        options,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let mut system = load_system_from_path(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?
        .with_options(args.options);

    system.solve().context("analysis failed")?;
    write_report(&system, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let summary = system.summary();
    info!(
        "{} nodes, {} free DOFs, max displacement {:.6e}",
        summary.num_nodes, summary.free_dofs, summary.max_displacement
    );
    println!("Results written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("models/portal.json")),
            PathBuf::from("models/portal_output.json")
        );
    }

    #[test]
    fn test_parse_tolerance() {
        assert_eq!(parse_tolerance("1e-10").unwrap(), 1e-10);
        assert!(parse_tolerance("-1").is_err());
        assert!(parse_tolerance("tiny").is_err());
        assert!(parse_tolerance("inf").is_err());
    }
}
