use crate::cli::{ExtentSource, PatchArgs, PatchMode};
use crate::error::{CliError, Result};
use nalgebra::Point3;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use tracing::info;
use varmod::core::geometry::pca::{fit_plane, planar_extents};
use varmod::core::io::pdb::read_atoms;

/// Residue names dropped from the extent calculation by default: waters,
/// common ions, and the membrane lipids these models are packed with.
const DEFAULT_EXCLUDE_RESNAMES: [&str; 20] = [
    "HOH", "WAT", "TIP", "TIP3", "TP3", "SOD", "CLA", "POT", "CAL", "MG", "ZN", "NA", "CL", "POP",
    "POPC", "TYC", "CDL", "PEE", "PLX", "DGT",
];

const LIPID_RESNAMES: [&str; 7] = ["POP", "POPC", "TYC", "CDL", "PEE", "PLX", "DGT"];

pub fn run(args: PatchArgs) -> Result<()> {
    let exclude = exclusion_set(&args.exclude_resnames, args.include_lipids);
    let chains = parse_chain_list(&args.chains);
    if chains.is_empty() {
        return Err(CliError::Argument(
            "No membrane chains given; pass --chains with at least one chain id.".to_string(),
        ));
    }

    info!(path = %args.input.display(), "reading coordinate model");
    let atoms = read_atoms(BufReader::new(File::open(&args.input)?))?;

    let mut selected_ca: Vec<Point3<f64>> = Vec::new();
    let mut selected_all: Vec<Point3<f64>> = Vec::new();
    let mut all: Vec<Point3<f64>> = Vec::new();
    for atom in &atoms {
        if exclude.contains(atom.res_name.as_str()) {
            continue;
        }
        all.push(atom.position);
        if chains.contains(&atom.chain.to_ascii_uppercase()) {
            selected_all.push(atom.position);
            if atom.atom_name == "CA" {
                selected_ca.push(atom.position);
            }
        }
    }

    println!("Input: {}", args.input.display());
    match args.mode {
        PatchMode::Xy => report_xy(&all, args.margin),
        PatchMode::Plane => report_plane(
            &chains,
            &selected_ca,
            &selected_all,
            &all,
            args.extent,
            args.margin,
        ),
    }
}

fn report_xy(points: &[Point3<f64>], margin: f64) -> Result<()> {
    if points.is_empty() {
        return Err(CliError::Argument(
            "No atoms contributed to the bounding box. Try --include-lipids or adjust --exclude-resnames."
                .to_string(),
        ));
    }

    let (mut min, mut max) = (points[0], points[0]);
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    let (dx, dy, dz) = (max.x - min.x, max.y - min.y, max.z - min.z);

    println!("Mode: xy (axis-aligned)");
    println!("Included atoms: {}", points.len());
    println!("Complex min (A): x={:.3} y={:.3} z={:.3}", min.x, min.y, min.z);
    println!("Complex max (A): x={:.3} y={:.3} z={:.3}", max.x, max.y, max.z);
    println!("Complex extents (A): dx={dx:.3} dy={dy:.3} dz={dz:.3}");
    println!("Margin (A): {margin:.3} per side");
    println!(
        "Recommended membrane patch (A): x={:.3} y={:.3}",
        dx + 2.0 * margin,
        dy + 2.0 * margin
    );
    Ok(())
}

fn report_plane(
    chains: &HashSet<char>,
    selected_ca: &[Point3<f64>],
    selected_all: &[Point3<f64>],
    all: &[Point3<f64>],
    extent: ExtentSource,
    margin: f64,
) -> Result<()> {
    let mut chain_list: Vec<String> = chains
        .iter()
        .map(|c| c.to_ascii_lowercase().to_string())
        .collect();
    chain_list.sort();

    if selected_ca.len() < 3 {
        return Err(CliError::Argument(format!(
            "Not enough CA atoms to infer the membrane plane (chains={}; found {}).",
            chain_list.join(","),
            selected_ca.len()
        )));
    }

    let basis = fit_plane(selected_ca)?;

    let extent_points = match extent {
        ExtentSource::Chains => selected_all,
        ExtentSource::Protein => all,
    };
    let extents = planar_extents(&basis, extent_points).ok_or_else(|| {
        CliError::Argument("No atoms selected for the extent calculation.".to_string())
    })?;
    let (du, dv) = (extents.du(), extents.dv());

    println!("Mode: plane (PCA inferred)");
    println!("Membrane chains: {}", chain_list.join(","));
    println!("CA atoms used: {}", selected_ca.len());
    println!(
        "Eigenvalues: {:.6}, {:.6}, {:.6}",
        basis.eigenvalues[0], basis.eigenvalues[1], basis.eigenvalues[2]
    );
    println!(
        "Membrane normal (unit): nx={:.6} ny={:.6} nz={:.6}",
        basis.normal.x, basis.normal.y, basis.normal.z
    );
    println!(
        "Extent selection: {}",
        match extent {
            ExtentSource::Chains => "chains",
            ExtentSource::Protein => "protein",
        }
    );
    println!("Extents in membrane plane (A): du={du:.3} dv={dv:.3}");
    println!("Margin (A): {margin:.3} per side");
    println!(
        "Recommended membrane patch (A): x={:.3} y={:.3}",
        du + 2.0 * margin,
        dv + 2.0 * margin
    );
    Ok(())
}

/// Builds the excluded-residue-name set from the defaults plus any
/// comma-separated user additions.
fn exclusion_set(extra: &[String], include_lipids: bool) -> HashSet<String> {
    let mut set: HashSet<String> = DEFAULT_EXCLUDE_RESNAMES
        .into_iter()
        .map(str::to_string)
        .collect();
    if include_lipids {
        for name in LIPID_RESNAMES {
            set.remove(name);
        }
    }
    for chunk in extra {
        for name in chunk.split(',') {
            let name = name.trim().to_ascii_uppercase();
            if !name.is_empty() {
                set.insert(name);
            }
        }
    }
    set
}

/// Parses a chain list such as `s,i,j,r,l,m` into uppercase chain ids.
fn parse_chain_list(chains: &str) -> HashSet<char> {
    chains
        .split([',', ' '])
        .flat_map(|part| part.trim().chars())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
