use crate::cli::BuildArgs;
use crate::config::{BuildPlan, PartialBuildJob};
use crate::error::{CliError, Result};
use crate::utils::parser::MutationRequest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use varmod::core::io::pdb;
use varmod::core::models::atom::AtomRecord;
use varmod::core::models::resolver::ResolveOptions;
use varmod::workflows::assemble::{Structure, assemble_from_path};

pub fn run(args: BuildArgs) -> Result<()> {
    let plan = match &args.job {
        Some(path) => PartialBuildJob::from_file(path)?,
        None => PartialBuildJob::default(),
    }
    .merge_with_cli(&args)?;

    let prefix = resolve_prefix(&args.input, &plan)?;
    let options = ResolveOptions {
        model_num: plan.model,
        heavy_only: !args.keep_hydrogens,
        solvent: if args.keep_solvent {
            None
        } else {
            Some("HOH".to_string())
        },
    };

    info!("Loading structure from {:?}", &args.input);
    let structure = assemble_from_path(&args.input, &options)?;

    fs::create_dir_all(&args.outdir)?;
    write_chain_map(&args.outdir, &prefix, &structure)?;

    let common_remarks = common_remarks(&args.input, &options);

    write_and_report(
        args.outdir.join(format!("{prefix}_WT_heavy.pdb")),
        &structure.records,
        &common_remarks,
    )?;
    write_and_report(
        args.outdir.join(format!("{prefix}_WT_heavy_proteinOnly.pdb")),
        &structure.protein_only(),
        &common_remarks,
    )?;
    for chain in &plan.export_chains {
        write_and_report(
            args.outdir
                .join(format!("{prefix}_chain_{chain}_WT_heavy.pdb")),
            &structure.chain_records(chain),
            &common_remarks,
        )?;
    }

    for request in &plan.mutations {
        build_mutant(&args.outdir, &prefix, &structure, request, &common_remarks)?;
    }

    Ok(())
}

fn build_mutant(
    outdir: &Path,
    prefix: &str,
    structure: &Structure,
    request: &MutationRequest,
    common_remarks: &[String],
) -> Result<()> {
    let tag = request.tag();
    info!(mutation = %tag, residue = %request.selection, "building mutant model");

    let mutated = request
        .substitution
        .apply(&structure.records, &request.selection)?;

    let mut remarks = common_remarks.to_vec();
    remarks.push(format!(
        "Mutation applied: chain {} resid {} {}->{}.",
        request.selection.chain_auth,
        request.selection.res_seq,
        request.substitution.source(),
        request.substitution.target(),
    ));

    write_and_report(
        outdir.join(format!("{prefix}_{tag}_heavy.pdb")),
        &mutated,
        &remarks,
    )?;
    write_and_report(
        outdir.join(format!("{prefix}_{tag}_heavy_proteinOnly.pdb")),
        &protein_only(&mutated),
        &remarks,
    )?;
    write_and_report(
        outdir.join(format!(
            "{prefix}_chain_{}_{}_heavy.pdb",
            request.selection.chain_auth, tag
        )),
        &chain_records(&mutated, &request.selection.chain_auth),
        &remarks,
    )?;

    Ok(())
}

fn resolve_prefix(input: &Path, plan: &BuildPlan) -> Result<String> {
    if let Some(prefix) = &plan.prefix {
        return Ok(prefix.clone());
    }
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::Argument(format!(
                "Cannot derive an output prefix from input path '{}'; pass --prefix.",
                input.display()
            ))
        })
}

fn common_remarks(input: &Path, options: &ResolveOptions) -> Vec<String> {
    let atoms = if options.heavy_only {
        "heavy atoms only"
    } else {
        "hydrogens kept"
    };
    let solvent = match &options.solvent {
        Some(name) => format!("{name} removed"),
        None => "solvent kept".to_string(),
    };
    vec![
        "Template structure:".to_string(),
        input.display().to_string(),
        format!("Assembled from model {} ({atoms}; {solvent}).", options.model_num),
    ]
}

fn write_chain_map(outdir: &Path, prefix: &str, structure: &Structure) -> Result<()> {
    let path = outdir.join(format!("{prefix}_chain_map.json"));
    let json = serde_json::to_string_pretty(&structure.chain_map)
        .map_err(|e| CliError::Other(e.into()))?;
    fs::write(&path, json + "\n")?;
    println!("Wrote: {}", path.display());
    Ok(())
}

fn write_and_report(path: PathBuf, records: &[AtomRecord], remarks: &[String]) -> Result<()> {
    pdb::write_model_to_path(&path, records, remarks)?;
    println!("Wrote: {}", path.display());
    Ok(())
}

fn protein_only(records: &[AtomRecord]) -> Vec<AtomRecord> {
    use varmod::core::models::atom::RecordKind;
    records
        .iter()
        .filter(|r| r.kind == RecordKind::Standard)
        .cloned()
        .collect()
}

fn chain_records(records: &[AtomRecord], chain_auth: &str) -> Vec<AtomRecord> {
    records
        .iter()
        .filter(|r| r.chain_auth == chain_auth)
        .cloned()
        .collect()
}
