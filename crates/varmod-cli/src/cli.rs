use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "varmod - assemble clean, simulation-ready coordinate models from mmCIF structures, introduce point mutations, and size membrane patches.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build wild-type and mutant coordinate models from an mmCIF structure.
    Build(BuildArgs),
    /// Infer the membrane plane from a coordinate model and recommend a patch size.
    Patch(PatchArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the input mmCIF structure file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving the generated coordinate files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub outdir: PathBuf,

    /// File-name prefix for all outputs (default: the input file stem).
    #[arg(short, long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Point mutation to build, as CHAIN:RESSEQ[:ICODE]=FROM>TO
    /// (e.g. 'm:64=MET>VAL'). May be given multiple times.
    #[arg(short, long, value_name = "SPEC")]
    pub mutation: Vec<String>,

    /// Additionally export the wild-type atoms of this author chain.
    /// May be given multiple times.
    #[arg(long, value_name = "CHAIN")]
    pub export_chain: Vec<String>,

    /// Optional TOML job file declaring prefix, mutations, and chain exports.
    #[arg(long, value_name = "PATH")]
    pub job: Option<PathBuf>,

    /// Experimental model number to keep from multi-model sources
    /// (default: 1, unless the job file says otherwise).
    #[arg(long, value_name = "NUM")]
    pub model: Option<i64>,

    /// Keep hydrogen atoms instead of exporting heavy atoms only.
    #[arg(long)]
    pub keep_hydrogens: bool,

    /// Keep water (HOH) heteroatoms instead of dropping them.
    #[arg(long)]
    pub keep_solvent: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Infer the membrane plane from the selected chains by PCA.
    Plane,
    /// Use the axis-aligned X/Y bounding box instead.
    Xy,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentSource {
    /// Compute in-plane extents from the membrane chains only.
    Chains,
    /// Compute in-plane extents from the full protein projection.
    Protein,
}

/// Arguments for the `patch` subcommand.
#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Path to the input coordinate (PDB) file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Margin in Angstroms added on each side of the extents.
    #[arg(short, long, default_value_t = 25.0, value_name = "ANGSTROMS")]
    pub margin: f64,

    /// Sizing mode.
    #[arg(long, value_enum, default_value_t = PatchMode::Plane)]
    pub mode: PatchMode,

    /// Which atoms contribute to the in-plane extents in plane mode.
    #[arg(long, value_enum, default_value_t = ExtentSource::Chains)]
    pub extent: ExtentSource,

    /// Comma-separated chain ids whose CA atoms define the membrane plane.
    #[arg(long, default_value = "s,i,j,r,l,m", value_name = "CHAINS")]
    pub chains: String,

    /// Comma-separated residue names to exclude from the extents.
    /// May be given multiple times; waters/ions/lipids are excluded by default.
    #[arg(long, value_name = "NAMES")]
    pub exclude_resnames: Vec<String>,

    /// Include lipid atoms in the extents (excluded by default).
    #[arg(long)]
    pub include_lipids: bool,
}
