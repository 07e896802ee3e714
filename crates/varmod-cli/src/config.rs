use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, MutationRequest};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use varmod::core::models::selection::ResidueSelection;
use varmod::workflows::mutate::Substitution;

/// One declared point mutation in a TOML job file.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialMutation {
    chain: String,
    #[serde(rename = "res-seq")]
    res_seq: isize,
    #[serde(rename = "ins-code")]
    ins_code: Option<char>,
    substitution: String,
    label: Option<String>,
}

/// Optional TOML job file for the `build` subcommand. Every field the
/// job file can carry is also expressible on the command line; CLI
/// arguments win when both are given.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialBuildJob {
    prefix: Option<String>,
    model: Option<i64>,
    #[serde(rename = "export-chains", default)]
    export_chains: Vec<String>,
    #[serde(default)]
    mutations: Vec<PartialMutation>,
}

/// The fully merged plan for a `build` run.
#[derive(Debug)]
pub struct BuildPlan {
    pub prefix: Option<String>,
    pub model: i64,
    pub export_chains: Vec<String>,
    pub mutations: Vec<MutationRequest>,
}

impl PartialBuildJob {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading job file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &BuildArgs) -> Result<BuildPlan> {
        let mut mutations = Vec::new();
        for spec in &args.mutation {
            mutations.push(parser::parse_mutation_spec(spec).map_err(CliError::Argument)?);
        }
        for m in &self.mutations {
            let substitution: Substitution = m
                .substitution
                .parse()
                .map_err(|e| CliError::Config(format!("{}", e)))?;
            mutations.push(MutationRequest {
                selection: ResidueSelection::new(&m.chain, m.res_seq, m.ins_code),
                substitution,
                label: m.label.clone(),
            });
        }

        let mut export_chains = args.export_chain.clone();
        for chain in &self.export_chains {
            if !export_chains.contains(chain) {
                export_chains.push(chain.clone());
            }
        }

        let prefix = args.prefix.clone().or(self.prefix);
        let model = args.model.or(self.model).unwrap_or(1);

        Ok(BuildPlan {
            prefix,
            model,
            export_chains,
            mutations,
        })
    }
}
