use std::path::PathBuf;
use thiserror::Error;
use varmod::core::geometry::GeometryError;
use varmod::core::io::pdb::PdbError;
use varmod::core::mutation::MutationError;
use varmod::workflows::assemble::AssembleError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Pdb(#[from] PdbError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
