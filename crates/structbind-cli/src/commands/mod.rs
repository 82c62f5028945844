pub mod describe;
pub mod superpose;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use structbind::core::io::fasta::FastaFile;
use structbind::core::io::manifest::StructureManifest;
use structbind::core::models::alignment::Alignment;
use structbind::engine::registry::InMemoryRegistry;
use structbind::engine::store::AssociationStore;
use structbind::workflows::superpose::bind_structures;
use tracing::info;

/// Everything a command needs once the inputs are read and the structures bound.
pub struct Session {
    pub alignment: Alignment,
    pub store: AssociationStore,
    pub registry: InMemoryRegistry,
}

pub fn open_session(input: &InputArgs) -> Result<Session> {
    info!("Loading alignment from {:?}", &input.alignment);
    let alignment =
        FastaFile::read_from_path(&input.alignment).map_err(|e| CliError::FileParsing {
            path: input.alignment.clone(),
            source: e.into(),
        })?;

    info!("Loading structure manifest from {:?}", &input.structures);
    let resolved = StructureManifest::load(&input.structures)
        .and_then(|manifest| manifest.resolve(&alignment))
        .map_err(|e| CliError::FileParsing {
            path: input.structures.clone(),
            source: e.into(),
        })?;

    let mut store = AssociationStore::new();
    let registry = InMemoryRegistry::new();
    let added = bind_structures(&mut store, &registry, resolved)?;
    info!(
        "Bound {} structure(s) to {} alignment row(s).",
        added.len(),
        alignment.len()
    );

    Ok(Session {
        alignment,
        store,
        registry,
    })
}
