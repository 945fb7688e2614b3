pub mod charges;
pub mod fit;
pub mod info;

use crate::error::{CliError, Result};
use chargefit::core::io::structure::StructureFile;
use chargefit::core::io::traits::DataFile;
use chargefit::core::models::molecule_set::MoleculeSet;
use std::path::Path;
use tracing::info;

fn load_structures(path: &Path) -> Result<MoleculeSet> {
    info!("Loading structures from {:?}", path);
    let set = StructureFile::read_from_path(path).map_err(|e| CliError::parsing(path, e))?;
    info!(
        molecules = set.len(),
        atoms = set.atom_count(),
        "Structures loaded."
    );
    Ok(set)
}
