use super::load_structures;
use crate::cli::InfoArgs;
use crate::error::{CliError, Result};
use chargefit::core::forcefield::params::Parameters;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    let mut set = load_structures(&args.structures)?;

    if let Some(path) = &args.parameters {
        let parameters = Parameters::load(path).map_err(|e| CliError::parsing(path, e))?;
        let dropped = set.unclassified_molecules_count(&parameters);
        set.classify_atoms_from_parameters(&parameters);
        print!("{}", set.summary());
        println!(
            "Molecules without a parameterized type for every atom: {}",
            dropped
        );
    } else {
        info!("Classifying atoms with the '{}' classifier.", args.classifier);
        set.classify_atoms(args.classifier.classifier().as_ref());
        print!("{}", set.summary());
    }

    Ok(())
}
