use super::load_structures;
use crate::cli::ChargesArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chargefit::engine::config::ChargesConfigBuilder;
use chargefit::engine::progress::ProgressReporter;
use chargefit::workflows;
use tracing::{info, warn};

pub fn run(args: ChargesArgs, progress: &CliProgressHandler) -> Result<()> {
    let set = load_structures(&args.structures)?;

    let config = ChargesConfigBuilder::new()
        .parameters_path(args.parameters.clone())
        .charges_output(args.output.clone())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    info!("Invoking the core charge-calculation workflow...");
    let result = workflows::calculate::run(set, &config, &reporter)?;

    if result.removed > 0 {
        warn!(
            "{} molecule(s) could not be classified and were skipped.",
            result.removed
        );
        println!(
            "Skipped {} molecule(s) with atoms the parameters do not cover.",
            result.removed
        );
    }
    println!(
        "✓ Charges for {} molecule(s) written to: {}",
        result.charges.len(),
        args.output.display()
    );

    Ok(())
}
