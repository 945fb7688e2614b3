use super::load_structures;
use crate::cli::FitArgs;
use crate::config::PartialFitConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chargefit::core::io::charges::ChargesFile;
use chargefit::core::io::traits::DataFile;
use chargefit::engine::progress::ProgressReporter;
use chargefit::workflows;
use tracing::info;

pub fn run(args: FitArgs, progress: &CliProgressHandler) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialFitConfig::from_file(path)?,
        None => PartialFitConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let set = load_structures(&args.structures)?;
    info!("Loading reference charges from {:?}", &args.reference);
    let reference = ChargesFile::read_from_path(&args.reference)
        .map_err(|e| CliError::parsing(&args.reference, e))?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    println!(
        "Fitting '{}' parameters ({} classifier) on {} molecule(s)...",
        config.method,
        config.classifier,
        set.len()
    );
    info!("Invoking the core fit workflow...");
    let result = workflows::fit::run(set, &reference, &config, &reporter)?;

    println!("Optimization: {} after {} evaluation(s).", result.outcome.status, result.outcome.evaluations);
    println!("Best sampled RMSD: {:.6}", result.sampling_rmsd);
    println!("Final RMSD:        {:.6}", result.rmsd);
    match result.r2 {
        Some(r2) => println!("Pearson R²:        {:.6}", r2),
        None => println!("Pearson R²:        undefined (no variance)"),
    }
    print!("{}", result.parameters);
    println!("✓ Fitted charges written to: {}", config.charges_output.display());
    if let Some(path) = &config.parameters_output {
        println!("✓ Parameters written to: {}", path.display());
    }

    Ok(())
}
