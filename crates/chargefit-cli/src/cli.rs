use chargefit::core::topology::classifier::ClassifierKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ChargeFit CLI - Compute partial atomic charges with electronegativity equalization and fit their parameters to reference charges.",
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

    /// Replace the built-in periodic table with a CSV element table.
    /// Header: atomic_number,symbol,name,electronegativity,ionization_potential,
    /// electron_affinity,covalent_radius
    #[arg(long, global = true, value_name = "PATH")]
    pub elements: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a structure file: molecules, atoms and atom types.
    Info(InfoArgs),
    /// Compute partial charges with a stored parameter file.
    Charges(ChargesArgs),
    /// Fit a charge method's parameters against reference charges.
    Fit(FitArgs),
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the molecular structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structures: PathBuf,

    /// Classify with a parameter file and report how many molecules it cannot type.
    #[arg(short, long, value_name = "PATH", conflicts_with = "classifier")]
    pub parameters: Option<PathBuf>,

    /// Classifier used to type the atoms when no parameter file is given.
    #[arg(short, long, value_name = "NAME", default_value = "hbo")]
    pub classifier: ClassifierKind,
}

/// Arguments for the `charges` subcommand.
#[derive(Args, Debug)]
pub struct ChargesArgs {
    /// Path to the molecular structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structures: PathBuf,

    /// Path to the parameter file (TOML) produced by `fit`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub parameters: PathBuf,

    /// Path for the output charge file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `fit` subcommand.
#[derive(Args, Debug)]
pub struct FitArgs {
    // --- Core Arguments ---
    /// Path to the training-set structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structures: PathBuf,

    /// Path to the reference charge file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Path for the fitted charge file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write the fitted parameters (TOML) to this path.
    #[arg(short = 'P', long, value_name = "PATH")]
    pub parameters_out: Option<PathBuf>,

    /// Path to a fit configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Method Overrides ---
    /// Override the charge method (e.g., 'eqeqc').
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Override the atom classifier ('plain' or 'hbo').
    #[arg(long, value_name = "NAME")]
    pub classifier: Option<ClassifierKind>,

    // --- Search Overrides ---
    /// Override the number of Latin-hypercube samples.
    #[arg(short = 'n', long, value_name = "INT")]
    pub samples: Option<usize>,

    /// Override the seed of the Latin-hypercube design.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the objective-evaluation budget of the local optimizer.
    #[arg(long, value_name = "INT")]
    pub max_evaluations: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S optimization.initial-step=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_arguments_parse_with_overrides() {
        let cli = Cli::try_parse_from([
            "chargefit", "-vv", "fit", "-s", "train.toml", "-r", "ref.txt", "-o", "out.txt",
            "--classifier", "plain", "--samples", "20", "-S", "sampling.seed=7",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Fit(args) = cli.command else {
            panic!("Expected 'fit' subcommand");
        };
        assert_eq!(args.classifier, Some(ClassifierKind::Plain));
        assert_eq!(args.samples, Some(20));
        assert_eq!(args.set_values, vec!["sampling.seed=7".to_string()]);
        assert!(args.method.is_none());
    }

    #[test]
    fn unknown_classifier_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "chargefit", "info", "-s", "train.toml", "--classifier", "fancy",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn elements_flag_is_global() {
        let cli = Cli::try_parse_from([
            "chargefit", "charges", "-s", "a.toml", "-p", "p.toml", "-o", "c.txt", "--elements",
            "table.csv",
        ])
        .unwrap();
        assert_eq!(cli.elements, Some(PathBuf::from("table.csv")));
    }
}
