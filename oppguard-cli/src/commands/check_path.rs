//! Command to check a reference against the trusted storage roots.

use crate::error::CliError;
use crate::utils::{load_configuration, reporter, GlobalOptions};
use clap::Args;
use oppguard::{ContainmentValidator, ContentGate, ContentPolicy, FileReference, StoragePolicy};

/// Check whether a path or file URI lies inside a trusted storage root.
#[derive(Args)]
pub struct CheckPathCommand {
    /// Path or URI to check
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Also print the trusted root that contains the reference
    #[arg(long)]
    pub show_root: bool,
}

impl CheckPathCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let reference = FileReference::parse(&self.reference)?;

        let reporter = reporter();
        let gate = ContentGate::new(ContentPolicy::from(&config), reporter.clone());
        if gate.is_forbidden_reference(&reference) {
            return Err(deny(&reference, "served by a forbidden content provider"));
        }

        let validator = ContainmentValidator::new(StoragePolicy::from(&config), reporter);
        match validator.matching_root(&reference) {
            Some(root) => {
                println!("allowed");
                if self.show_root {
                    println!("{}", root.display());
                }
                Ok(())
            }
            None if !reference.is_local_file() => Err(deny(&reference, "not a local file")),
            None => Err(deny(&reference, "outside every trusted root")),
        }
    }
}

fn deny(reference: &FileReference, reason: &str) -> CliError {
    println!("denied: {reason}");
    CliError::SemanticFailure(format!("{reference} was denied: {reason}"))
}
