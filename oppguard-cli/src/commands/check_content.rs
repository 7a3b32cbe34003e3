//! Command to check a URI against the content-provider gates.

use crate::error::CliError;
use crate::utils::{load_configuration, reporter, yes_no, GlobalOptions};
use clap::Args;
use oppguard::{ContentGate, ContentPolicy, FileReference};

/// Check a URI against the content-provider gates.
#[derive(Args)]
pub struct CheckContentCommand {
    /// URI to check
    #[arg(value_name = "URI")]
    pub uri: String,
}

impl CheckContentCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let reference = FileReference::parse(&self.uri)?;
        let gate = ContentGate::new(ContentPolicy::from(&config), reporter());

        let forbidden = gate.is_forbidden_reference(&reference);
        let share = gate.is_share_reference(&reference);

        println!("forbidden: {}", yes_no(forbidden));
        println!("share-uri: {}", yes_no(share));

        if forbidden {
            return Err(CliError::SemanticFailure(format!(
                "{reference} is served by a forbidden content provider"
            )));
        }
        Ok(())
    }
}
