//! Handling for resource verbs given a missing or unknown resource.

use std::io::Write;

use clap::CommandFactory;

use crate::cli::args::Cli;
use crate::error::HarnessError;

/// Report a bad resource for `verb` and show the verb's help.
///
/// `args` holds whatever followed the verb on the command line. An empty
/// list means no resource was named. The returned error tells the caller
/// to exit non-zero; the message has already been written to `out`.
pub fn resource_fallback(verb: &str, args: &[String], out: &mut dyn Write) -> HarnessError {
    let err = match args.first() {
        None => HarnessError::MissingResourceVerb {
            verb: verb.to_string(),
        },
        Some(resource) => HarnessError::UnknownResourceVerb {
            resource: resource.clone(),
        },
    };

    // The error is what the caller acts on; a closed stdout shouldn't mask it.
    let _ = write!(out, "Error: {}\n\n", err);
    let _ = write!(out, "{}", verb_help(verb));

    err
}

/// Rendered help text for a top-level verb, or the root help if `verb` is unknown.
pub fn verb_help(verb: &str) -> String {
    let mut root = Cli::command();
    root.build();
    match root.find_subcommand_mut(verb) {
        Some(sub) => sub.render_help().to_string(),
        None => root.render_help().to_string(),
    }
}
