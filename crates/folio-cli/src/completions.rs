use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

pub fn generate_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

/// Completion script registered under the installed binary name.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "folio", out);
}
