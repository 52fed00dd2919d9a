//! `avault version`: display version and vault format information.

use console::style;

use crate::consts::VAULT_HEADER;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("avault {current}");
    println!("{} {}", style("vault format:").dim(), style(VAULT_HEADER).cyan());
    Ok(())
}
