//! `pinauth list` — display all users in a table.

use crate::admin;
use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let users = admin::list(&settings)?;

    output::info(&format!(
        "{} — {} user(s)",
        settings.credential_path.display(),
        users.len()
    ));

    output::print_users_table(&users);

    Ok(())
}
