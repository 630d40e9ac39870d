use crate::cli::{actions::Action, commands};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches
            .get_one::<u16>(commands::ARG_PORT)
            .copied()
            .unwrap_or(3000),
        backend_url: matches
            .get_one::<String>(commands::ARG_BACKEND_URL)
            .cloned()
            .context("missing required argument: --backend-url")?,
    })
}
