use crate::cli::{actions::Action, commands, dispatch::handler, telemetry};
use anyhow::Result;

/// Start the CLI
/// # Errors
/// Returns an error if telemetry cannot be initialized or arguments are invalid.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity = matches.get_one::<u8>("verbosity").map_or(0, |&v| v);

    telemetry::init(Some(telemetry::level_from_verbosity(verbosity)))?;

    let action = handler(&matches)?;

    Ok(action)
}
