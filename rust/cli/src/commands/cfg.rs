//! Configuration command handler.
//!
//! Prints every configuration value together with where it came from
//! (default, config file or environment):
//!
//! ```json
//! {
//!   "bb": {
//!     "value": 10,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(e.to_string()));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "ante": {
            "value": config.ante,
            "source": sources.ante,
        },
        "sb": {
            "value": config.sb,
            "source": sources.sb,
        },
        "bb": {
            "value": config.bb,
            "source": sources.bb,
        },
        "variant": {
            "value": config.variant,
            "source": sources.variant,
        },
        "players": {
            "value": config.players,
            "source": sources.players,
        },
        "bankroll": {
            "value": config.bankroll,
            "source": sources.bankroll,
        }
    });
    ui::write_json(out, &display)?;
    Ok(())
}
