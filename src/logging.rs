use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Installs a console subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (e.g. `"topup_toolkit=info"`)
/// applies. Fails if the directive does not parse or a global subscriber is already set.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let directive = default_directive
        .parse::<Directive>()
        .map_err(|e| Error::Config(format!("invalid log directive '{default_directive}': {e}")))?;

    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialised: {e}")))
}
