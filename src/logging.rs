//! Diagnostic logging setup.

use crate::redact::Redactor;
use std::io::Write;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "branch_release=error"
    } else if verbose {
        "branch_release=debug"
    } else {
        "branch_release=info"
    }
}

/// Install the global logger
///
/// `RUST_LOG` overrides the default filter. Every record is passed through
/// `redactor` before it is written. Calling this twice is harmless.
pub fn init_logger(redactor: Redactor, verbose: bool, quiet: bool) {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose, quiet));

    let _ = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let message = record.args().to_string();
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                redactor.redact(&message)
            )
        })
        .try_init();
}
