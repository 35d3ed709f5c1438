//! Purpose: Hold top-level command dispatch for `tournament-state`.
//! Exports: `dispatch`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate the conversion.
//! Invariants: Decode writes the `.json` file before anything is echoed to stdout.
//! Invariants: Re-encode never touches stdout.

use tracing::debug;

use super::{Cli, RunOutcome};
use tournament_state::api::{Error, decode_file, encode_file};

pub(super) fn dispatch(cli: Cli) -> Result<RunOutcome, Error> {
    if cli.re_encode {
        if cli.print {
            debug!("--print has no effect with --re-encode");
        }
        let outcome = encode_file(&cli.state)?;
        debug!(
            json = %outcome.json_path.display(),
            state = %outcome.state_path.display(),
            encoding = ?outcome.encoding,
            "re-encoded tournament state"
        );
        return Ok(RunOutcome::ok());
    }

    let outcome = decode_file(&cli.state)?;
    debug!(
        state = %outcome.state_path.display(),
        json = %outcome.json_path.display(),
        encoding = ?outcome.encoding,
        "decoded tournament state"
    );
    if cli.print {
        println!("{}", outcome.text);
    }
    Ok(RunOutcome::ok())
}
