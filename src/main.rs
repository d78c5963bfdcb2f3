//! The asn1parse binary.

use std::env::current_dir;
use clap::{crate_authors, crate_version};
use log::error;
use asn1parse::{Config, ExitError, Operation};
use asn1parse::log::Logger;

// Since `main` with a result currently insists on printing a message, but
// in our case we only get an `ExitError` if all is said and done, we make our
// own, more quiet version.
fn _main() -> Result<(), ExitError> {
    Logger::init()?;
    let cur_dir = match current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            error!(
                "Fatal: cannot get current directory ({}). Aborting.",
                err
            );
            return Err(ExitError::Generic);
        }
    };
    let matches = Operation::config_args(Config::config_args(
        clap::Command::new("asn1parse")
            .version(crate_version!())
            .author(crate_authors!())
            .about("decodes and inspects ASN.1 BER and DER data")
    )).get_matches();
    let config = Config::from_arg_matches(&matches, &cur_dir)?;
    Logger::switch_logging(&config)?;
    let operation = Operation::from_arg_matches(&matches, &cur_dir)?;
    operation.run(config)
}

fn main() {
    if let Err(err) = _main() {
        err.exit()
    }
}
