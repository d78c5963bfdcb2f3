//! What the `asn1parse` tool can do for you.
//!
//! This module implements all the commands users can ask the tool to
//! perform. They are encapsulated in the type [`Operation`] which can
//! determine the command from the command line argumments and then execute
//! it.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use clap::{Args, ArgMatches, FromArgMatches, Subcommand};
use log::{error, info};
use crate::ber::Oid;
use crate::config::Config;
use crate::error::{ExitError, Failed};
use crate::output::output_text;


//------------ Operation -----------------------------------------------------

/// The command to execute.
///
/// This type collects all the commands we have defined plus any possible
/// extra configuration they support.
///
/// You can create a value from the command line arguments. First, you add
/// all necessary sub-commands and arguments to a clap `Command` via
/// [`config_args`][Self::config_args] and then process the argument matches
/// into a value in [`from_arg_matches`][Self::from_arg_matches]. Finally,
/// you can execute the created command through the [`run`][Self::run]
/// method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    Dump(Dump),
    Oid(OidCommand),
    PrintConfig(PrintConfig),
}

impl Operation {
    /// Adds the command configuration to a clap app.
    pub fn config_args(app: clap::Command) -> clap::Command {
        let app = Dump::config_args(app);
        let app = OidCommand::config_args(app);
        PrintConfig::config_args(app)
    }

    /// Creates a command from clap matches.
    pub fn from_arg_matches(
        matches: &ArgMatches,
        cur_dir: &Path,
    ) -> Result<Self, Failed> {
        Ok(match matches.subcommand() {
            Some(("dump", matches)) => {
                Operation::Dump(Dump::from_arg_matches(matches, cur_dir)?)
            }
            Some(("oid", matches)) => {
                Operation::Oid(OidCommand::from_arg_matches(matches)?)
            }
            Some(("config", _)) => {
                Operation::PrintConfig(PrintConfig)
            }
            _ => {
                error!(
                    "Failed: a command is required.\n\
                     \nCommonly used commands are:\
                     \n   dump      Decode data and print its structure\
                     \n   oid       Convert object identifiers\
                     \n\
                     \nSee asn1parse -h for a usage summary."
                );
                return Err(Failed)
            }
        })
    }

    /// Runs the command.
    pub fn run(self, config: Config) -> Result<(), ExitError> {
        match self {
            Operation::Dump(cmd) => cmd.run(&config),
            Operation::Oid(cmd) => cmd.run(),
            Operation::PrintConfig(cmd) => cmd.run(&config),
        }
    }
}


//------------ Dump ----------------------------------------------------------

/// Decodes data and prints its structure.
#[derive(Clone, Debug, Eq, Args, PartialEq)]
pub struct Dump {
    /// Read the data from this file instead of stdin
    #[arg(value_name = "PATH")]
    file: Option<PathBuf>,
}

impl Dump {
    /// Adds the command configuration to a clap app.
    pub fn config_args(app: clap::Command) -> clap::Command {
        app.subcommand(
            Dump::augment_args(
                clap::Command::new("dump")
                    .about("Decodes data and prints its structure")
                    .after_help(AFTER_HELP)
            )
        )
    }

    /// Creates a command from clap matches.
    pub fn from_arg_matches(
        matches: &ArgMatches,
        cur_dir: &Path,
    ) -> Result<Self, Failed> {
        let mut res = from_matches::<Dump>(matches)?;
        res.file = res.file.map(|path| cur_dir.join(path));
        Ok(res)
    }

    /// Decodes the input and prints the result to stdout.
    ///
    /// If the input does not decode, logs the reason and returns
    /// `ExitError::Invalid`.
    fn run(self, config: &Config) -> Result<(), ExitError> {
        let data = config.input_format.read(self.file.as_deref())?;
        let value = match config.parser_options().decode(&data) {
            Ok(value) => value,
            Err(err) => {
                error!("{}: {}.", self.source_name(), err);
                return Err(ExitError::Invalid)
            }
        };
        info!(
            "{}: decoded {} octets as {}.",
            self.source_name(), data.len(), config.mode
        );
        config.output_format.output(
            &value, &mut io::stdout().lock()
        ).map_err(output_failed)
    }

    fn source_name(&self) -> String {
        match self.file {
            Some(ref path) => path.display().to_string(),
            None => String::from("<stdin>"),
        }
    }
}


//------------ OidCommand ----------------------------------------------------

/// Converts object identifiers between dotted and encoded form.
#[derive(Clone, Debug, Eq, PartialEq, Subcommand)]
pub enum OidCommand {
    /// Prints the hex encoded content octets of a dotted identifier
    Encode {
        /// The identifier, e.g., 1.2.840.113549
        #[arg(value_name = "OID")]
        oid: String,
    },

    /// Prints the dotted form of hex encoded content octets
    Decode {
        /// The content octets as hex digits
        #[arg(value_name = "HEX")]
        hex: String,
    },
}

impl OidCommand {
    /// Adds the command configuration to a clap app.
    pub fn config_args(app: clap::Command) -> clap::Command {
        app.subcommand(
            OidCommand::augment_subcommands(
                clap::Command::new("oid")
                    .about("Converts object identifiers")
                    .subcommand_required(true)
                    .after_help(AFTER_HELP)
            )
        )
    }

    /// Creates a command from clap matches.
    pub fn from_arg_matches(matches: &ArgMatches) -> Result<Self, Failed> {
        from_matches::<OidCommand>(matches)
    }

    fn run(self) -> Result<(), ExitError> {
        let mut res = self.convert()?;
        res.push('\n');
        print_stdout(&res)
    }

    /// Performs the conversion and returns the text to print.
    fn convert(&self) -> Result<String, ExitError> {
        match *self {
            OidCommand::Encode { ref oid } => {
                match Oid::from_str(oid) {
                    Ok(oid) => Ok(hex::encode(oid.as_slice())),
                    Err(err) => {
                        error!("Cannot encode '{}': {}.", oid, err);
                        Err(ExitError::Generic)
                    }
                }
            }
            OidCommand::Decode { ref hex } => {
                let data = match hex::decode(hex) {
                    Ok(data) => data,
                    Err(err) => {
                        error!("Invalid hex data '{}': {}.", hex, err);
                        return Err(ExitError::Generic)
                    }
                };
                let oid = Oid(data);
                if !oid.is_valid() {
                    error!("'{}' is not a valid object identifier.", hex);
                    return Err(ExitError::Invalid)
                }
                Ok(oid.to_string())
            }
        }
    }
}


//------------ PrintConfig ---------------------------------------------------

/// Shows the current configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PrintConfig;

impl PrintConfig {
    /// Adds the command configuration to a clap app.
    pub fn config_args(app: clap::Command) -> clap::Command {
        app.subcommand(clap::Command::new("config")
            .about("Prints the current config and exits")
            .after_help(AFTER_HELP)
        )
    }

    /// Prints the current configuration to stdout and exits.
    fn run(self, config: &Config) -> Result<(), ExitError> {
        print_stdout(&config.to_string())
    }
}


//------------ Helpers -------------------------------------------------------

/// Creates a derived command type from its clap matches.
fn from_matches<T: FromArgMatches>(
    matches: &ArgMatches
) -> Result<T, Failed> {
    T::from_arg_matches(matches).map_err(|err| {
        error!("Invalid command line arguments: {}", err);
        Failed
    })
}

/// Prints `text` to stdout.
fn print_stdout(text: &str) -> Result<(), ExitError> {
    output_text(text, &mut io::stdout().lock()).map_err(output_failed)
}

fn output_failed(err: io::Error) -> ExitError {
    error!("Failed to write output: {}", err);
    ExitError::Generic
}

const AFTER_HELP: &str =
    "Additional global options are available. \
    Please consult 'asn1parse --help' for those.";


//============ Tests =========================================================
