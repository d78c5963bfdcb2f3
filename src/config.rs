//! Configuration.
//!
//! This module primarily contains the type [`Config`] that holds all the
//! configuration used by the `asn1parse` tool. It can be loaded both from a
//! TOML formatted config file and command line options.

use std::{fmt, fs};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use clap::{Args, ArgAction, ArgMatches, Command, FromArgMatches};
use log::{LevelFilter, error, warn};
use crate::ber::{Mode, ParserOptions};
use crate::error::Failed;
use crate::input::InputFormat;
use crate::output::OutputFormat;


//------------ Defaults for Some Values --------------------------------------

/// Are we checking UTF-8 strings by default?
const DEFAULT_VALIDATE_UTF8: bool = true;

/// Are we treating T.61 strings as Latin-1 by default?
const DEFAULT_TELETEX_AS_LATIN1: bool = false;

/// The default log level.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;


//------------ Config --------------------------------------------------------

/// The configuration of the `asn1parse` tool.
///
/// All values are public and can be accessed directly.
///
/// The function [`config_args`][Self::config_args] adds the global command
/// line options to a clap command. Its matches can then be used to create
/// the config via [`from_arg_matches`][Self::from_arg_matches]. Finally,
/// [`to_toml`][Self::to_toml] can be used to produce a TOML value that
/// contains a configuration file content representing the current
/// configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The encoding rules to decode with.
    pub mode: Mode,

    /// Whether the content of UTF8String values is checked.
    pub validate_utf8: bool,

    /// Whether TeletexString values are interpreted as Latin-1.
    pub teletex_as_latin1: bool,

    /// The format of the input data.
    pub input_format: InputFormat,

    /// The format for printing decoded values.
    pub output_format: OutputFormat,

    /// The maximum log level.
    pub log_level: LevelFilter,

    /// Where to log to.
    pub log_target: LogTarget,
}

impl Config {
    /// Adds the global arguments to a clap command.
    ///
    /// The function follows clap’s builder pattern: it takes a command,
    /// adds a bunch of arguments to it and returns it at the end.
    pub fn config_args(app: Command) -> Command {
        GlobalArgs::augment_args(app)
    }

    /// Creates a configuration from command line matches.
    ///
    /// The function attempts to create configuration from the command line
    /// arguments provided via `matches`. It will read a config file if
    /// provided via the config file option (`-c` or `--config`) and start
    /// with the default configuration otherwise.
    ///
    /// All relative paths given in command line arguments will be
    /// interpreted relative to `cur_dir`. Conversely, paths in the config
    /// file are treated as relative to the config file’s directory.
    pub fn from_arg_matches(
        matches: &ArgMatches,
        cur_dir: &Path,
    ) -> Result<Self, Failed> {
        let args = match GlobalArgs::from_arg_matches(matches) {
            Ok(args) => args,
            Err(err) => {
                error!("Invalid command line arguments: {}", err);
                return Err(Failed)
            }
        };
        let mut res = Self::create_base_config(
            args.config.as_ref().map(|path| cur_dir.join(path)).as_deref()
        )?;
        res.apply_args(args, cur_dir);
        Ok(res)
    }

    /// Applies the command line arguments to a configuration.
    ///
    /// The path arguments in `args` will be interpreted relative to
    /// `cur_dir`.
    fn apply_args(&mut self, args: GlobalArgs, cur_dir: &Path) {
        // mode
        if let Some(mode) = args.mode {
            self.mode = mode
        }

        // validate_utf8
        if args.validate_utf8 {
            self.validate_utf8 = true
        }
        else if args.no_validate_utf8 {
            self.validate_utf8 = false
        }

        // teletex_as_latin1
        if args.teletex_as_latin1 {
            self.teletex_as_latin1 = true
        }
        else if args.no_teletex_as_latin1 {
            self.teletex_as_latin1 = false
        }

        // input_format
        if let Some(format) = args.input_format {
            self.input_format = format
        }

        // output_format
        if let Some(format) = args.output_format {
            self.output_format = format
        }

        // log_level
        if args.verbose > 1 {
            self.log_level = LevelFilter::Debug
        }
        else if args.verbose == 1 {
            self.log_level = LevelFilter::Info
        }
        else if args.quiet > 1 {
            self.log_level = LevelFilter::Off
        }
        else if args.quiet == 1 {
            self.log_level = LevelFilter::Error
        }

        // log_target
        if let Some(file) = args.log_file.as_ref() {
            if file == "-" {
                self.log_target = LogTarget::Stderr
            }
            else {
                self.log_target = LogTarget::File(cur_dir.join(file))
            }
        }
    }

    /// Creates the base configuration for the given config file path.
    ///
    /// If no config path is given, creates a default config.
    fn create_base_config(path: Option<&Path>) -> Result<Self, Failed> {
        match path {
            Some(path) => Self::from_config_file(ConfigFile::read(path)?),
            None => Ok(Self::default()),
        }
    }

    /// Creates a base config from a config file.
    fn from_config_file(mut file: ConfigFile) -> Result<Self, Failed> {
        let res = Config {
            mode: file.take_from_str("mode")?.unwrap_or_default(),
            validate_utf8: {
                file.take_bool("validate-utf8")?
                    .unwrap_or(DEFAULT_VALIDATE_UTF8)
            },
            teletex_as_latin1: {
                file.take_bool("teletex-as-latin1")?
                    .unwrap_or(DEFAULT_TELETEX_AS_LATIN1)
            },
            input_format: {
                file.take_from_str("input-format")?.unwrap_or_default()
            },
            output_format: {
                file.take_from_str("output-format")?.unwrap_or_default()
            },
            log_level: {
                file.take_from_str("log-level")?.unwrap_or(DEFAULT_LOG_LEVEL)
            },
            log_target: {
                match file.take_path("log-file")? {
                    Some(path) => LogTarget::File(path),
                    None => LogTarget::Stderr,
                }
            },
        };
        file.check_exhausted();
        Ok(res)
    }

    /// Returns the options for the decoder.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::new(self.mode)
            .with_validate_utf8(self.validate_utf8)
            .with_teletex_as_latin1(self.teletex_as_latin1)
    }

    /// Returns a TOML representation of the config.
    pub fn to_toml(&self) -> toml::Value {
        let mut res = toml::value::Table::new();
        res.insert("mode".into(), self.mode.to_string().into());
        res.insert("validate-utf8".into(), self.validate_utf8.into());
        res.insert(
            "teletex-as-latin1".into(), self.teletex_as_latin1.into()
        );
        res.insert(
            "input-format".into(), self.input_format.to_string().into()
        );
        res.insert(
            "output-format".into(), self.output_format.to_string().into()
        );
        res.insert("log-level".into(), self.log_level.to_string().into());
        if let LogTarget::File(ref path) = self.log_target {
            res.insert("log-file".into(), path.display().to_string().into());
        }
        res.into()
    }
}


//--- Default

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::default(),
            validate_utf8: DEFAULT_VALIDATE_UTF8,
            teletex_as_latin1: DEFAULT_TELETEX_AS_LATIN1,
            input_format: InputFormat::default(),
            output_format: OutputFormat::default(),
            log_level: DEFAULT_LOG_LEVEL,
            log_target: LogTarget::default(),
        }
    }
}


//--- Display

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_toml())
    }
}


//------------ LogTarget -----------------------------------------------------

/// The target to log to.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum LogTarget {
    /// Stderr.
    #[default]
    Stderr,

    /// A file.
    ///
    /// The argument is the file name.
    File(PathBuf)
}


//------------ GlobalArgs ----------------------------------------------------

/// The global command line arguments.
#[derive(Clone, Debug, Args)]
struct GlobalArgs {
    /// Read base configuration from this file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Encoding rules to decode with ('ber' or 'der')
    #[arg(short, long, value_name = "MODE")]
    mode: Option<Mode>,

    /// Check that UTF8String values contain valid UTF-8
    #[arg(long)]
    validate_utf8: bool,

    /// Accept any content in UTF8String values
    #[arg(long, conflicts_with = "validate_utf8")]
    no_validate_utf8: bool,

    /// Interpret TeletexString values as ISO 8859-1
    #[arg(long)]
    teletex_as_latin1: bool,

    /// Interpret TeletexString values as T.61
    #[arg(long, conflicts_with = "teletex_as_latin1")]
    no_teletex_as_latin1: bool,

    /// Format of the input data ('der', 'hex', or 'pem')
    #[arg(short, long, value_name = "FORMAT")]
    input_format: Option<InputFormat>,

    /// Format of the output ('text' or 'json')
    #[arg(short, long, value_name = "FORMAT")]
    output_format: Option<OutputFormat>,

    /// Log more information, twice for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log less information, twice for no information
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    /// Log to this file, '-' for stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,
}


//------------ ConfigFile ----------------------------------------------------

/// The content of a config file.
///
/// This is a thin wrapper around `toml::Table` to make dealing with it more
/// convenient.
#[derive(Clone, Debug)]
struct ConfigFile {
    /// The content of the file.
    content: toml::value::Table,

    /// The path to the config file.
    path: PathBuf,

    /// The directory we found the file in.
    ///
    /// This is used in relative paths.
    dir: PathBuf,
}

impl ConfigFile {
    /// Reads the config file at the given path.
    fn read(path: &Path) -> Result<Self, Failed> {
        let config = match fs::read_to_string(path) {
            Ok(config) => config,
            Err(err) => {
                error!(
                    "Failed to read config file {}: {}",
                    path.display(), err
                );
                return Err(Failed);
            }
        };
        Self::parse(&config, path)
    }

    /// Parses the content of the file from a string.
    fn parse(content: &str, path: &Path) -> Result<Self, Failed> {
        let content = match toml::from_str(content) {
            Ok(toml::Value::Table(content)) => content,
            Ok(_) => {
                error!(
                    "Failed to parse config file {}: Not a mapping.",
                    path.display()
                );
                return Err(Failed);
            }
            Err(err) => {
                error!(
                    "Failed to parse config file {}: {}",
                    path.display(), err
                );
                return Err(Failed);
            }
        };
        Ok(ConfigFile {
            content,
            path: path.into(),
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    /// Takes a boolean value from the config file.
    ///
    /// The value is taken from the given `key`. Returns `Ok(None)` if there
    /// is no such key. Returns an error if the key exists but the value
    /// isn’t a booelan.
    fn take_bool(&mut self, key: &str) -> Result<Option<bool>, Failed> {
        match self.content.remove(key) {
            Some(value) => {
                if let toml::Value::Boolean(res) = value {
                    Ok(Some(res))
                }
                else {
                    error!(
                        "Failed in config file {}: \
                         '{}' expected to be a boolean.",
                        self.path.display(), key
                    );
                    Err(Failed)
                }
            }
            None => Ok(None)
        }
    }

    /// Takes a string value from the config file.
    ///
    /// The value is taken from the given `key`. Returns `Ok(None)` if there
    /// is no such key. Returns an error if the key exists but the value
    /// isn’t a string.
    fn take_string(&mut self, key: &str) -> Result<Option<String>, Failed> {
        match self.content.remove(key) {
            Some(value) => {
                if let toml::Value::String(res) = value {
                    Ok(Some(res))
                }
                else {
                    error!(
                        "Failed in config file {}: \
                         '{}' expected to be a string.",
                        self.path.display(), key
                    );
                    Err(Failed)
                }
            }
            None => Ok(None)
        }
    }

    /// Takes a string encoded value from the config file.
    ///
    /// The value is taken from the given `key`. It is expected to be a
    /// string and will be converted to the final type via
    /// `FromStr::from_str`.
    ///
    /// Returns `Ok(None)` if the key doesn’t exist. Returns an error if the
    /// key exists but the value isn’t a string or conversion fails.
    fn take_from_str<T>(&mut self, key: &str) -> Result<Option<T>, Failed>
    where T: FromStr, T::Err: fmt::Display {
        match self.take_string(key)? {
            Some(value) => {
                match T::from_str(&value) {
                    Ok(some) => Ok(Some(some)),
                    Err(err) => {
                        error!(
                            "Failed in config file {}: \
                             illegal value in '{}': {}.",
                            self.path.display(), key, err
                        );
                        Err(Failed)
                    }
                }
            }
            None => Ok(None)
        }
    }

    /// Takes a path value from the config file.
    ///
    /// The path is taken from the given `key`. It must be a string value.
    /// It is treated as relative to the directory of the config file. If it
    /// is indeed a relative path, it is expanded accordingly and an absolute
    /// path is returned.
    ///
    /// Returns `Ok(None)` if the key does not exist. Returns an error if the
    /// key exists but the value isn’t a string.
    fn take_path(&mut self, key: &str) -> Result<Option<PathBuf>, Failed> {
        self.take_string(key).map(|opt| opt.map(|path| self.dir.join(path)))
    }

    /// Checks whether the config file is now empty.
    ///
    /// If it isn’t, logs a warning naming the remaining keys.
    fn check_exhausted(&self) {
        if !self.content.is_empty() {
            warn!(
                "Ignoring unknown settings in config file {}: {}.",
                self.path.display(),
                self.content.keys().map(String::as_str)
                    .collect::<Vec<_>>().join(", ")
            );
        }
    }
}


//============ Tests =========================================================
