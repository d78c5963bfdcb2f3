//! Reading the data to decode.

use std::{fmt, io};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use log::error;
use crate::error::Failed;


//------------ InputFormat ---------------------------------------------------

/// The format of the data given to the tool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputFormat {
    /// The raw encoded octets.
    #[default]
    Der,

    /// The octets as hex digits.
    ///
    /// White space anywhere is ignored.
    Hex,

    /// A PEM file.
    ///
    /// The octets are the content of the first block. Its BEGIN and END
    /// labels have to match.
    Pem,
}

impl InputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Der => "der",
            InputFormat::Hex => "hex",
            InputFormat::Pem => "pem",
        }
    }

    /// Reads the octets to decode from a file or, if `path` is `None`, stdin.
    pub fn read(self, path: Option<&Path>) -> Result<Vec<u8>, Failed> {
        let mut data = Vec::new();
        let res = match path {
            Some(path) => {
                std::fs::File::open(path).and_then(|mut file| {
                    file.read_to_end(&mut data)
                })
            }
            None => io::stdin().lock().read_to_end(&mut data)
        };
        if let Err(err) = res {
            error!(
                "Failed to read {}: {}",
                path.map(|path| path.display().to_string())
                    .unwrap_or_else(|| "standard input".into()),
                err
            );
            return Err(Failed)
        }
        self.convert(data)
    }

    /// Converts data in this format into the octets to decode.
    pub fn convert(self, data: Vec<u8>) -> Result<Vec<u8>, Failed> {
        match self {
            InputFormat::Der => Ok(data),
            InputFormat::Hex => {
                hex::decode(strip_white_space(&data)).map_err(|err| {
                    error!("Invalid hex input: {}", err);
                    Failed
                })
            }
            InputFormat::Pem => {
                match pem::parse(&data) {
                    Ok(block) => Ok(block.contents().to_vec()),
                    Err(err) => {
                        error!("Invalid PEM input: {}", err);
                        Err(Failed)
                    }
                }
            }
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "der" => Ok(InputFormat::Der),
            "hex" => Ok(InputFormat::Hex),
            "pem" => Ok(InputFormat::Pem),
            _ => Err(format!("invalid input format '{}'", s))
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Helper Functions ----------------------------------------------

fn strip_white_space(data: &[u8]) -> Vec<u8> {
    data.iter().copied().filter(|ch| !ch.is_ascii_whitespace()).collect()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!(InputFormat::from_str("hex"), Ok(InputFormat::Hex));
        assert_eq!(InputFormat::from_str("pem"), Ok(InputFormat::Pem));
        assert_eq!(InputFormat::from_str("der"), Ok(InputFormat::Der));
        assert!(InputFormat::from_str("PEM").is_err());
        assert_eq!(InputFormat::Pem.to_string(), "pem");
    }

    #[test]
    fn convert_hex() {
        assert_eq!(
            InputFormat::Hex.convert(b"30 03\n0101\tff\n".to_vec()),
            Ok(b"\x30\x03\x01\x01\xff".to_vec())
        );
        assert!(InputFormat::Hex.convert(b"300".to_vec()).is_err());
        assert!(InputFormat::Hex.convert(b"3g".to_vec()).is_err());
    }

    #[test]
    fn convert_pem() {
        let pem = b"garbage\n\
            -----BEGIN THING-----\r\n\
            MAMB\r\n\
            Af8=\r\n\
            -----END THING-----\n";
        assert_eq!(
            InputFormat::Pem.convert(pem.to_vec()),
            Ok(b"\x30\x03\x01\x01\xff".to_vec())
        );
        assert!(
            InputFormat::Pem.convert(b"-----BEGIN X-----\nMAMB".to_vec())
                .is_err()
        );
        assert!(InputFormat::Pem.convert(b"MAMBAf8=".to_vec()).is_err());
    }

    #[test]
    fn malformed_pem() {
        // Labels that don’t match.
        assert!(
            InputFormat::Pem.convert(
                b"-----BEGIN THING-----\nMAMBAf8=\n\
                  -----END OTHER THING-----\n".to_vec()
            ).is_err()
        );

        // Not a BEGIN line at all.
        assert!(
            InputFormat::Pem.convert(
                b"-----BEGINNING OF NOTHING\nMAMBAf8=\n\
                  -----END SOMETHING ELSE-----\n".to_vec()
            ).is_err()
        );

        // Content that isn’t base64.
        assert!(
            InputFormat::Pem.convert(
                b"-----BEGIN THING-----\nMA*B\n-----END THING-----\n"
                    .to_vec()
            ).is_err()
        );
    }

    #[test]
    fn read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        io::Write::write_all(&mut file, b"0500").unwrap();
        assert_eq!(
            InputFormat::Hex.read(Some(file.path())),
            Ok(vec![5, 0])
        );
        assert_eq!(
            InputFormat::Der.read(Some(file.path())),
            Ok(b"0500".to_vec())
        );
        assert!(
            InputFormat::Der.read(
                Some(Path::new("/nonexistent/asn1parse/input"))
            ).is_err()
        );
    }
}
