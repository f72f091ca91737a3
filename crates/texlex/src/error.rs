//! Errors returned by the input, categorization and lexing layers.

use crate::categorizer::CharCat;
use crate::read::Location;

/// Error returned by every layer of the lexing pipeline.
///
/// Only [Error::Exhausted] is expected during normal operation:
///     it signals the end of the input and callers generally loop until they see it.
/// The other variants are recoverable in the sense that the pipeline is still in
///     a consistent state after they are returned, and reading may continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input ended.
    ///
    /// When returned from a peek operation, the payload is the number of bytes
    ///     that were available, which is smaller than the number requested.
    Exhausted { bytes_read: usize },
    /// A peek was requested with a distance smaller than 1.
    InvalidPeekDistance(usize),
    /// A byte has no entry in the category code table.
    ///
    /// The location is absent when the lookup was not associated with a read,
    ///     as in [Categorizer::char_to_cat](crate::Categorizer::char_to_cat).
    NoCatCode {
        byte: u8,
        location: Option<Location>,
    },
    /// A character with category code [Invalid](crate::CatCode::Invalid) was read by the lexer.
    InvalidCharacter(CharCat),
}

impl Error {
    /// Returns true if this is an [Error::Exhausted] error.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::Exhausted { .. })
    }

    /// Location in the input the error relates to, if there is one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::Exhausted { .. } | Error::InvalidPeekDistance(_) => None,
            Error::NoCatCode { location, .. } => location.as_ref(),
            Error::InvalidCharacter(char_cat) => Some(&char_cat.location),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Exhausted { bytes_read } => {
                write!(f, "input exhausted after {bytes_read} bytes")
            }
            Error::InvalidPeekDistance(n) => {
                write!(
                    f,
                    "cannot peek {n} bytes ahead: peek distances must be at least 1"
                )
            }
            Error::NoCatCode { byte, location } => {
                write!(f, "no category code is assigned to byte 0x{byte:02X}")?;
                if let Some(location) = location {
                    write!(f, " at {location}")?;
                }
                Ok(())
            }
            Error::InvalidCharacter(char_cat) => {
                write!(
                    f,
                    "invalid character 0x{:02X} at {}",
                    char_cat.char, char_cat.location
                )
            }
        }
    }
}

impl std::error::Error for Error {}
