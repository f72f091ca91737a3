//! Assignment of category codes to input bytes.
//!
//! The [Categorizer] reads bytes from a [ByteSource] and assigns each a category code
//!     using a [CatCodeFn].
//!
//! # The `^^` notation
//!
//! TeX allows characters that are hard to type to be written using three characters:
//!     two identical characters of category [Superscript](CatCode::Superscript) followed by a third character.
//! For example, with the default tables `^^M` is a carriage return and `^^?` is ASCII delete.
//! The resulting character is the third character with bit 6 toggled:
//!     64 is subtracted if the byte is at least 64, and otherwise 64 is added.
//! The result is then categorized like any other byte.
//!
//! Notation is not applied when the third character has category [EndOfLine](CatCode::EndOfLine),
//!     or when the input ends before three characters are available.
//! A decoded character is not examined again, so `^^^^^` is a `^^` triple producing
//!     the character `^` with bit 6 toggled, followed by two more characters.
//!
//! The methods [Categorizer::peek_char_cat_trio] and [Categorizer::read_char_cat_trio]
//!     apply the notation.
//! Both use the same lookahead routine.
//! The read method then consumes exactly 1 or 3 bytes depending on the outcome.

use crate::catcode::{CatCode, CatCodeFn, CatCodeTable};
use crate::error::Error;
use crate::read::{ByteSource, Location};

/// A character with its category code and location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharCat {
    pub char: u8,
    pub cat_code: CatCode,
    /// Location of the first byte the character was read from.
    pub location: Location,
    /// Number of input bytes the character was read from: 1, or 3 for the `^^` notation.
    pub length: usize,
}

// Result of the `^^` lookahead.
#[derive(Debug, PartialEq, Eq)]
struct Trio {
    char: u8,
    cat_code: Option<CatCode>,
    // The input bytes the character is decoded from; only the first `length` are meaningful.
    raw: [u8; 3],
    length: usize,
}

/// Categorizer of input bytes.
pub struct Categorizer<R, F = CatCodeTable> {
    reader: R,
    cat_code_fn: F,
}

impl<R: ByteSource, F: CatCodeFn> Categorizer<R, F> {
    pub fn new(reader: R, cat_code_fn: F) -> Categorizer<R, F> {
        Categorizer {
            reader,
            cat_code_fn,
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Mutable access to the underlying reader; e.g., to insert new input.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn cat_code_fn(&self) -> &F {
        &self.cat_code_fn
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the category code of a byte.
    #[inline]
    pub fn char_to_cat(&self, b: u8) -> Result<CatCode, Error> {
        self.cat_code_fn.cat_code(b).ok_or(Error::NoCatCode {
            byte: b,
            location: None,
        })
    }

    /// Reads the next byte and categorizes it.
    ///
    /// The `^^` notation is not applied.
    /// If the byte has no category code it is still consumed.
    pub fn read_char_cat(&mut self) -> Result<CharCat, Error> {
        let fancy_byte = self.reader.read_fancy_byte()?;
        let cat_code = match self.cat_code_fn.cat_code(fancy_byte.byte) {
            None => {
                return Err(Error::NoCatCode {
                    byte: fancy_byte.byte,
                    location: Some(fancy_byte.location),
                })
            }
            Some(cat_code) => cat_code,
        };
        Ok(CharCat {
            char: fancy_byte.byte,
            cat_code,
            location: fancy_byte.location,
            length: 1,
        })
    }

    /// Peeks the `n`-th next byte and categorizes it.
    pub fn peek_char_cat(&self, n: usize) -> Result<(u8, CatCode), Error> {
        let b = self.reader.peek_byte(n)?;
        Ok((b, self.char_to_cat(b)?))
    }

    /// Peeks the next character, applying the `^^` notation.
    pub fn peek_char_cat_trio(&self) -> Result<(u8, CatCode), Error> {
        let trio = self.peek_trio()?;
        match trio.cat_code {
            None => Err(Error::NoCatCode {
                byte: trio.char,
                location: None,
            }),
            Some(cat_code) => Ok((trio.char, cat_code)),
        }
    }

    /// Reads the next character, applying the `^^` notation.
    ///
    /// If the resulting character has no category code, the input bytes are still consumed.
    ///
    /// # Panics
    ///
    /// Panics if the bytes read differ from the bytes just peeked,
    ///     which indicates a bug in the [ByteSource].
    pub fn read_char_cat_trio(&mut self) -> Result<CharCat, Error> {
        let trio = self.peek_trio()?;
        let first = self.commit(trio.raw[0]);
        for &expected in &trio.raw[1..trio.length] {
            self.commit(expected);
        }
        match trio.cat_code {
            None => Err(Error::NoCatCode {
                byte: trio.char,
                location: Some(first.location),
            }),
            Some(cat_code) => Ok(CharCat {
                char: trio.char,
                cat_code,
                location: first.location,
                length: trio.length,
            }),
        }
    }

    // The only errors returned here come from the reader.
    // Missing category codes are reported in the result.
    fn peek_trio(&self) -> Result<Trio, Error> {
        let char_1 = self.reader.peek_byte(1)?;
        let cat_1 = self.cat_code_fn.cat_code(char_1);
        let not_triod = Trio {
            char: char_1,
            cat_code: cat_1,
            raw: [char_1, 0, 0],
            length: 1,
        };
        if cat_1 != Some(CatCode::Superscript) {
            return Ok(not_triod);
        }
        let (char_3, cat_3) = match (self.peek_char_cat(2), self.peek_char_cat(3)) {
            (Ok((char_2, CatCode::Superscript)), Ok((char_3, cat_3))) if char_2 == char_1 => {
                (char_3, cat_3)
            }
            _ => return Ok(not_triod),
        };
        if cat_3 == CatCode::EndOfLine {
            return Ok(not_triod);
        }
        let char = if char_3 >= 64 { char_3 - 64 } else { char_3 + 64 };
        Ok(Trio {
            char,
            cat_code: self.cat_code_fn.cat_code(char),
            raw: [char_1, char_1, char_3],
            length: 3,
        })
    }

    fn commit(&mut self, expected: u8) -> crate::read::FancyByte {
        match self.reader.read_fancy_byte() {
            Ok(fancy_byte) if fancy_byte.byte == expected => fancy_byte,
            Ok(fancy_byte) => panic!(
                "peeked byte 0x{expected:02X} but read byte 0x{:02X} at {}",
                fancy_byte.byte, fancy_byte.location
            ),
            Err(err) => panic!("peeked byte 0x{expected:02X} but reading it failed: {err}"),
        }
    }
}
