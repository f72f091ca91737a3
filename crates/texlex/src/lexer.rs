//! The TeX lexer, which reads categorized characters and outputs TeX tokens.
//!
//! The lexer is a state machine with three states, described in chapter 8 of the TeXBook
//!     and in section 343 of "TeX: the program".
//! The state determines what happens to space and end-of-line characters:
//!
//! - In [ReadState::LineBegin], spaces are dropped and an end-of-line character
//!     becomes a `\par` control sequence.
//! - In [ReadState::LineMiddle], a space is output and an end-of-line character becomes a space.
//!     Both leave the lexer in a state where further blanks are skipped.
//! - In [ReadState::SkippingBlanks], spaces and end-of-line characters are dropped.
//!
//! Lexing is "just in time": a token is only produced when it is requested.
//! Between requests the caller may insert new input using [Lexer::reader_mut].

use crate::catcode::{CatCode, CatCodeFn, CatCodeTable};
use crate::categorizer::{CharCat, Categorizer};
use crate::error::Error;
use crate::read::{ByteSource, Location};

/// State of the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadState {
    #[default]
    LineBegin,
    LineMiddle,
    SkippingBlanks,
}

/// A control sequence, like `\def` or `\{`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlSequenceCall {
    /// Name of the control sequence, without the escape character.
    ///
    /// Each byte of the name is a single char, so bytes above 127 become Latin-1 characters.
    pub name: String,
    /// Location of the escape character.
    pub location: Location,
    /// Number of input bytes the control sequence was read from, including the escape character.
    pub length: usize,
}

/// A TeX token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    ControlSequence(ControlSequenceCall),
    Character(CharCat),
}

impl Token {
    pub fn location(&self) -> &Location {
        match self {
            Token::ControlSequence(call) => &call.location,
            Token::Character(char_cat) => &char_cat.location,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Token::ControlSequence(call) => call.length,
            Token::Character(char_cat) => char_cat.length,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::ControlSequence(call) => write!(f, "\\{}", call.name),
            Token::Character(char_cat) => write!(f, "{}", char::from(char_cat.char)),
        }
    }
}

/// The TeX lexer.
pub struct Lexer<R, F = CatCodeTable> {
    categorizer: Categorizer<R, F>,
    read_state: ReadState,
}

impl<R: ByteSource, F: CatCodeFn> Lexer<R, F> {
    pub fn new(categorizer: Categorizer<R, F>) -> Lexer<R, F> {
        Lexer {
            categorizer,
            read_state: ReadState::LineBegin,
        }
    }

    pub fn read_state(&self) -> ReadState {
        self.read_state
    }

    /// Set the state of the lexer; e.g., to [ReadState::LineBegin] when a new file is inserted.
    pub fn set_read_state(&mut self, read_state: ReadState) {
        self.read_state = read_state;
    }

    pub fn categorizer(&self) -> &Categorizer<R, F> {
        &self.categorizer
    }

    pub fn categorizer_mut(&mut self) -> &mut Categorizer<R, F> {
        &mut self.categorizer
    }

    pub fn reader_mut(&mut self) -> &mut R {
        self.categorizer.reader_mut()
    }

    /// Read the next token.
    ///
    /// At the end of the input [Error::Exhausted] is returned.
    /// Characters with category code [Ignored](CatCode::Ignored) are skipped.
    /// Characters with category code [Invalid](CatCode::Invalid) result in an
    ///     [Error::InvalidCharacter] error;
    ///     the character is consumed, so lexing may continue afterwards.
    pub fn read_token(&mut self) -> Result<Token, Error> {
        let token = self.next_token()?;
        tracing::trace!(%token, location = %token.location(), "lexed token");
        Ok(token)
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        use ReadState::*;
        loop {
            let char_cat = self.categorizer.read_char_cat_trio()?;
            match char_cat.cat_code {
                CatCode::Comment => {
                    self.skip_comment();
                    self.read_state = LineBegin;
                }
                CatCode::Escape => {
                    let call = self.read_control_sequence(char_cat)?;
                    return Ok(Token::ControlSequence(call));
                }
                CatCode::BeginGroup
                | CatCode::EndGroup
                | CatCode::MathShift
                | CatCode::AlignmentTab
                | CatCode::Parameter
                | CatCode::Superscript
                | CatCode::Subscript
                | CatCode::Letter
                | CatCode::Other
                | CatCode::Active => {
                    self.read_state = LineMiddle;
                    return Ok(Token::Character(char_cat));
                }
                CatCode::Space => {
                    if self.read_state == LineMiddle {
                        self.read_state = SkippingBlanks;
                        return Ok(Token::Character(CharCat {
                            char: b' ',
                            ..char_cat
                        }));
                    }
                }
                CatCode::EndOfLine => match self.read_state {
                    LineBegin => {
                        return Ok(Token::ControlSequence(ControlSequenceCall {
                            name: "par".into(),
                            location: char_cat.location,
                            length: char_cat.length,
                        }));
                    }
                    LineMiddle => {
                        self.read_state = LineBegin;
                        return Ok(Token::Character(CharCat {
                            char: b' ',
                            cat_code: CatCode::Space,
                            ..char_cat
                        }));
                    }
                    SkippingBlanks => {}
                },
                CatCode::Ignored => {}
                CatCode::Invalid => return Err(Error::InvalidCharacter(char_cat)),
            }
        }
    }

    // Consumes raw bytes up to and including the next end of line character.
    fn skip_comment(&mut self) {
        loop {
            match self.categorizer.read_char_cat() {
                Ok(CharCat {
                    cat_code: CatCode::EndOfLine,
                    ..
                }) => return,
                Err(err) if err.is_exhausted() => return,
                // Bytes without category codes in comments are not an error.
                _ => {}
            }
        }
    }

    fn read_control_sequence(&mut self, escape: CharCat) -> Result<ControlSequenceCall, Error> {
        let first = self.categorizer.read_char_cat_trio()?;
        let mut length = escape.length + first.length;
        let mut name = String::new();
        name.push(char::from(first.char));
        self.read_state = match first.cat_code {
            CatCode::Space => ReadState::SkippingBlanks,
            CatCode::Letter => {
                while let Ok((_, CatCode::Letter)) = self.categorizer.peek_char_cat_trio() {
                    match self.categorizer.read_char_cat_trio() {
                        Ok(next) => {
                            name.push(char::from(next.char));
                            length += next.length;
                        }
                        Err(_) => break,
                    }
                }
                ReadState::SkippingBlanks
            }
            _ => ReadState::LineMiddle,
        };
        Ok(ControlSequenceCall {
            name,
            location: escape.location,
            length,
        })
    }
}

/// Iterating over a lexer yields tokens until the input is exhausted.
impl<R: ByteSource, F: CatCodeFn> Iterator for Lexer<R, F> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_token() {
            Err(err) if err.is_exhausted() => None,
            result => Some(result),
        }
    }
}
