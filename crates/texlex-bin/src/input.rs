//! Inclusion of files using an `\input`-like control sequence.

use std::path::{Path, PathBuf};

use texlex::{CatCode, CatCodeFn, Lexer, Location, NestedReader, ReadState, Token};

/// Error returned while expanding input directives.
#[derive(Debug)]
pub enum Error {
    Lex(texlex::Error),
    EmptyFileName {
        control_sequence: String,
        location: Location,
    },
    Io {
        path: PathBuf,
        location: Location,
        err: std::io::Error,
    },
}

impl From<texlex::Error> for Error {
    fn from(err: texlex::Error) -> Self {
        Error::Lex(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Lex(err) => write!(f, "{err}"),
            Error::EmptyFileName {
                control_sequence,
                location,
            } => write!(f, "{location}: no file name after \\{control_sequence}"),
            Error::Io {
                path,
                location,
                err,
            } => write!(f, "{location}: failed to input {}: {err}", path.display()),
        }
    }
}

impl std::error::Error for Error {}

/// A token stream in which a designated control sequence inputs a file.
///
/// The file name is built from the character tokens with category code letter or
///     other that follow the control sequence.
/// It ends at a space, which is consumed, or at any other token, which is returned
///     before the tokens of the file.
pub struct Expander<F> {
    lexer: Lexer<NestedReader, F>,
    input_cs: String,
    base_dir: PathBuf,
    pending: Option<Token>,
}

impl<F: CatCodeFn> Expander<F> {
    pub fn new(lexer: Lexer<NestedReader, F>, input_cs: String, base_dir: PathBuf) -> Self {
        Expander {
            lexer,
            input_cs,
            base_dir,
            pending: None,
        }
    }

    pub fn read_token(&mut self) -> Result<Token, Error> {
        loop {
            if let Some(token) = self.pending.take() {
                return Ok(token);
            }
            let token = self.lexer.read_token()?;
            match token {
                Token::ControlSequence(call) if call.name == self.input_cs => {
                    self.input(call.location)?;
                }
                token => return Ok(token),
            }
        }
    }

    fn input(&mut self, location: Location) -> Result<(), Error> {
        let mut file_name = String::new();
        loop {
            let token = match self.lexer.read_token() {
                Ok(token) => token,
                Err(err) if err.is_exhausted() => break,
                Err(err) => return Err(err.into()),
            };
            match token {
                Token::Character(char_cat) => match char_cat.cat_code {
                    CatCode::Letter | CatCode::Other => file_name.push(char::from(char_cat.char)),
                    CatCode::Space => break,
                    _ => {
                        self.pending = Some(Token::Character(char_cat));
                        break;
                    }
                },
                token => {
                    self.pending = Some(token);
                    break;
                }
            }
        }
        if file_name.is_empty() {
            return Err(Error::EmptyFileName {
                control_sequence: self.input_cs.clone(),
                location,
            });
        }
        let path = resolve(&self.base_dir, &file_name);
        tracing::debug!(path = %path.display(), %location, "inputting file");
        let reader = match NestedReader::from_path(&path) {
            Ok(reader) => reader,
            Err(err) => {
                return Err(Error::Io {
                    path,
                    location,
                    err,
                })
            }
        };
        self.lexer.reader_mut().insert(reader);
        // Every file starts at the beginning of a line.
        self.lexer.set_read_state(ReadState::LineBegin);
        Ok(())
    }
}

fn resolve(base_dir: &Path, file_name: &str) -> PathBuf {
    let mut path = base_dir.join(file_name);
    if path.extension().is_none() {
        path.set_extension("tex");
    }
    path
}

/// Iterating yields tokens until the input, including all inputted files, is exhausted.
impl<F: CatCodeFn> Iterator for Expander<F> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_token() {
            Err(Error::Lex(err)) if err.is_exhausted() => None,
            result => Some(result),
        }
    }
}
