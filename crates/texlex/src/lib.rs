//! # texlex: the input stage of TeX
//!
//! This crate implements the first three stages of reading TeX input:
//!
//! 1. [read]: a [NestedReader] presenting a tree of byte inputs (files that `\input` other files)
//!     as a single byte stream, with per-source locations.
//!
//! 1. [categorizer]: a [Categorizer] assigning a [CatCode] to each byte,
//!     including TeX's `^^` notation for writing characters using three bytes.
//!
//! 1. [lexer]: a [Lexer] converting categorized characters into [Token]s,
//!     applying TeX's rules for spaces, end of lines, comments and control sequences.
//!
//! Each stage wraps the previous one and exposes it mutably,
//!     so new input can be inserted while lexing.
//!
//! ```
//! use texlex::{CatCodeTable, Categorizer, Lexer, NestedReader, Token};
//!
//! let reader = NestedReader::from_bytes("hello.tex", br"\hello{world}".to_vec());
//! let mut lexer = Lexer::new(Categorizer::new(reader, CatCodeTable::plain_tex()));
//! let tokens: Vec<String> = lexer
//!     .by_ref()
//!     .map(|token| token.unwrap().to_string())
//!     .collect();
//! assert_eq![tokens, vec!["\\hello", "{", "w", "o", "r", "l", "d", "}"]];
//! ```
//!
//! ## Features
//!
//! - `serde`: serialization of category codes, characters, locations and tokens.
//! - `arbitrary`: random generation of category codes, used for fuzzing.

pub mod catcode;
pub mod categorizer;
mod error;
pub mod lexer;
pub mod read;

pub use catcode::{CatCode, CatCodeFn, CatCodeTable};
pub use categorizer::{Categorizer, CharCat};
pub use error::Error;
pub use lexer::{ControlSequenceCall, Lexer, ReadState, Token};
pub use read::{ByteSource, FancyByte, Location, NestedReader};
