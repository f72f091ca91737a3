//! Category codes and category code tables.
//!
//! Every byte of TeX input is assigned one of 16 category codes before it is lexed.
//! The assignment is made using a table provided by the caller.
//! Unlike TeX itself, a table here may be partial:
//!     reading a byte that has no entry is an error rather than a silent default.

use std::collections::HashMap;

use CatCode::*;

/// Enum representing all 16 category codes in TeX.
///
/// The discriminant of each variant is the numeric code TeX uses for it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatCode {
    /// Starts a control sequence. Example: `\`.
    Escape = 0,
    /// Example: `{`.
    BeginGroup = 1,
    /// Example: `}`.
    EndGroup = 2,
    /// Example: `$`.
    MathShift = 3,
    /// Example: `&`.
    AlignmentTab = 4,
    /// Ends a line of input. Examples: line feed, carriage return.
    ///
    /// The lexer converts this to a space or to a `\par` control sequence depending on
    ///     its state, or drops it.
    /// It also terminates comments.
    EndOfLine = 5,
    /// Example: `#`.
    Parameter = 6,
    /// Example: `^`.
    ///
    /// Two identical superscript characters followed by a third character are read as
    ///     a single character; see the [categorizer](crate::categorizer) module.
    Superscript = 7,
    /// Example: `_`.
    Subscript = 8,
    /// Dropped by the lexer. Example: ASCII null.
    Ignored = 9,
    /// Example: ` `.
    Space = 10,
    /// A character that can appear in a multi-character control sequence name.
    /// Examples: `[a-zA-Z]`.
    Letter = 11,
    /// Example: `@`.
    Other = 12,
    /// Example: `~`.
    Active = 13,
    /// Starts a comment that runs to the end of the line. Example: `%`.
    Comment = 14,
    /// The lexer returns an error when it reads a character with this code.
    /// Example: ASCII delete.
    Invalid = 15,
}

impl CatCode {
    /// All category codes, ordered by numeric code.
    pub const ALL: [CatCode; 16] = [
        Escape,
        BeginGroup,
        EndGroup,
        MathShift,
        AlignmentTab,
        EndOfLine,
        Parameter,
        Superscript,
        Subscript,
        Ignored,
        Space,
        Letter,
        Other,
        Active,
        Comment,
        Invalid,
    ];
}

impl TryFrom<u8> for CatCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CatCode::ALL.get(value as usize).copied().ok_or(())
    }
}

impl std::fmt::Display for CatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, *self as u8)
    }
}

impl std::str::FromStr for CatCode {
    type Err = String;

    /// Parses either a variant name (case insensitive, e.g. `letter`) or a numeric code (e.g. `11`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(u) = s.parse::<u8>() {
            return CatCode::try_from(u)
                .map_err(|_| format!["category codes are between 0 and 15, got {u}"]);
        }
        CatCode::ALL
            .into_iter()
            .find(|cat_code| format!["{cat_code:?}"].eq_ignore_ascii_case(s))
            .ok_or_else(|| format!["unknown category code '{s}'"])
    }
}

/// Lookup of category codes.
///
/// The categorizer is generic over this trait, so any mapping can be used as a table.
pub trait CatCodeFn {
    /// Returns the category code of the byte, or [None] if the byte has no category code.
    fn cat_code(&self, b: u8) -> Option<CatCode>;
}

impl CatCodeFn for HashMap<u8, CatCode> {
    fn cat_code(&self, b: u8) -> Option<CatCode> {
        self.get(&b).copied()
    }
}

impl<T: CatCodeFn + ?Sized> CatCodeFn for &T {
    fn cat_code(&self, b: u8) -> Option<CatCode> {
        (**self).cat_code(b)
    }
}

/// A table mapping bytes to category codes.
///
/// The table may be partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatCodeTable {
    codes: [Option<CatCode>; 256],
}

impl CatCodeTable {
    /// Create a table in which no byte has a category code.
    pub fn new() -> CatCodeTable {
        CatCodeTable { codes: [None; 256] }
    }

    /// The default table of this crate.
    ///
    /// This is [initex](CatCodeTable::initex) with `^` mapped to [Superscript],
    ///     so that the `^^` notation works out of the box.
    /// Bytes outside of the ASCII range have no category code.
    pub fn reference() -> CatCodeTable {
        let mut table = CatCodeTable::initex();
        table.insert(b'^', Superscript);
        table
    }

    /// Category codes for ASCII characters in INITEX.
    ///
    /// See section 232 of "TeX: the program" and p343 of the TeXBook.
    /// Both line feed and carriage return are mapped to [EndOfLine].
    pub fn initex() -> CatCodeTable {
        let mut table = CatCodeTable::new();
        for b in 0..128_u8 {
            table.insert(b, Other);
        }
        for b in (b'A'..=b'Z').chain(b'a'..=b'z') {
            table.insert(b, Letter);
        }
        table.insert(b'\\', Escape);
        table.insert(b' ', Space);
        table.insert(b'%', Comment);
        table.insert(0, Ignored);
        table.insert(b'\n', EndOfLine);
        table.insert(b'\r', EndOfLine);
        table.insert(127, Invalid);
        table
    }

    /// Category codes for ASCII characters in plainTeX.
    ///
    /// These are the INITEX codes with the changes plain.tex makes on startup.
    pub fn plain_tex() -> CatCodeTable {
        let mut table = CatCodeTable::initex();
        for (b, cat_code) in [
            (b'{', BeginGroup),
            (b'}', EndGroup),
            (b'$', MathShift),
            (b'&', AlignmentTab),
            (b'#', Parameter),
            (b'^', Superscript),
            (b'_', Subscript),
            (b'~', Active),
            (b'\t', Space),
            (0x0C, Active), // form feed
        ] {
            table.insert(b, cat_code);
        }
        table
    }

    #[inline]
    pub fn get(&self, b: u8) -> Option<CatCode> {
        self.codes[b as usize]
    }

    /// Set the category code of a byte, returning the previous code.
    pub fn insert(&mut self, b: u8, cat_code: CatCode) -> Option<CatCode> {
        self.codes[b as usize].replace(cat_code)
    }

    /// Remove the category code of a byte, returning the previous code.
    pub fn remove(&mut self, b: u8) -> Option<CatCode> {
        self.codes[b as usize].take()
    }

    /// Assign a category code to every byte that doesn't have one.
    pub fn fill_unset(&mut self, cat_code: CatCode) {
        for code in self.codes.iter_mut().filter(|code| code.is_none()) {
            *code = Some(cat_code);
        }
    }

    /// Iterate over all bytes that have a category code.
    pub fn iter(&self) -> impl Iterator<Item = (u8, CatCode)> + '_ {
        (0..=255_u8).filter_map(|b| self.get(b).map(|cat_code| (b, cat_code)))
    }
}

impl Default for CatCodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CatCodeFn for CatCodeTable {
    #[inline]
    fn cat_code(&self, b: u8) -> Option<CatCode> {
        self.get(b)
    }
}

impl FromIterator<(u8, CatCode)> for CatCodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, CatCode)>>(iter: I) -> Self {
        let mut table = CatCodeTable::new();
        for (b, cat_code) in iter {
            table.insert(b, cat_code);
        }
        table
    }
}
