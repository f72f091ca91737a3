//! Nested byte input.
//!
//! TeX input is not a single file.
//! When a document runs `\input chapter`, the contents of `chapter.tex` must be read
//!     next, and only once they are exhausted does reading continue after the `\input`
//!     in the original document.
//! The same is true recursively: `chapter.tex` may itself input other files.
//!
//! The [NestedReader] in this module models this "stack of open files" as a tree.
//! Each reader holds an ordered sequence of nodes.
//! A node is either a leaf containing raw bytes, or another whole [NestedReader].
//! Reading descends into nodes depth-first, so the tree presents a single linear
//!     stream of bytes to the caller.
//! New readers can be spliced in at the current read position using [NestedReader::insert].
//!
//! Every reader keeps its own cursor (position, line and column).
//! When a byte is read from a nested reader, its [Location] is relative to that nested reader.
//!
//! ```
//! use texlex::read::{ByteSource, NestedReader};
//!
//! let mut outer = NestedReader::from_bytes("outer.tex", b"ab".to_vec());
//! assert_eq![outer.read_byte(), Ok(b'a')];
//! outer.insert(NestedReader::from_bytes("inner.tex", b"12".to_vec()));
//! assert_eq![outer.peek_byte(3), Ok(b'b')];
//! let byte = outer.read_fancy_byte().unwrap();
//! assert_eq![byte.byte, b'1'];
//! assert_eq![&*byte.location.source, "inner.tex"];
//! ```

use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::Error;

/// The origin of a byte, character or token in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Name of the reader the byte was read from; for files, the file name.
    pub source: Arc<str>,
    /// Number of bytes read from this source before this one.
    pub position: usize,
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column number.
    pub column: usize,
}

impl std::fmt::Display for Location {
    /// Formats the location as `source:line:column`, with one-based line and column numbers.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line + 1, self.column + 1)
    }
}

/// A byte that has been read, along with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FancyByte {
    pub byte: u8,
    pub location: Location,
}

/// A source of bytes that supports reading and peeking.
pub trait ByteSource {
    /// Read the next byte, along with its location.
    fn read_fancy_byte(&mut self) -> Result<FancyByte, Error>;

    /// Return the byte that the `n`-th next read would return, without consuming any input.
    ///
    /// `peek_byte(1)` is the next byte.
    /// Peeking backwards (`n == 0`) is not supported and returns [Error::InvalidPeekDistance].
    /// If fewer than `n` bytes remain, [Error::Exhausted] is returned with the number
    ///     of bytes that are available.
    fn peek_byte(&self, n: usize) -> Result<u8, Error>;

    /// Read the next byte.
    fn read_byte(&mut self) -> Result<u8, Error> {
        Ok(self.read_fancy_byte()?.byte)
    }
}

#[derive(Debug)]
enum Node {
    Leaf { bytes: Vec<u8>, offset: usize },
    Nested(Box<NestedReader>),
}

impl Node {
    fn is_exhausted(&self) -> bool {
        match self {
            Node::Leaf { bytes, offset } => *offset >= bytes.len(),
            Node::Nested(reader) => reader.is_exhausted(),
        }
    }

    fn remaining(&self) -> usize {
        match self {
            Node::Leaf { bytes, offset } => bytes.len() - offset,
            Node::Nested(reader) => reader.remaining(),
        }
    }
}

/// A tree of byte sources that is read as a single stream of bytes.
///
/// See the module documentation for details.
#[derive(Debug)]
pub struct NestedReader {
    name: Arc<str>,
    // The front node is the one currently being read.
    // Exhausted nodes are popped off the front.
    nodes: VecDeque<Node>,
    position: usize,
    line: usize,
    column: usize,
}

impl NestedReader {
    /// Create a reader with no content.
    pub fn empty<S: Into<Arc<str>>>(name: S) -> NestedReader {
        NestedReader {
            name: name.into(),
            nodes: VecDeque::new(),
            position: 0,
            line: 0,
            column: 0,
        }
    }

    /// Create a reader over an in-memory buffer.
    pub fn from_bytes<S: Into<Arc<str>>>(name: S, bytes: Vec<u8>) -> NestedReader {
        let mut reader = NestedReader::empty(name);
        if !bytes.is_empty() {
            reader.nodes.push_back(Node::Leaf { bytes, offset: 0 });
        }
        reader
    }

    /// Create a reader over all of the bytes produced by a [Read] implementation.
    pub fn from_reader<S: Into<Arc<str>>, R: Read>(
        name: S,
        mut r: R,
    ) -> std::io::Result<NestedReader> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        Ok(NestedReader::from_bytes(name, bytes))
    }

    /// Create a reader over the contents of a file.
    ///
    /// The name of the reader is the final component of the path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<NestedReader> {
        let path = path.as_ref();
        let name = match path.file_name() {
            Some(file_name) => file_name.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        let bytes = std::fs::read(path)?;
        Ok(NestedReader::from_bytes(name, bytes))
    }

    /// Name of this reader.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes read from this reader's own content.
    ///
    /// Bytes read from nested readers are not counted.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Zero-based line number of this reader's cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Zero-based column number of this reader's cursor.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Location of the next byte to be read from this reader's own content.
    pub fn location(&self) -> Location {
        Location {
            source: self.name.clone(),
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    /// Returns true if there are no more bytes in this reader or any nested reader.
    pub fn is_exhausted(&self) -> bool {
        self.nodes.iter().all(Node::is_exhausted)
    }

    /// Number of bytes remaining in this reader, including nested readers.
    pub fn remaining(&self) -> usize {
        self.nodes.iter().map(Node::remaining).sum()
    }

    /// Insert a reader at the current read position.
    ///
    /// The insertion happens in the innermost reader that is currently being read.
    /// All of the bytes of the inserted reader are read before any of the
    ///     bytes that remain in that innermost reader.
    pub fn insert(&mut self, reader: NestedReader) {
        self.evict_exhausted();
        let tail = match self.nodes.front_mut() {
            Some(Node::Nested(inner)) => {
                inner.insert(reader);
                return;
            }
            Some(Node::Leaf { bytes, offset }) if *offset > 0 => Some(bytes.split_off(*offset)),
            _ => None,
        };
        if let Some(tail) = tail {
            // The front leaf now contains only bytes that have already been read.
            self.nodes.pop_front();
            self.nodes.push_front(Node::Leaf {
                bytes: tail,
                offset: 0,
            });
        }
        tracing::debug!(
            reader = %reader.name,
            into = %self.name,
            bytes = reader.remaining(),
            "inserting nested reader"
        );
        self.nodes.push_front(Node::Nested(Box::new(reader)));
    }

    fn evict_exhausted(&mut self) {
        while self.nodes.front().map_or(false, Node::is_exhausted) {
            if let Some(Node::Nested(inner)) = self.nodes.pop_front() {
                tracing::debug!(reader = %inner.name, "nested reader exhausted");
            }
        }
    }

    // Reads the next byte and applies `f` to it and the reader that owns it.
    //
    // The function is applied before the cursor of the owning reader is advanced.
    fn read_with<T, F: FnOnce(&NestedReader, u8) -> T>(&mut self, f: F) -> Option<T> {
        loop {
            let byte = match self.nodes.front_mut()? {
                Node::Leaf { bytes, offset } => match bytes.get(*offset) {
                    Some(&b) => {
                        *offset += 1;
                        Some(b)
                    }
                    None => None,
                },
                Node::Nested(inner) => {
                    if !inner.is_exhausted() {
                        return inner.read_with(f);
                    }
                    None
                }
            };
            match byte {
                Some(b) => {
                    let t = f(self, b);
                    self.advance_cursor(b);
                    return Some(t);
                }
                None => self.evict_exhausted(),
            }
        }
    }

    fn advance_cursor(&mut self, b: u8) {
        self.position += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    // Peeks the n-th next byte, for n >= 1.
    //
    // On failure returns the number of bytes that are available, which is less than n.
    fn peek_n(&self, n: usize) -> Result<u8, usize> {
        let mut needed = n;
        for node in &self.nodes {
            match node {
                Node::Leaf { bytes, offset } => {
                    let available = bytes.len() - offset;
                    if needed <= available {
                        return Ok(bytes[offset + needed - 1]);
                    }
                    needed -= available;
                }
                Node::Nested(inner) => match inner.peek_n(needed) {
                    Ok(b) => return Ok(b),
                    Err(supplied) => {
                        if supplied >= needed {
                            panic!(
                                "peeking {needed} bytes in nested reader {} failed, but {supplied} bytes were supplied",
                                inner.name
                            );
                        }
                        needed -= supplied;
                    }
                },
            }
        }
        Err(n - needed)
    }
}

impl ByteSource for NestedReader {
    fn read_fancy_byte(&mut self) -> Result<FancyByte, Error> {
        self.read_with(|reader, byte| FancyByte {
            byte,
            location: reader.location(),
        })
        .ok_or(Error::Exhausted { bytes_read: 0 })
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        self.read_with(|_, byte| byte)
            .ok_or(Error::Exhausted { bytes_read: 0 })
    }

    fn peek_byte(&self, n: usize) -> Result<u8, Error> {
        if n < 1 {
            return Err(Error::InvalidPeekDistance(n));
        }
        self.peek_n(n)
            .map_err(|bytes_read| Error::Exhausted { bytes_read })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;

    fn leaf(name: &str, s: &str) -> NestedReader {
        NestedReader::from_bytes(name, s.as_bytes().to_vec())
    }

    fn read_all(reader: &mut NestedReader) -> String {
        let mut s = String::new();
        while let Ok(b) = reader.read_byte() {
            s.push(b as char);
        }
        s
    }

    #[test]
    fn read_single_leaf() {
        let mut reader = leaf("a", "hello");
        assert_eq![read_all(&mut reader), "hello"];
        assert_eq![reader.read_byte(), Err(Error::Exhausted { bytes_read: 0 })];
    }

    #[test]
    fn empty_reader_is_exhausted() {
        let reader = NestedReader::empty("empty");
        assert!(reader.is_exhausted());
        assert_eq![reader.peek_byte(1), Err(Error::Exhausted { bytes_read: 0 })];
    }

    #[test]
    fn peek_zero_is_invalid() {
        let reader = leaf("a", "hello");
        assert_eq![reader.peek_byte(0), Err(Error::InvalidPeekDistance(0))];
    }

    #[test]
    fn peek_does_not_advance() {
        let mut reader = leaf("a", "abc");
        assert_eq![reader.peek_byte(1), Ok(b'a')];
        assert_eq![reader.peek_byte(3), Ok(b'c')];
        assert_eq![reader.position(), 0];
        assert_eq![reader.read_byte(), Ok(b'a')];
    }

    #[test]
    fn peek_past_end_reports_bytes_read() {
        let mut reader = leaf("a", "abcd");
        reader.read_byte().unwrap();
        assert_eq![reader.peek_byte(5), Err(Error::Exhausted { bytes_read: 3 })];
    }

    #[test]
    fn peek_past_end_across_nested_readers() {
        let mut reader = leaf("outer", "xy");
        reader.insert(leaf("inner", "12"));
        assert_eq![reader.peek_byte(4), Ok(b'y')];
        assert_eq![reader.peek_byte(7), Err(Error::Exhausted { bytes_read: 4 })];
    }

    #[test]
    fn insert_at_start() {
        let mut reader = leaf("outer", "outer");
        reader.insert(leaf("inner", "inner"));
        assert_eq![read_all(&mut reader), "innerouter"];
    }

    #[test]
    fn insert_mid_leaf() {
        let mut reader = leaf("outer", "abcd");
        reader.read_byte().unwrap();
        reader.read_byte().unwrap();
        reader.insert(leaf("inner", "12"));
        assert_eq![read_all(&mut reader), "12cd"];
    }

    #[test]
    fn insert_recurses_into_active_reader() {
        let mut reader = leaf("a", "AAAA");
        reader.read_byte().unwrap();
        reader.insert(leaf("b", "BBB"));
        assert_eq![reader.read_byte(), Ok(b'B')];
        reader.insert(leaf("c", "cc"));
        assert_eq![read_all(&mut reader), "ccBBAAA"];
    }

    #[test]
    fn insert_after_nested_reader_exhausted() {
        let mut reader = leaf("a", "xy");
        reader.insert(leaf("b", "1"));
        assert_eq![reader.read_byte(), Ok(b'1')];
        reader.insert(leaf("c", "2"));
        assert_eq![read_all(&mut reader), "2xy"];
    }

    #[test]
    fn insert_into_exhausted_reader() {
        let mut reader = leaf("a", "x");
        reader.read_byte().unwrap();
        reader.insert(leaf("b", "yz"));
        assert_eq![read_all(&mut reader), "yz"];
    }

    #[test]
    fn insert_empty_reader() {
        let mut reader = leaf("a", "xy");
        reader.insert(NestedReader::empty("b"));
        assert_eq![reader.peek_byte(1), Ok(b'x')];
        assert_eq![read_all(&mut reader), "xy"];
    }

    #[test]
    fn locations_are_per_reader() {
        let mut reader = leaf("outer", "a\nbc");
        reader.read_byte().unwrap();
        reader.read_byte().unwrap();
        reader.insert(leaf("inner", "1\n2"));
        let mut got = Vec::new();
        while let Ok(fancy_byte) = reader.read_fancy_byte() {
            let Location {
                source,
                position,
                line,
                column,
            } = fancy_byte.location;
            got.push((fancy_byte.byte, source.to_string(), position, line, column));
        }
        let want = vec![
            (b'1', "inner".to_string(), 0, 0, 0),
            (b'\n', "inner".to_string(), 1, 0, 1),
            (b'2', "inner".to_string(), 2, 1, 0),
            (b'b', "outer".to_string(), 2, 1, 0),
            (b'c', "outer".to_string(), 3, 1, 1),
        ];
        assert_eq![got, want];
        assert_eq![reader.line(), 1];
        assert_eq![reader.column(), 2];
    }

    #[test]
    fn location_display_is_one_based() {
        let mut reader = leaf("file.tex", "a\nb");
        reader.read_byte().unwrap();
        reader.read_byte().unwrap();
        let b = reader.read_fancy_byte().unwrap();
        assert_eq![b.location.to_string(), "file.tex:2:1"];
    }

    #[test]
    fn remaining_counts_nested_bytes() {
        let mut reader = leaf("a", "abc");
        reader.read_byte().unwrap();
        reader.insert(leaf("b", "12"));
        assert_eq![reader.remaining(), 4];
    }

    #[test]
    fn from_reader() {
        let mut reader = NestedReader::from_reader("cursor", std::io::Cursor::new("xyz")).unwrap();
        assert_eq![reader.name(), "cursor"];
        assert_eq![read_all(&mut reader), "xyz"];
    }

    #[test]
    fn from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("input.tex");
        std::fs::write(&path, "from a file").unwrap();
        let mut reader = NestedReader::from_path(&path).unwrap();
        assert_eq![reader.name(), "input.tex"];
        assert_eq![read_all(&mut reader), "from a file"];
    }

    #[test]
    fn from_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(NestedReader::from_path(dir.path().join("missing.tex")).is_err());
    }

    // Builds a random reader along with the string it should produce.
    // Insertions are performed at random points while reading.
    fn random_reader(rng: &mut rand::rngs::StdRng, depth: usize) -> (NestedReader, Vec<u8>) {
        let len = rng.gen_range(0..6);
        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let mut reader = NestedReader::from_bytes(format!["r{depth}"], bytes.clone());
        let mut want = bytes;
        if depth < 3 && rng.gen_bool(0.5) {
            let (child, child_want) = random_reader(rng, depth + 1);
            reader.insert(child);
            want.splice(0..0, child_want);
        }
        (reader, want)
    }

    #[test]
    fn peek_then_read_agree() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(43);
        for _ in 0..500 {
            let (mut reader, mut want) = random_reader(&mut rng, 0);
            let mut got = Vec::new();
            while !reader.is_exhausted() {
                if rng.gen_bool(0.2) {
                    let (child, child_want) = random_reader(&mut rng, 1);
                    reader.insert(child);
                    let position = got.len();
                    want.splice(position..position, child_want);
                }
                let remaining = reader.remaining();
                assert_eq![remaining, want.len() - got.len()];
                let n = rng.gen_range(1..8);
                let peeked = reader.peek_byte(n);
                if n > remaining {
                    assert_eq![peeked, Err(Error::Exhausted { bytes_read: remaining })];
                    got.extend(read_all_bytes(&mut reader));
                    break;
                }
                for _ in 0..n {
                    got.push(reader.read_byte().unwrap());
                }
                assert_eq![peeked, Ok(*got.last().unwrap())];
            }
            assert_eq![got, want];
        }
    }

    fn read_all_bytes(reader: &mut NestedReader) -> Vec<u8> {
        let mut v = Vec::new();
        while let Ok(b) = reader.read_byte() {
            v.push(b);
        }
        v
    }
}
