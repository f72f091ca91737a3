//! Random TeX input for measuring the throughput of the lexer.

use rand::prelude::Distribution;
use rand::Rng;
use texlex::{CatCodeTable, Categorizer, Lexer, NestedReader};

/// Lexes the input using the plain TeX category codes and returns the number of tokens.
pub fn run_in_texlex(input: &[u8]) -> usize {
    let reader = NestedReader::from_bytes("input.tex", input.to_vec());
    let lexer = Lexer::new(Categorizer::new(reader, CatCodeTable::plain_tex()));
    lexer.filter(Result::is_ok).count()
}

static RANDOM_CS_NAMES: [&str; 12] = [
    "def", "let", "ifnum", "else", "fi", "advance", "relax", "hbox", "vskip", "par", "input",
    "end",
];

/// Relative frequencies of the pieces of a random document.
pub struct Weights {
    pub letter: u32,
    pub other: u32,
    pub space: u32,
    pub group: u32,
    pub control_sequence: u32,
    pub control_symbol: u32,
    pub superscript_notation: u32,
    pub comment: u32,
    pub empty_line: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            letter: 200,
            other: 60,
            space: 40,
            group: 20,
            control_sequence: 50,
            control_symbol: 10,
            superscript_notation: 5,
            comment: 3,
            empty_line: 2,
        }
    }
}

/// Generates a random document of roughly `num_bytes` bytes.
///
/// Lines have lengths within `line_length_bounds`.
pub fn generate_random_tex_document(
    rng: &mut rand::prelude::StdRng,
    num_bytes: usize,
    line_length_bounds: (usize, usize),
    weights: &Weights,
) -> Vec<u8> {
    let dist = rand::distributions::WeightedIndex::new([
        weights.letter,
        weights.other,
        weights.space,
        weights.group,
        weights.control_sequence,
        weights.control_symbol,
        weights.superscript_notation,
        weights.comment,
        weights.empty_line,
    ])
    .unwrap();
    let (min, max) = line_length_bounds;
    let mut result: Vec<u8> = Vec::with_capacity(num_bytes + max);
    result.extend_from_slice(b"% Randomly generated input for the texlex throughput benchmark.\n");
    while result.len() < num_bytes {
        let line_length = if max <= min {
            max
        } else {
            rng.gen_range(min..=max)
        };
        let line_start = result.len();
        while result.len() - line_start < line_length {
            match dist.sample(rng) {
                0 => {
                    let offset = if rng.gen_range(0..4) == 0 { b'A' } else { b'a' };
                    result.push(offset + rng.gen_range(0..26));
                }
                1 => result.push(b"0123456789.,;:()"[rng.gen_range(0..16)]),
                2 => result.push(b' '),
                3 => result.push(if rng.gen_bool(0.5) { b'{' } else { b'}' }),
                4 => {
                    result.push(b'\\');
                    result.extend_from_slice(
                        RANDOM_CS_NAMES[rng.gen_range(0..RANDOM_CS_NAMES.len())].as_bytes(),
                    );
                    result.push(b' ');
                }
                5 => {
                    result.push(b'\\');
                    result.push(b"{}$&#%\\ "[rng.gen_range(0..8)]);
                }
                6 => {
                    result.extend_from_slice(b"^^");
                    result.push(rng.gen_range(0x21..0x7F));
                }
                7 => {
                    result.extend_from_slice(b"% a comment");
                    break;
                }
                _ => {
                    result.push(b'\n');
                    break;
                }
            }
        }
        result.push(b'\n');
    }
    result
}
