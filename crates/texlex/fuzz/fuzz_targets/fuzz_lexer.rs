#![no_main]

use libfuzzer_sys::fuzz_target;
use texlex::{CatCode, CatCodeTable, Categorizer, Lexer, NestedReader};

#[derive(arbitrary::Arbitrary, Debug)]
struct Input {
    cat_codes: Vec<(u8, CatCode)>,
    bytes: Vec<u8>,
    // Each entry is inserted after the given number of tokens have been read.
    insertions: Vec<(u8, Vec<u8>)>,
}

fuzz_target!(|input: Input| {
    let mut table = CatCodeTable::reference();
    for (b, cat_code) in input.cat_codes {
        table.insert(b, cat_code);
    }
    let total_bytes =
        input.bytes.len() + input.insertions.iter().map(|(_, b)| b.len()).sum::<usize>();
    let mut insertions = input.insertions;
    insertions.sort_by_key(|(n, _)| *n);
    let mut insertions = insertions.into_iter().peekable();

    let reader = NestedReader::from_bytes("input.tex", input.bytes);
    let mut lexer = Lexer::new(Categorizer::new(reader, table));
    let mut bytes_lexed = 0_usize;
    let mut num_results = 0_usize;
    loop {
        while let Some((_, bytes)) = insertions.next_if(|(n, _)| *n as usize <= num_results) {
            lexer
                .reader_mut()
                .insert(NestedReader::from_bytes("inserted.tex", bytes));
        }
        match lexer.read_token() {
            Ok(token) => bytes_lexed += token.length(),
            Err(err) if err.is_exhausted() => match insertions.next() {
                None => break,
                Some((_, bytes)) => {
                    lexer
                        .reader_mut()
                        .insert(NestedReader::from_bytes("inserted.tex", bytes));
                    continue;
                }
            },
            Err(_) => {}
        }
        num_results += 1;
        // Every result consumes at least one byte.
        assert!(num_results <= total_bytes);
    }
    assert!(bytes_lexed <= total_bytes);
    assert_eq!(lexer.categorizer().reader().remaining(), 0);
});
