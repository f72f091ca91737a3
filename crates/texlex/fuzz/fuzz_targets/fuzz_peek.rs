#![no_main]

use libfuzzer_sys::fuzz_target;
use texlex::{ByteSource, NestedReader};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Read,
    Peek(u8),
    Insert(Vec<u8>),
}

fuzz_target!(|input: (Vec<u8>, Vec<Op>)| {
    let (bytes, ops) = input;
    let mut reader = NestedReader::from_bytes("input.tex", bytes.clone());
    let mut want = bytes;
    let mut i = 0_usize;
    for op in ops {
        match op {
            Op::Read => {
                assert_eq!(reader.read_byte().ok(), want.get(i).copied());
                if i < want.len() {
                    i += 1;
                }
            }
            Op::Peek(n) => {
                let n = n as usize;
                match reader.peek_byte(n) {
                    Ok(b) => assert_eq!(Some(&b), want.get(i + n - 1)),
                    Err(texlex::Error::InvalidPeekDistance(m)) => assert_eq!((m, n), (0, 0)),
                    Err(texlex::Error::Exhausted { bytes_read }) => {
                        assert_eq!(bytes_read, want.len() - i);
                        assert!(n > bytes_read);
                    }
                    Err(err) => panic!("unexpected error {err}"),
                }
            }
            Op::Insert(inserted) => {
                want.splice(i..i, inserted.iter().copied());
                reader.insert(NestedReader::from_bytes("inserted.tex", inserted));
            }
        }
        assert_eq!(reader.remaining(), want.len() - i);
    }
});
