use rand::SeedableRng;
use std::io::Write;

fn main() {
    let weights = Default::default();
    let mut rng = rand::prelude::StdRng::seed_from_u64(43);
    let document = performance::generate_random_tex_document(&mut rng, 10_000, (80, 100), &weights);
    if let Err(err) = std::io::stdout().write_all(&document) {
        eprintln!("failed to write document: {err}");
        std::process::exit(1);
    }
}
