use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use texlex::{
    ByteSource, CatCode, CatCodeTable, Categorizer, Error, Lexer, Location, NestedReader, Token,
};

mod input;

fn main() {
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Print the output of each stage of TeX input processing.
///
/// TeX reads input in three stages.
/// First, bytes are read from a stack of files.
/// Second, each byte is assigned a category code;
///     at this stage the `^^` notation is applied, so `^^M` becomes a single
///     carriage return character.
/// Third, categorized characters are lexed into tokens:
///     control sequences like `\def`, and characters.
///
/// Each subcommand prints the output of one stage,
///     one line per byte, character or token, prefixed by its location.
#[derive(Debug, Parser)]
#[command(
    name = "texlex",
    author = "The Texcraft Project",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Category code table to use.
    #[arg(long, global = true, value_enum, default_value_t = Catcodes::Reference)]
    catcodes: Catcodes,

    /// Category code to assign to bytes without one, which are bytes 128 through 255.
    ///
    /// Either a name like `letter` or a number like `11`.
    /// By default these bytes have no category code and reading them is an error.
    #[arg(long, global = true)]
    high_bytes: Option<CatCode>,

    /// A file to insert at the start of the input.
    ///
    /// May be given multiple times. Each file is inserted in turn,
    ///     so the last file given is read first.
    #[arg(short = 'i', long, global = true)]
    insert: Vec<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debugging events to stderr.
    ///
    /// Logging can also be configured using the `RUST_LOG` environment variable.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Catcodes {
    /// INITEX codes with `^` as a superscript character.
    Reference,
    /// INITEX codes.
    Initex,
    /// Codes set by plain.tex.
    Plain,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Print each byte of the input.
    Bytes(Bytes),

    /// Print each character of the input with its category code.
    ///
    /// The `^^` notation is applied. The last column is the number of bytes
    ///     the character was read from.
    Chars(Chars),

    /// Print each token of the input.
    Tokens(Tokens),
}

#[derive(Clone, Debug, clap::Args)]
struct Bytes {
    /// Path to the TeX file.
    path: PathBuf,
}

#[derive(Clone, Debug, clap::Args)]
struct Chars {
    /// Path to the TeX file.
    path: PathBuf,
}

#[derive(Clone, Debug, clap::Args)]
struct Tokens {
    /// Path to the TeX file.
    path: PathBuf,

    /// Name of a control sequence that inputs a file, like `input`.
    ///
    /// When this control sequence is read, the following file name is read
    ///     and the tokens of that file are printed next.
    /// File names end at a space, which is consumed, or at any token other than a letter
    ///     or other character.
    /// If the file name has no extension, `.tex` is added.
    /// Relative paths are resolved against the directory of the input file.
    #[arg(long)]
    input_cs: Option<String>,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        init_tracing(self.verbose);
        if self.no_color {
            colored::control::set_override(false);
        }
        let mut table = match self.catcodes {
            Catcodes::Reference => CatCodeTable::reference(),
            Catcodes::Initex => CatCodeTable::initex(),
            Catcodes::Plain => CatCodeTable::plain_tex(),
        };
        if let Some(cat_code) = self.high_bytes {
            table.fill_unset(cat_code);
        }
        let path = match &self.command {
            Command::Bytes(bytes) => &bytes.path,
            Command::Chars(chars) => &chars.path,
            Command::Tokens(tokens) => &tokens.path,
        };
        let mut reader = open(path)?;
        for path in &self.insert {
            reader.insert(open(path)?);
        }
        let mut out = std::io::stdout().lock();
        match self.command {
            Command::Bytes(_) => print_bytes(reader, &mut out),
            Command::Chars(_) => print_chars(Categorizer::new(reader, table), &mut out),
            Command::Tokens(tokens) => {
                let lexer = Lexer::new(Categorizer::new(reader, table));
                match tokens.input_cs {
                    None => print_tokens(lexer.map(|r| r.map_err(input::Error::from)), &mut out),
                    Some(input_cs) => {
                        let base_dir = tokens
                            .path
                            .parent()
                            .map(Path::to_path_buf)
                            .unwrap_or_default();
                        let expander = input::Expander::new(lexer, input_cs, base_dir);
                        print_tokens(expander, &mut out)
                    }
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) if verbose => EnvFilter::new("texlex=trace"),
        Err(_) => return,
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn open(path: &Path) -> Result<NestedReader, String> {
    NestedReader::from_path(path)
        .map_err(|err| error_message(format!["failed to read {}: {err}", path.display()]))
}

fn error_message(err: impl std::fmt::Display) -> String {
    format!["{}: {err}", "error".bright_red().bold()]
}

fn write_err(err: std::io::Error) -> String {
    error_message(format!["failed to write output: {err}"])
}

fn location(location: &Location) -> colored::ColoredString {
    location.to_string().dimmed()
}

fn print_bytes(mut reader: NestedReader, out: &mut impl Write) -> Result<(), String> {
    loop {
        let fancy_byte = match reader.read_fancy_byte() {
            Ok(fancy_byte) => fancy_byte,
            Err(Error::Exhausted { .. }) => return Ok(()),
            Err(err) => return Err(error_message(err)),
        };
        writeln!(
            out,
            "{}\tU+{:04X}\t{:?}",
            location(&fancy_byte.location),
            fancy_byte.byte,
            char::from(fancy_byte.byte)
        )
        .map_err(write_err)?;
    }
}

fn print_chars(
    mut categorizer: Categorizer<NestedReader>,
    out: &mut impl Write,
) -> Result<(), String> {
    loop {
        let char_cat = match categorizer.read_char_cat_trio() {
            Ok(char_cat) => char_cat,
            Err(Error::Exhausted { .. }) => return Ok(()),
            Err(err) => return Err(error_message(err)),
        };
        writeln!(
            out,
            "{}\tU+{:04X}\t{:?}\t{:?}\t{}",
            location(&char_cat.location),
            char_cat.char,
            char::from(char_cat.char),
            char_cat.cat_code,
            char_cat.length,
        )
        .map_err(write_err)?;
    }
}

fn print_tokens(
    tokens: impl Iterator<Item = Result<Token, input::Error>>,
    out: &mut impl Write,
) -> Result<(), String> {
    for token in tokens {
        let token = token.map_err(error_message)?;
        let result = match &token {
            Token::ControlSequence(call) => writeln!(
                out,
                "{}\t{}",
                location(&call.location),
                format!["\\{}", call.name].bold()
            ),
            Token::Character(char_cat) => writeln!(
                out,
                "{}\t{:?}\t{:?}",
                location(&char_cat.location),
                char::from(char_cat.char),
                char_cat.cat_code,
            ),
        };
        result.map_err(write_err)?;
    }
    Ok(())
}
