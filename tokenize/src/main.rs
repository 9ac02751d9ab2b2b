use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use pecab::errors::PecabError;
use pecab::{Analyzer, Dictionary, Tokenizer};

#[derive(Clone, Copy, Debug)]
enum OutputMode {
    Pos,
    Morphs,
    Nouns,
    Detail,
}

impl FromStr for OutputMode {
    type Err = &'static str;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "pos" => Ok(Self::Pos),
            "morphs" => Ok(Self::Morphs),
            "nouns" => Ok(Self::Nouns),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "tokenize",
    version,
    about = "Predicts morphemes of sentences read from stdin."
)]
struct Args {
    /// System dictionary (in zstd).
    #[clap(short = 'i', long)]
    sysdic: PathBuf,

    /// User dictionary, one entry per line.
    #[clap(short = 'u', long)]
    userdic: Option<PathBuf>,

    /// Splits compound and inflected words into their morphemes.
    #[clap(long)]
    split_compound: bool,

    /// Keeps unknown words grouped instead of splitting them into characters.
    #[clap(long)]
    group_unknown: bool,

    /// Output mode. Choices are pos, morphs, nouns, and detail.
    #[clap(short = 'O', long, default_value = "pos")]
    output_mode: OutputMode,

    /// Outputs space tokens too.
    #[clap(long)]
    keep_space: bool,
}

#[derive(Debug, thiserror::Error)]
enum TokenizeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Pecab(#[from] PecabError),
}

fn read_user_entries(path: &Path) -> Result<Vec<String>, TokenizeError> {
    let mut entries = vec![];
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        let entry = line.trim();
        if !entry.is_empty() && !entry.starts_with('#') {
            entries.push(entry.to_string());
        }
    }
    Ok(entries)
}

fn write_analysis<W>(
    out: &mut W,
    analyzer: &mut Analyzer,
    line: &str,
    mode: OutputMode,
    drop_space: bool,
) -> io::Result<()>
where
    W: Write,
{
    match mode {
        OutputMode::Pos => {
            let pos: Vec<_> = analyzer
                .pos(line, drop_space)
                .into_iter()
                .map(|(surface, tag)| format!("{surface}/{tag}"))
                .collect();
            writeln!(out, "{}", pos.join(" "))?;
        }
        OutputMode::Morphs => {
            writeln!(out, "{}", analyzer.morphs(line, drop_space).join(" "))?;
        }
        OutputMode::Nouns => {
            writeln!(out, "{}", analyzer.nouns(line, drop_space).join(" "))?;
        }
        OutputMode::Detail => {
            let tokens = analyzer.tokenize(line);
            for t in tokens.iter().filter(|t| !(drop_space && t.is_space())) {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{:?}",
                    t.surface(),
                    t.pos_tag(),
                    t.pos_type(),
                    t.lex_type(),
                    t.range_char(),
                )?;
            }
            writeln!(out, "EOS")?;
        }
    }
    Ok(())
}

fn main() -> Result<(), TokenizeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    log::info!("Loading the dictionary...");
    let reader = zstd::Decoder::new(File::open(&args.sysdic)?)?;
    let dict = Dictionary::read(reader)?;

    let mut tokenizer = Tokenizer::new(dict)
        .split_compound(args.split_compound)
        .unknown_unigrams(!args.group_unknown);
    if let Some(path) = &args.userdic {
        let entries = read_user_entries(path)?;
        log::info!("{} user entries", entries.len());
        tokenizer = tokenizer.user_dictionary(entries)?;
    }
    let mut analyzer = Analyzer::new(tokenizer);

    log::info!("Ready to tokenize");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    for line in io::stdin().lock().lines() {
        let line = line?;
        write_analysis(
            &mut out,
            &mut analyzer,
            &line,
            args.output_mode,
            !args.keep_space,
        )?;
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
