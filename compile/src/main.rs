use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use pecab::errors::PecabError;
use pecab::{Dictionary, SystemDictionaryBuilder};

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    version,
    about = "A program to build the system dictionary."
)]
struct Args {
    /// System lexicon file (lex.csv).
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// Matrix definition file (matrix.def).
    #[clap(short = 'm', long)]
    matrix_in: PathBuf,

    /// Character definition file (char.def).
    #[clap(short = 'c', long)]
    char_in: PathBuf,

    /// Unknown word definition file (unk.def).
    #[clap(short = 'u', long)]
    unk_in: PathBuf,

    /// File to which the binary dictionary is output (in zstd).
    #[clap(short = 'o', long)]
    sysdic_out: PathBuf,

    /// Compression level of zstd.
    #[clap(long, default_value = "19")]
    level: i32,
}

#[derive(Debug, thiserror::Error)]
enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Dictionary building failed: {0}")]
    Pecab(#[from] PecabError),
}

fn build_dictionary(args: &Args) -> Result<Dictionary, BuildError> {
    Ok(SystemDictionaryBuilder::from_readers(
        File::open(&args.lexicon_in)?,
        File::open(&args.matrix_in)?,
        File::open(&args.char_in)?,
        File::open(&args.unk_in)?,
    )?)
}

fn main() -> Result<(), BuildError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Compiling the system dictionary...");
    let dict = build_dictionary(&args)?;
    log::info!("{} words", dict.num_words());

    log::info!("Writing the system dictionary...");
    let file = File::create(&args.sysdic_out)?;
    let mut encoder = zstd::Encoder::new(file, args.level)?;
    dict.write(&mut encoder)?;
    encoder.finish()?;

    log::info!(
        "Successfully built the dictionary to {}",
        args.sysdic_out.display()
    );
    Ok(())
}
