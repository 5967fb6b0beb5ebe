use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rsa_stream::rsa::bigint::bit_length;
use rsa_stream::util::file_ops::{load_private_key, open_input, open_output, DEFAULT_PRIVATE_KEY};
use rsa_stream::util::init_logger;

/// Decrypts a file from input to output.
#[derive(Parser, Debug)]
#[command(name = "decrypt", version)]
struct Args {
    /// Input file to decrypt (default: stdin)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file for the plaintext (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Private key file
    #[arg(short = 'n', long = "pvfile", default_value = DEFAULT_PRIVATE_KEY)]
    pvfile: PathBuf,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let key = load_private_key(&args.pvfile)
        .with_context(|| format!("cannot read private key `{}`", args.pvfile.display()))?;

    info!("n ({} bits) = {}", bit_length(&key.n), key.n);
    info!("d ({} bits) = {}", bit_length(&key.d), key.d);

    let mut input = open_input(args.input.as_deref())?;
    let mut output = open_output(args.output.as_deref())?;
    let blocks = key
        .decrypt_file(&mut input, &mut output)
        .context("decryption failed")?;
    info!("{} blocks read", blocks);

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
