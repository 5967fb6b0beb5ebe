use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rsa_stream::rsa::bigint::bit_length;
use rsa_stream::util::file_ops::{load_public_key, open_input, open_output, DEFAULT_PUBLIC_KEY};
use rsa_stream::util::init_logger;

/// Encrypts a file from input to output.
#[derive(Parser, Debug)]
#[command(name = "encrypt", version)]
struct Args {
    /// Input file to encrypt (default: stdin)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file for the ciphertext (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Public key file
    #[arg(short = 'n', long = "pbfile", default_value = DEFAULT_PUBLIC_KEY)]
    pbfile: PathBuf,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let key = load_public_key(&args.pbfile)
        .with_context(|| format!("cannot read public key `{}`", args.pbfile.display()))?;

    info!("user = {}", key.owner);
    info!("s ({} bits) = {}", bit_length(&key.signature), key.signature);
    info!("n ({} bits) = {}", bit_length(&key.n), key.n);
    info!("e ({} bits) = {}", bit_length(&key.e), key.e);

    key.verify_owner()?;

    let mut input = open_input(args.input.as_deref())?;
    let mut output = open_output(args.output.as_deref())?;
    let blocks = key.encrypt_file(&mut input, &mut output)?;
    info!("{} blocks written", blocks);

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
