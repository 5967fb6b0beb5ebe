use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rsa_stream::rsa::bigint::bit_length;
use rsa_stream::rsa::{generate_keypair, KeygenConfig};
use rsa_stream::util::file_ops::{save_keypair, DEFAULT_PRIVATE_KEY, DEFAULT_PUBLIC_KEY};
use rsa_stream::util::init_logger;

/// Generates an RSA public/private key pair.
#[derive(Parser, Debug)]
#[command(name = "keygen", version)]
struct Args {
    /// Minimum bits needed for public key n
    #[arg(short = 'b', long, default_value_t = 256)]
    bits: u64,

    /// Miller-Rabin iterations for testing primes
    #[arg(short = 'c', long = "confidence", default_value_t = 50)]
    iters: u64,

    /// Public key file
    #[arg(short = 'n', long = "pbfile", default_value = DEFAULT_PUBLIC_KEY)]
    pbfile: PathBuf,

    /// Private key file
    #[arg(short = 'd', long = "pvfile", default_value = DEFAULT_PRIVATE_KEY)]
    pvfile: PathBuf,

    /// Random seed for testing (default: current time)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Key owner, base-62 characters only (default: $USER)
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let config = KeygenConfig {
        bits: args.bits,
        iters: args.iters,
        seed: args.seed,
    };
    config.validate()?;

    let owner = match &args.user {
        Some(user) => user.clone(),
        None => env::var("USER").context("USER is not set, pass --user")?,
    };

    let mut state = config.rand_state();
    info!("seed = {}", state.seed());

    let keypair = generate_keypair(&config, &owner, &mut state)
        .with_context(|| format!("cannot generate a {}-bit key for `{}`", config.bits, owner))?;
    save_keypair(&keypair, &args.pbfile, &args.pvfile)?;

    let public_key = &keypair.public_key;
    info!("user = {}", public_key.owner_value()?);
    info!("s ({} bits) = {}", bit_length(&public_key.signature), public_key.signature);
    info!("p ({} bits) = {}", bit_length(&keypair.p), keypair.p);
    info!("q ({} bits) = {}", bit_length(&keypair.q), keypair.q);
    info!("n ({} bits) = {}", bit_length(&public_key.n), public_key.n);
    info!("e ({} bits) = {}", bit_length(&public_key.e), public_key.e);
    info!(
        "d ({} bits) = {}",
        bit_length(&keypair.private_key.d),
        keypair.private_key.d
    );

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
