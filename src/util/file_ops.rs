// File Operations for RSA Encryption/Decryption
// Opens key files and data streams, always returning a result that
// names the failing path.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{Result, RsaError};
use crate::rsa::keyfile::{read_priv, read_pub, write_priv, write_pub};
use crate::rsa::keygen::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};

pub const DEFAULT_PUBLIC_KEY: &str = "rsa.pub";
pub const DEFAULT_PRIVATE_KEY: &str = "rsa.priv";

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> RsaError + '_ {
    move |source| RsaError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Open `path` for reading, or stdin when no path is given
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(io_error(path))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Create (truncating) `path` for writing, or stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(io_error(path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Create a public key file
pub fn create_public_key_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(io_error(path))?;
    Ok(BufWriter::new(file))
}

/// Create a private key file readable and writable by the owner only
pub fn create_private_key_file(path: &Path) -> Result<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path).map_err(io_error(path))?;

    // An existing file keeps its old mode through `open`
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(io_error(path))?;
    }

    Ok(BufWriter::new(file))
}

/// Write both halves of a key pair to their files
pub fn save_keypair(keypair: &RsaKeyPair, pub_path: &Path, priv_path: &Path) -> Result<()> {
    let mut priv_file = create_private_key_file(priv_path)?;
    write_priv(&keypair.private_key, &mut priv_file)?;

    let written = create_public_key_file(pub_path)
        .and_then(|mut pub_file| write_pub(&keypair.public_key, &mut pub_file));
    if let Err(e) = written {
        // Leave no private key behind without its public half
        drop(priv_file);
        let _ = std::fs::remove_file(priv_path);
        return Err(e);
    }

    debug!(
        "wrote public key to {} and private key to {}",
        pub_path.display(),
        priv_path.display()
    );
    Ok(())
}

/// Read a public key file
pub fn load_public_key(path: &Path) -> Result<RsaPublicKey> {
    let file = File::open(path).map_err(io_error(path))?;
    read_pub(&mut BufReader::new(file))
}

/// Read a private key file
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey> {
    let file = File::open(path).map_err(io_error(path))?;
    read_priv(&mut BufReader::new(file))
}
