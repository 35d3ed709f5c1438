// State file reading/writing with gzip detection and plain-text fallback.
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, info, warn};

use crate::core::error::{Error, io_error};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateEncoding {
    Gzip,
    Plain,
}

/// Reads a state file, returning the JSON text bytes.
pub fn read_state(path: &Path) -> Result<(Vec<u8>, StateEncoding), Error> {
    let bytes = fs::read(path).map_err(|err| io_error(err, "read state file", path))?;
    let (text, encoding) = inflate(bytes);
    debug!(path = %path.display(), ?encoding, bytes = text.len(), "read state file");
    Ok((text, encoding))
}

/// Gunzips `bytes` when they look compressed; anything that fails to inflate is
/// returned untouched and treated as plain text.
pub fn inflate(bytes: Vec<u8>) -> (Vec<u8>, StateEncoding) {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return (bytes, StateEncoding::Plain);
    }
    let mut text = Vec::new();
    let inflated = MultiGzDecoder::new(bytes.as_slice()).read_to_end(&mut text);
    match inflated {
        Ok(_) => (text, StateEncoding::Gzip),
        Err(err) => {
            debug!(error = %err, "gzip decode failed; reading as plain text");
            (bytes, StateEncoding::Plain)
        }
    }
}

/// Writes wire text, gzip first; falls back to plain text if compression fails.
pub fn write_state(path: &Path, text: &[u8]) -> Result<StateEncoding, Error> {
    write_state_with(path, text, write_gzip)
}

fn write_state_with(
    path: &Path,
    text: &[u8],
    gzip: impl FnOnce(&Path, &[u8]) -> io::Result<()>,
) -> Result<StateEncoding, Error> {
    match gzip(path, text) {
        Ok(()) => {
            info!(path = %path.display(), "wrote gzip state file");
            Ok(StateEncoding::Gzip)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "gzip write failed; writing plain text");
            fs::write(path, text).map_err(|err| io_error(err, "write state file", path))?;
            info!(path = %path.display(), "wrote plain state file");
            Ok(StateEncoding::Plain)
        }
    }
}

fn write_gzip(path: &Path, text: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(text)?;
    let mut writer = encoder.finish()?;
    writer.flush()
}

pub fn read_canonical(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|err| io_error(err, "read canonical json", path))
}

pub fn write_canonical(path: &Path, text: &str) -> Result<(), Error> {
    fs::write(path, text).map_err(|err| io_error(err, "write canonical json", path))?;
    info!(path = %path.display(), "wrote canonical json");
    Ok(())
}
