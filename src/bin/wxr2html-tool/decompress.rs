use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

const THEME_ARCHIVE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/res.tar.gz"));

pub fn decompress_files(output: &Path) -> Result<(), std::io::Error> {
    let tar = GzDecoder::new(THEME_ARCHIVE);
    let mut archive = Archive::new(tar);
    archive.unpack(output)?;

    Ok(())
}
