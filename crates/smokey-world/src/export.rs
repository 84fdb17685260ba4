//! Frame export for headless runs.

use smokey_core::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write an RGBA8 frame as a binary PPM (P6). Alpha is dropped.
pub fn write_ppm<W: Write>(out: &mut W, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(Error::InvalidDimensions {
            width,
            height,
            cells: rgba.len() / 4,
        });
    }

    write!(out, "P6\n{} {}\n255\n", width, height)?;
    for pixel in rgba.chunks_exact(4) {
        out.write_all(&pixel[..3])?;
    }
    out.flush()?;
    Ok(())
}

/// File name for the frame produced by a given tick.
pub fn frame_path(dir: impl AsRef<Path>, tick: u64) -> PathBuf {
    dir.as_ref().join(format!("frame_{:06}.ppm", tick))
}

/// Write a frame to `dir`, named after `tick`.
pub fn save_frame(
    dir: impl AsRef<Path>,
    tick: u64,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<PathBuf> {
    let path = frame_path(dir, tick);
    let mut out = BufWriter::new(File::create(&path)?);
    write_ppm(&mut out, width, height, rgba)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_layout() {
        let rgba = [255, 0, 0, 255, 1, 2, 3, 255];
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 1, &rgba).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[255, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_ppm_size_mismatch() {
        let mut out = Vec::new();
        assert!(write_ppm(&mut out, 2, 2, &[0; 8]).is_err());
    }

    #[test]
    fn test_frame_path() {
        assert_eq!(
            frame_path("out", 42),
            Path::new("out").join("frame_000042.ppm")
        );
    }
}
