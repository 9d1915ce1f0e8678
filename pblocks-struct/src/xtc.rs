//! XTC trajectory frames through the pure-Rust `molly` reader.
//!
//! XTC stores compressed single-precision coordinates in nanometers; frames
//! returned here are in Angstroms so they can be handed directly to
//! [`Topology::chain_from_positions`](crate::gro::Topology::chain_from_positions).
//!
//! [`XtcReader`] decodes one frame at a time, so a trajectory never has to
//! fit in memory.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use molly::{Frame, XTCReader};
use pblocks_core::{PbError, Result};

use crate::gro::NM_TO_ANGSTROM;

use alloc::format;
use alloc::vec::Vec;

/// One decoded trajectory frame.
#[derive(Debug, Clone)]
pub struct XtcFrame {
    /// Simulation step.
    pub step: u32,
    /// Simulation time in ps.
    pub time: f32,
    /// Flat `x, y, z` coordinates in Angstroms.
    pub positions: Vec<f32>,
}

impl XtcFrame {
    /// Number of atoms in the frame.
    pub fn atom_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Streaming reader over the frames of an XTC file.
///
/// Frames are decoded into one reused buffer; iteration stops at the end of
/// the file.
pub struct XtcReader {
    path: PathBuf,
    inner: XTCReader<File>,
    buffer: Frame,
    frames_read: usize,
    done: bool,
}

impl XtcReader {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// [`PbError::Io`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = XTCReader::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            buffer: Frame::default(),
            frames_read: 0,
            done: false,
        })
    }

    /// Number of frames decoded so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Decode the next frame, or `None` at the end of the file.
    ///
    /// # Errors
    ///
    /// [`PbError::Parse`] when a frame cannot be decoded. The reader is
    /// exhausted afterwards.
    pub fn next_frame(&mut self) -> Result<Option<XtcFrame>> {
        if self.done {
            return Ok(None);
        }
        if let Err(e) = self.inner.read_frame(&mut self.buffer) {
            self.done = true;
            if e.kind() == io::ErrorKind::UnexpectedEof {
                log::debug!("read {} XTC frame(s) from {}", self.frames_read, self.path.display());
                return Ok(None);
            }
            return Err(PbError::Parse(format!(
                "cannot decode XTC {} frame {}: {}",
                self.path.display(),
                self.frames_read,
                e
            )));
        }

        self.frames_read += 1;
        let scale = NM_TO_ANGSTROM as f32;
        Ok(Some(XtcFrame {
            step: self.buffer.step,
            time: self.buffer.time,
            positions: self.buffer.positions.iter().map(|nm| nm * scale).collect(),
        }))
    }
}

impl Iterator for XtcReader {
    type Item = Result<XtcFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Read every frame of an XTC file.
///
/// Prefer [`XtcReader`] for long trajectories.
///
/// # Errors
///
/// [`PbError::Io`] when the file cannot be opened and [`PbError::Parse`]
/// when a frame cannot be decoded.
pub fn read_xtc(path: impl AsRef<Path>) -> Result<Vec<XtcFrame>> {
    XtcReader::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Big-endian bytes of an uncompressed XTC frame (nine atoms or fewer).
    fn small_xtc_frame(step: u32, time: f32, positions_nm: &[f32]) -> Vec<u8> {
        let natoms = (positions_nm.len() / 3) as u32;
        assert!(natoms <= 9, "only small frames are stored uncompressed");
        let mut bytes = Vec::new();
        bytes.extend(1995i32.to_be_bytes());
        bytes.extend(natoms.to_be_bytes());
        bytes.extend(step.to_be_bytes());
        bytes.extend(time.to_be_bytes());
        for value in [5.0f32, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 5.0] {
            bytes.extend(value.to_be_bytes());
        }
        bytes.extend(natoms.to_be_bytes());
        for value in positions_nm {
            bytes.extend(value.to_be_bytes());
        }
        bytes
    }

    fn write_trajectory(frames: &[Vec<u8>]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), frames.concat()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_xtc("/nonexistent/traj.xtc").unwrap_err();
        assert!(matches!(err, PbError::Io(_)));
    }

    #[test]
    fn atom_count_from_positions() {
        let frame = XtcFrame {
            step: 0,
            time: 0.0,
            positions: vec![0.0; 12],
        };
        assert_eq!(frame.atom_count(), 4);
    }

    #[test]
    fn frames_stream_in_order() {
        let file = write_trajectory(&[
            small_xtc_frame(0, 0.0, &[0.1, 0.2, 0.3, 1.0, 1.0, 1.0]),
            small_xtc_frame(500, 1.0, &[0.2, 0.2, 0.3, 1.5, 1.0, 1.0]),
        ]);
        let mut reader = XtcReader::open(file.path()).unwrap();

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.step, 0);
        assert_eq!(first.atom_count(), 2);
        assert!((first.positions[0] - 1.0).abs() < 1e-5);
        assert_eq!(reader.frames_read(), 1);

        let second = reader.next_frame().unwrap().unwrap();
        assert_eq!(second.step, 500);
        assert!((second.time - 1.0).abs() < 1e-6);
        assert!((second.positions[3] - 15.0).abs() < 1e-5);

        assert!(reader.next_frame().unwrap().is_none());
        assert!(reader.next_frame().unwrap().is_none());
        assert_eq!(reader.frames_read(), 2);
    }

    #[test]
    fn read_xtc_collects_every_frame() {
        let file = write_trajectory(&[
            small_xtc_frame(0, 0.0, &[0.0; 9]),
            small_xtc_frame(10, 0.02, &[0.0; 9]),
            small_xtc_frame(20, 0.04, &[0.0; 9]),
        ]);
        let frames = read_xtc(file.path()).unwrap();
        let steps: Vec<u32> = frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, [0, 10, 20]);
    }

    #[test]
    fn bad_magic_is_parse_error() {
        let mut bytes = small_xtc_frame(0, 0.0, &[0.0; 3]);
        bytes[..4].copy_from_slice(&42i32.to_be_bytes());
        let file = write_trajectory(&[bytes]);
        let mut reader = XtcReader::open(file.path()).unwrap();
        assert!(matches!(reader.next(), Some(Err(PbError::Parse(_)))));
        assert!(reader.next().is_none());
    }
}
