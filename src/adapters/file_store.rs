//! File-backed byte store for the host bench.
//!
//! The whole image lives in one file so the Fault Latch survives bench
//! restarts the way it survives a power cycle on the board.  Every write
//! goes to a sibling temp file which is synced and then renamed over the
//! image, so a crash mid-write leaves either the old or the new image.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::{debug, error, warn};

use crate::app::ports::{ByteStore, StoreError};

const SIZE: usize = 256;

pub struct FileStore {
    path: PathBuf,
    image: [u8; SIZE],
    /// The image exists but could not be read.  Reads fail until a write
    /// replaces it.
    unreadable: bool,
}

impl FileStore {
    /// Open (or lazily create) the image at `path`.  A missing or short
    /// file reads as erased cells; any other read error makes every read
    /// fail.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut image = [0xFF; SIZE];
        let mut unreadable = false;
        match fs::read(&path) {
            Ok(bytes) => {
                let len = bytes.len().min(SIZE);
                image[..len].copy_from_slice(&bytes[..len]);
                debug!("FileStore: loaded {} bytes from {}", len, path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("FileStore: {} absent, starting erased", path.display());
            }
            Err(e) => {
                error!("FileStore: {} unreadable: {}", path.display(), e);
                unreadable = true;
            }
        }
        Self {
            path,
            image,
            unreadable,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn flush(&self) -> std::io::Result<()> {
        let tmp = self.temp_path();
        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(&self.image)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}

impl ByteStore for FileStore {
    fn read_byte(&mut self, addr: u8) -> Result<u8, StoreError> {
        if self.unreadable {
            return Err(StoreError::IoError);
        }
        Ok(self.image[addr as usize])
    }

    fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), StoreError> {
        let previous = self.image[addr as usize];
        self.image[addr as usize] = value;
        match self.flush() {
            Ok(()) => {
                self.unreadable = false;
                Ok(())
            }
            Err(e) => {
                warn!("FileStore: write to {} failed: {}", self.path.display(), e);
                self.image[addr as usize] = previous;
                Err(StoreError::IoError)
            }
        }
    }
}
