//! File-backed save storage handed to the console core

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::console::SaveHooks;

/// Directory holding save data, relative to the game's working directory
pub const SAVE_DIR: &str = "save";

/// Save file name inside [`SAVE_DIR`]
pub const SAVE_FILE: &str = "save.dat";

pub struct FileSaveHooks {
    path: PathBuf,
}

impl FileSaveHooks {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<root>/save/save.dat`
    pub fn in_dir(root: &Path) -> Self {
        Self::new(root.join(SAVE_DIR).join(SAVE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> io::Result<PathBuf> {
        match self.path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                Ok(self.path.with_file_name(tmp_name))
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "save path has no file name",
            )),
        }
    }
}

impl SaveHooks for FileSaveHooks {
    fn save(&mut self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path()?;
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }

        #[cfg(windows)]
        {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!("Saved {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }

    fn load(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let file = fs::File::open(&self.path)?;

        let mut read = 0;
        let mut limited = file.take(buf.len() as u64);
        while read < buf.len() {
            match limited.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if read < buf.len() {
            warn!(
                "Save data {} is shorter than expected ({} of {} bytes), zero-filling",
                self.path.display(),
                read,
                buf.len()
            );
            buf[read..].fill(0);
        }
        Ok(())
    }
}
