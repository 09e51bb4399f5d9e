//! POSIX 平台的创建原语。
//!
//! Linux 上优先使用 `O_TMPFILE` 创建无名文件；
//! 其余情况退回到「随机名 + O_EXCL 独占创建 + unlink」。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::config::ScratchConfig;
use crate::fs::{Disposition, TempFileStrategy, harden};

/// 仅所有者可读写
const OWNER_ONLY: u32 = 0o600;

#[derive(Debug, Clone, Default)]
pub struct PosixTempFileStrategy {
    config: ScratchConfig,
}

impl PosixTempFileStrategy {
    pub fn new(config: ScratchConfig) -> Self {
        Self { config }
    }
}

impl TempFileStrategy for PosixTempFileStrategy {
    type Handle = File;

    fn default_dir(&self) -> PathBuf {
        self.config.preferred_dir()
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.is_dir())
    }

    #[cfg(target_os = "linux")]
    fn create_unnamed(&self, dir: &Path) -> Option<io::Result<File>> {
        // O_EXCL 防止之后通过 linkat 把文件重新挂回目录
        Some(
            OpenOptions::new()
                .read(true)
                .write(true)
                .custom_flags(libc::O_TMPFILE | libc::O_EXCL | libc::O_CLOEXEC)
                .mode(OWNER_ONLY)
                .open(dir),
        )
    }

    #[cfg(not(target_os = "linux"))]
    fn create_unnamed(&self, _dir: &Path) -> Option<io::Result<File>> {
        None
    }

    fn create_new(&self, path: &Path, _disposition: Disposition) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .custom_flags(libc::O_CLOEXEC)
            .mode(OWNER_ONLY)
            .open(path)
    }

    fn detach(&self, path: &Path, _handle: &File) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn harden(&self, handle: &File) {
        harden::harden(handle);
    }
}
