//! Windows 平台的创建原语。
//!
//! 不使用系统的 `tmpfile()` 与 `_mktemp_s`：前者在根目录建文件，
//! 非管理员会遇到权限错误；后者不安全。
//! 匿名文件通过 `FILE_FLAG_DELETE_ON_CLOSE` 在句柄关闭时删除。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::windows::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use windows_sys::Win32::Foundation::{GENERIC_READ, GENERIC_WRITE};
use windows_sys::Win32::Storage::FileSystem::{
    DELETE, FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_TEMPORARY, FILE_FLAG_DELETE_ON_CLOSE,
};

use crate::config::ScratchConfig;
use crate::fs::{Disposition, TempFileStrategy, harden};

/// 系统临时目录解析函数。
///
/// 默认的 `std::env::temp_dir` 在可用时使用 `GetTempPath2W`，
/// 否则退回 `GetTempPathW`。
pub type TempDirResolver = fn() -> PathBuf;

#[derive(Debug, Clone)]
pub struct WindowsTempFileStrategy {
    config: ScratchConfig,
    resolve_temp_dir: TempDirResolver,
}

impl Default for WindowsTempFileStrategy {
    fn default() -> Self {
        Self::new(ScratchConfig::default())
    }
}

impl WindowsTempFileStrategy {
    pub fn new(config: ScratchConfig) -> Self {
        Self {
            config,
            resolve_temp_dir: std::env::temp_dir,
        }
    }

    pub fn with_temp_dir_resolver(mut self, resolver: TempDirResolver) -> Self {
        self.resolve_temp_dir = resolver;
        self
    }
}

impl TempFileStrategy for WindowsTempFileStrategy {
    type Handle = File;

    fn default_dir(&self) -> PathBuf {
        match std::env::var_os(&self.config.tmpdir_var) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => (self.resolve_temp_dir)(),
        }
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.is_dir())
    }

    fn create_unnamed(&self, _dir: &Path) -> Option<io::Result<File>> {
        None
    }

    fn create_new(&self, path: &Path, disposition: Disposition) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options
            .read(true)
            .write(true)
            .create_new(true)
            .access_mode(GENERIC_READ | GENERIC_WRITE | DELETE)
            .share_mode(0);

        match disposition {
            Disposition::Anonymous => {
                options
                    .attributes(FILE_ATTRIBUTE_TEMPORARY)
                    .custom_flags(FILE_FLAG_DELETE_ON_CLOSE);
            }
            Disposition::Named => {
                options.attributes(FILE_ATTRIBUTE_NORMAL);
            }
        }

        options.open(path)
    }

    fn detach(&self, _path: &Path, _handle: &File) -> io::Result<()> {
        // 关闭时由系统删除
        Ok(())
    }

    fn harden(&self, handle: &File) {
        harden::harden(handle);
    }
}
