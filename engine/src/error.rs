use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// 与归档层约定的状态码：成功。
pub const ARCHIVE_OK: i32 = 0;

/// 与归档层约定的状态码：致命错误，调用方必须放弃整个操作。
pub const ARCHIVE_FATAL: i32 = -30;

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(#[from] rand::Error),

    #[error("out of memory while sorting")]
    Fatal(#[from] TryReserveError),
}

impl ScratchError {
    /// 映射为 errno 风格的数字错误码，供 ErrorState 记录。
    ///
    /// I/O 错误优先使用操作系统给出的原始错误码。
    pub fn errno(&self) -> i32 {
        match self {
            Self::NotADirectory(_) => libc::ENOTDIR,
            Self::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
            Self::EntropyUnavailable(_) => libc::EIO,
            Self::Fatal(_) => libc::ENOMEM,
        }
    }
}

/// 报告无法恢复的内部错误并立即终止进程。
///
/// 仅用于调用方违反契约的情形（例如模板没有占位符），
/// 这类问题属于程序缺陷，不进入可恢复的错误分类。
pub fn errx(msg: &str) -> ! {
    tracing::error!("fatal internal error: {msg}");
    eprintln!("Fatal internal error: {msg}");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn errno_prefers_os_code() {
        let err = ScratchError::from(io::Error::from_raw_os_error(libc::EACCES));
        assert_eq!(err.errno(), libc::EACCES);

        let err = ScratchError::from(io::Error::new(io::ErrorKind::Other, "synthetic"));
        assert_eq!(err.errno(), libc::EIO);
    }

    #[test]
    fn not_a_directory_maps_to_enotdir() {
        let err = ScratchError::NotADirectory(PathBuf::from("/etc/passwd"));
        assert_eq!(err.errno(), libc::ENOTDIR);
        assert!(err.to_string().contains("/etc/passwd"));
    }
}
