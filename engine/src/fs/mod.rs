//! scratchfile 文件系统层
//!
//! - `name`：随机文件名生成
//! - `template`：文件名模板
//! - `harden`：描述符加固（close-on-exec）
//! - `posix` / `windows`：平台创建原语，统一为 [`TempFileStrategy`]
//! - `factory`：重试创建循环
//! - `atomic`：基于具名临时文件的原子写入

pub mod atomic;
pub mod factory;
pub mod harden;
pub mod name;
pub mod template;

#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod windows;

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// 当前平台的创建策略
#[cfg(unix)]
pub type NativeStrategy = posix::PosixTempFileStrategy;
#[cfg(windows)]
pub type NativeStrategy = windows::WindowsTempFileStrategy;

/// 创建出的文件最终是否对调用方可见
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 创建后立即（或关闭时）从目录中消失
    Anonymous,
    /// 保留在最终路径上，由调用方负责清理
    Named,
}

/// 平台相关的临时文件创建原语。
///
/// 工厂只负责目录解析与重试循环，所有系统调用都经由此 trait，
/// 测试中可以替换为内存中的假文件系统。
pub trait TempFileStrategy {
    type Handle;

    /// 未显式指定目录时使用的临时目录
    fn default_dir(&self) -> PathBuf;

    /// 路径存在时返回是否为目录；不存在时返回错误
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// 在 `dir` 中创建一个从不出现在目录项里的文件。
    ///
    /// 平台不具备该能力时返回 `None`。
    fn create_unnamed(&self, dir: &Path) -> Option<io::Result<Self::Handle>>;

    /// 独占创建：文件已存在时必须返回 `ErrorKind::AlreadyExists`。
    /// 权限仅限文件所有者。
    fn create_new(&self, path: &Path, disposition: Disposition) -> io::Result<Self::Handle>;

    /// 让匿名文件从目录命名空间中消失，句柄保持可用
    fn detach(&self, path: &Path, handle: &Self::Handle) -> io::Result<()>;

    /// 清除句柄的可继承标志
    fn harden(&self, handle: &Self::Handle);
}

/// 调用方独占的临时文件句柄。
///
/// 匿名模式下 `path` 为 `None`；具名模式下为最终路径。
/// 丢弃即关闭。
#[derive(Debug)]
pub struct TempFileHandle<H = File> {
    handle: H,
    path: Option<PathBuf>,
}

impl<H> TempFileHandle<H> {
    pub(crate) fn anonymous(handle: H) -> Self {
        Self { handle, path: None }
    }

    pub(crate) fn named(handle: H, path: PathBuf) -> Self {
        Self {
            handle,
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.path.is_none()
    }

    pub fn as_inner(&self) -> &H {
        &self.handle
    }

    pub fn as_inner_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn into_inner(self) -> H {
        self.handle
    }

    pub fn into_parts(self) -> (H, Option<PathBuf>) {
        (self.handle, self.path)
    }
}

impl Read for TempFileHandle<File> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.handle.read(buf)
    }
}

impl Write for TempFileHandle<File> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.flush()
    }
}

impl Seek for TempFileHandle<File> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.handle.seek(pos)
    }
}
