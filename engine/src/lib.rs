mod context;
mod state;

pub mod config;
pub mod error;
pub mod fs;
pub mod sort;

pub use config::ScratchConfig;
pub use context::ArchiveContext;
pub use error::{ARCHIVE_FATAL, ARCHIVE_OK, ScratchError};
pub use fs::factory::TempFileFactory;
pub use fs::name::{NameSource, RandomNameGenerator};
pub use fs::template::NameTemplate;
pub use fs::{Disposition, NativeStrategy, TempFileHandle, TempFileStrategy};
pub use sort::sort_strings_status;
pub use state::ErrorState;

use std::fs::File;
use std::path::Path;

/// 创建匿名临时文件，返回后文件无法通过路径找到，关闭即释放。
///
/// `directory` 为 `None` 时依次尝试 `$TMPDIR` 与 `/tmp`。
pub fn create_anonymous_temp_file(directory: Option<&Path>) -> Result<File, ScratchError> {
    TempFileFactory::new(ScratchConfig::default())
        .create_anonymous(directory)
        .map(TempFileHandle::into_inner)
}

/// 按模板创建具名临时文件，`template` 被就地改写为最终路径。
///
/// 文件名部分必须以一段 `X` 结尾且其前不再出现 `X`，否则进程直接终止。
pub fn create_named_temp_file(template: &mut String) -> Result<File, ScratchError> {
    let mut parsed = NameTemplate::new(std::mem::take(template));
    let result =
        TempFileFactory::new(ScratchConfig::default()).create_from_template(&mut parsed);
    *template = parsed.into_string();

    result.map(TempFileHandle::into_inner)
}

/// 排序以 `None` 结尾的字符串数组，返回 [`ARCHIVE_OK`] 或 [`ARCHIVE_FATAL`]
pub fn sort_strings<S>(strings: &mut [Option<&S>]) -> i32
where
    S: AsRef<[u8]> + ?Sized,
{
    sort::sort_strings_status(strings)
}
