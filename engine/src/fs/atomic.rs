//! scratchfile 原子写入工具。
//!
//! 提供「先写具名临时文件，成功后再 rename 替换目标文件」的写出语义，
//! 避免在写入失败时污染或截断目标文件。
//! 临时文件通过模板独占创建，与目标位于同一目录，保证 rename 不跨文件系统。

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::ScratchError;
use crate::fs::factory::TempFileFactory;
use crate::fs::template::{NameTemplate, PLACEHOLDER};
use crate::fs::TempFileStrategy;

/// 临时文件名中随机部分的长度
const STAGING_PLACEHOLDER_LEN: usize = 10;

/// 原子写文件。
///
/// 流程：
/// 1. 在目标目录按 `.<name>.tmp-XXXXXXXXXX` 独占创建临时文件；
/// 2. 调用 `write_fn` 写入完整内容；
/// 3. 写入成功后 fsync，再用 rename 原子替换目标文件。
///
/// 任一步失败都会删除临时文件，目标文件保持原状。
pub fn write_atomic<S, F>(
    factory: &TempFileFactory<S>,
    target: &Path,
    write_fn: F,
) -> Result<(), ScratchError>
where
    S: TempFileStrategy<Handle = File>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = target.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "目标路径没有父目录，无法执行原子写入",
        )
    })?;

    fs::create_dir_all(parent)?;

    let mut template = staging_template(parent, target)?;
    let (mut tmp_file, _) = factory.create_from_template(&mut template)?.into_parts();
    let tmp_path = template.as_path();

    let result = write_fn(&mut tmp_file).and_then(|()| tmp_file.sync_all());
    drop(tmp_file);
    let result = result.and_then(|()| fs::rename(tmp_path, target));

    if let Err(err) = result {
        let _ = fs::remove_file(tmp_path);
        return Err(err.into());
    }

    Ok(())
}

fn staging_template(parent: &Path, target: &Path) -> io::Result<NameTemplate> {
    let base_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("scratch-output")
        .replace(PLACEHOLDER as char, "x");

    let staging = parent.join(format!(
        ".{base_name}.tmp-{}",
        "X".repeat(STAGING_PLACEHOLDER_LEN)
    ));

    let text = staging.into_os_string().into_string().map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "目标目录不是合法的 UTF-8 路径")
    })?;

    Ok(NameTemplate::new(text))
}
