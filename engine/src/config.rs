//! scratchfile 临时文件配置
//!
//! 只有少量可调项，全部有默认值；不读取任何配置文件。
//! 唯一的外部输入是环境变量（默认 `TMPDIR`），
//! 用于指定首选临时目录。

use std::ffi::OsString;
use std::path::PathBuf;

/// 默认读取的临时目录环境变量
pub const DEFAULT_TMPDIR_VAR: &str = "TMPDIR";

/// 环境变量缺失时使用的目录
pub const DEFAULT_FALLBACK_DIR: &str = "/tmp";

/// 匿名临时文件名前缀
pub const DEFAULT_PREFIX: &str = "scratch_";

/// 匿名临时文件名中随机字符的个数（62^10 的命名空间）
pub const DEFAULT_PLACEHOLDER_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchConfig {
    /// 指定首选临时目录的环境变量名
    pub tmpdir_var: String,
    /// 环境变量未设置（或为空）时的目录
    pub fallback_dir: PathBuf,
    /// 匿名文件名前缀，不能包含 `X`
    pub prefix: String,
    /// 随机占位符长度，必须 >= 1
    pub placeholder_len: usize,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            tmpdir_var: DEFAULT_TMPDIR_VAR.to_string(),
            fallback_dir: PathBuf::from(DEFAULT_FALLBACK_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            placeholder_len: DEFAULT_PLACEHOLDER_LEN,
        }
    }
}

impl ScratchConfig {
    /// 按配置解析首选临时目录。
    ///
    /// 环境变量值为空时视为未设置。
    pub fn preferred_dir(&self) -> PathBuf {
        self.preferred_dir_from(std::env::var_os(&self.tmpdir_var))
    }

    pub(crate) fn preferred_dir_from(&self, value: Option<OsString>) -> PathBuf {
        match value {
            Some(dir) if !dir.is_empty() => {
                tracing::debug!("temp dir from ${}: {:?}", self.tmpdir_var, dir);
                PathBuf::from(dir)
            }
            _ => self.fallback_dir.clone(),
        }
    }

    /// 匿名文件使用的模板文本，例如 `scratch_XXXXXXXXXX`
    pub fn anonymous_name(&self) -> String {
        let mut name = self.prefix.clone();
        name.extend(std::iter::repeat_n('X', self.placeholder_len));
        name
    }
}
