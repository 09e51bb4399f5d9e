//! scratchfile 临时文件工厂
//!
//! 两种模式：
//! - 匿名：解析目录 → 校验是目录 → 优先创建无名文件，
//!   否则随机命名独占创建后立即脱离目录命名空间；
//! - 具名：按调用方给出的模板创建，文件保留在最终路径上。
//!
//! 创建循环（两种模式共用）：
//! 1. 重新生成占位符；
//! 2. 独占创建（已存在即失败，权限仅限所有者）；
//! 3. 仅当失败原因是「名字已存在」时重试，其他错误立即返回。
//!
//! 循环没有次数上限，62^N 的命名空间足以视为无穷。
//! 绝不使用「先检查再创建」，独占创建是唯一的防竞争手段。

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ScratchConfig;
use crate::error::ScratchError;
use crate::fs::name::{NameSource, RandomNameGenerator};
use crate::fs::template::NameTemplate;
use crate::fs::{Disposition, NativeStrategy, TempFileHandle, TempFileStrategy};

#[derive(Debug, Clone)]
pub struct TempFileFactory<S = NativeStrategy> {
    strategy: S,
    config: ScratchConfig,
}

impl Default for TempFileFactory<NativeStrategy> {
    fn default() -> Self {
        Self::new(ScratchConfig::default())
    }
}

impl TempFileFactory<NativeStrategy> {
    /// 使用当前平台的创建策略
    pub fn new(config: ScratchConfig) -> Self {
        Self {
            strategy: NativeStrategy::new(config.clone()),
            config,
        }
    }
}

impl<S: TempFileStrategy> TempFileFactory<S> {
    pub fn with_strategy(strategy: S, config: ScratchConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    /// 创建匿名临时文件。
    ///
    /// #### 参数
    /// - `directory`：目标目录；为 `None` 时使用环境变量或平台默认目录
    ///
    /// #### 错误
    /// - 目录存在但不是目录：`NotADirectory`
    /// - 其他系统错误（含目录不存在）：`Io`
    /// - 熵源不可用：`EntropyUnavailable`
    pub fn create_anonymous(
        &self,
        directory: Option<&Path>,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        self.create_anonymous_with(directory, &mut RandomNameGenerator::new())
    }

    /// 同 [`create_anonymous`](Self::create_anonymous)，使用指定的文件名来源
    pub fn create_anonymous_with<N: NameSource + ?Sized>(
        &self,
        directory: Option<&Path>,
        names: &mut N,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        let dir = match directory {
            Some(dir) => dir.to_path_buf(),
            None => self.strategy.default_dir(),
        };

        if !self.strategy.is_dir(&dir)? {
            return Err(ScratchError::NotADirectory(dir));
        }

        if let Some(result) = self.strategy.create_unnamed(&dir) {
            match result {
                Ok(handle) => {
                    self.strategy.harden(&handle);
                    return Ok(TempFileHandle::anonymous(handle));
                }
                Err(err) => {
                    tracing::debug!(
                        dir = ?dir,
                        "unnamed temp file unavailable ({err}), using named fallback"
                    );
                }
            }
        }

        let mut template = NameTemplate::new(self.config.anonymous_name());
        let (handle, path) =
            self.create_exclusive(&mut template, Some(&dir), Disposition::Anonymous, names)?;

        // 脱离失败时句柄随 handle 一起关闭，不会泄漏
        self.strategy.detach(&path, &handle)?;
        self.strategy.harden(&handle);

        Ok(TempFileHandle::anonymous(handle))
    }

    /// 按模板创建具名临时文件。
    ///
    /// 成功后 `template` 的文本即为文件最终路径，文件由调用方负责清理。
    pub fn create_from_template(
        &self,
        template: &mut NameTemplate,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        self.create_from_template_with(template, &mut RandomNameGenerator::new())
    }

    pub fn create_from_template_with<N: NameSource + ?Sized>(
        &self,
        template: &mut NameTemplate,
        names: &mut N,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        let (handle, path) = self.create_exclusive(template, None, Disposition::Named, names)?;
        self.strategy.harden(&handle);
        Ok(TempFileHandle::named(handle, path))
    }

    fn create_exclusive<N: NameSource + ?Sized>(
        &self,
        template: &mut NameTemplate,
        dir: Option<&Path>,
        disposition: Disposition,
        names: &mut N,
    ) -> Result<(S::Handle, PathBuf), ScratchError> {
        loop {
            template.regenerate(names)?;

            let path = match dir {
                Some(dir) => dir.join(template.as_path()),
                None => template.as_path().to_path_buf(),
            };

            match self.strategy.create_new(&path, disposition) {
                Ok(handle) => return Ok((handle, path)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = ?path, "temp file name taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
