//! 归档句柄上下文
//!
//! 持有临时文件工厂与 [`ErrorState`]，代表上层归档操作调用本库，
//! 失败时把错误码与可读消息记录到句柄上，再把错误原样返回。

use std::path::Path;

use crate::config::ScratchConfig;
use crate::error::{ARCHIVE_FATAL, ARCHIVE_OK, ScratchError};
use crate::fs::factory::TempFileFactory;
use crate::fs::template::NameTemplate;
use crate::fs::{NativeStrategy, TempFileHandle, TempFileStrategy};
use crate::sort;
use crate::state::ErrorState;

#[derive(Debug)]
pub struct ArchiveContext<S = NativeStrategy> {
    factory: TempFileFactory<S>,
    error: ErrorState,
}

impl Default for ArchiveContext<NativeStrategy> {
    fn default() -> Self {
        Self::new(ScratchConfig::default())
    }
}

impl ArchiveContext<NativeStrategy> {
    pub fn new(config: ScratchConfig) -> Self {
        Self::with_factory(TempFileFactory::new(config))
    }
}

impl<S: TempFileStrategy> ArchiveContext<S> {
    pub fn with_factory(factory: TempFileFactory<S>) -> Self {
        Self {
            factory,
            error: ErrorState::new(),
        }
    }

    /// 创建匿名临时文件，失败时记录错误
    pub fn temp_file(
        &mut self,
        directory: Option<&Path>,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        let result = self.factory.create_anonymous(directory);
        if let Err(err) = &result {
            self.record(err, "could not create temporary file");
        }
        result
    }

    /// 按模板创建具名临时文件。
    ///
    /// `template` 会被就地改写为最终文件名（失败时为最后一次尝试的名字）。
    pub fn named_temp_file(
        &mut self,
        template: &mut String,
    ) -> Result<TempFileHandle<S::Handle>, ScratchError> {
        let mut parsed = NameTemplate::new(std::mem::take(template));
        let result = self.factory.create_from_template(&mut parsed);
        *template = parsed.into_string();

        if let Err(err) = &result {
            self.record(err, "could not create temporary file");
        }
        result
    }

    /// 排序以 `None` 结尾的字符串数组，返回状态码
    pub fn sort_strings<T>(&mut self, strings: &mut [Option<&T>]) -> i32
    where
        T: AsRef<[u8]> + ?Sized,
    {
        match sort::sort_strings(strings) {
            Ok(()) => ARCHIVE_OK,
            Err(err) => {
                self.record(&err, "could not sort strings");
                ARCHIVE_FATAL
            }
        }
    }

    pub fn errno(&self) -> i32 {
        self.error.errno()
    }

    pub fn error_string(&self) -> Option<&str> {
        self.error.error_string()
    }

    pub fn clear_error(&mut self) {
        self.error.clear_error();
    }

    pub fn error_state(&self) -> &ErrorState {
        &self.error
    }

    pub fn error_state_mut(&mut self) -> &mut ErrorState {
        &mut self.error
    }

    pub fn factory(&self) -> &TempFileFactory<S> {
        &self.factory
    }

    fn record(&mut self, err: &ScratchError, what: &str) {
        tracing::debug!("{what}: {err}");
        crate::set_error!(self.error, err.errno(), "{what}: {err}");
    }
}
