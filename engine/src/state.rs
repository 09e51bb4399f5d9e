//! 归档句柄的错误状态
//!
//! 每个句柄保存最近一次失败的错误码与可读消息。
//! 存储与线程模型由持有者决定，这里只提供存取接口。

use std::fmt::{self, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    code: i32,
    message: String,
    has_message: bool,
}

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录错误。
    ///
    /// `message` 为 `None` 时只更新错误码并撤销消息，
    /// 供上层表示「详见底层错误」而不覆盖诊断文本。
    pub fn set_error(&mut self, code: i32, message: Option<fmt::Arguments<'_>>) {
        self.code = code;

        let Some(args) = message else {
            self.has_message = false;
            return;
        };

        self.message.clear();
        // 写入 String 不会失败
        let _ = self.message.write_fmt(args);
        self.has_message = true;
    }

    /// 错误码归零，消息清空
    pub fn clear_error(&mut self) {
        self.code = 0;
        self.message.clear();
        self.has_message = false;
    }

    pub fn errno(&self) -> i32 {
        self.code
    }

    /// 当前消息；未设置或为空时返回 `None`
    pub fn error_string(&self) -> Option<&str> {
        (self.has_message && !self.message.is_empty()).then_some(self.message.as_str())
    }

    /// 复制另一个句柄的错误
    pub fn copy_from(&mut self, other: &ErrorState) {
        self.code = other.code;
        self.message.clone_from(&other.message);
        self.has_message = other.has_message;
    }
}

/// 以格式化参数调用 [`ErrorState::set_error`]。
///
/// ```
/// let mut state = scratchfile::ErrorState::new();
/// scratchfile::set_error!(state, 2, "missing {}", "entry");
/// assert_eq!(state.error_string(), Some("missing entry"));
/// ```
#[macro_export]
macro_rules! set_error {
    ($state:expr, $code:expr) => {
        $state.set_error($code, None)
    };
    ($state:expr, $code:expr, $($arg:tt)+) => {
        $state.set_error($code, Some(format_args!($($arg)+)))
    };
}
