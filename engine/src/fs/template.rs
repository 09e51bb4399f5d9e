//! 临时文件名模板。
//!
//! 模板由「前缀 + 一段连续的 `X` 占位符」组成，占位符必须位于文件名末尾。
//! 每次尝试创建文件前，只改写占位符区间，前缀永远不变。

use std::ops::Range;
use std::path::Path;

use crate::error::{ScratchError, errx};
use crate::fs::name::NameSource;

/// 占位符字符
pub const PLACEHOLDER: u8 = b'X';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    text: String,
    span: Range<usize>,
}

impl NameTemplate {
    /// 解析模板。
    ///
    /// 只检查最后一个路径分量：分量中第一个 `X` 起到末尾必须全是 `X`。
    /// 目录部分出现 `X` 不受影响。
    /// 不满足时属于调用方的程序错误，直接终止进程，而不是返回可恢复的错误。
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let bytes = text.as_bytes();

        let name_start = bytes
            .iter()
            .rposition(|&b| std::path::is_separator(char::from(b)))
            .map_or(0, |i| i + 1);

        let start = match bytes[name_start..].iter().position(|&b| b == PLACEHOLDER) {
            Some(offset) => name_start + offset,
            None => errx("temp file template has no placeholder"),
        };

        if bytes[start..].iter().any(|&b| b != PLACEHOLDER) {
            errx("temp file template has placeholder followed by other characters");
        }

        let span = start..bytes.len();
        Self { text, span }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.text)
    }

    /// 占位符在模板文本中的字节区间
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn placeholder_len(&self) -> usize {
        self.span.len()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// 用 `names` 生成的新字符覆盖占位符区间。
    pub fn regenerate<N>(&mut self, names: &mut N) -> Result<(), ScratchError>
    where
        N: NameSource + ?Sized,
    {
        let mut buf = vec![0u8; self.span.len()];
        names.fill(&mut buf)?;

        let generated = match std::str::from_utf8(&buf) {
            Ok(s) if buf.iter().all(u8::is_ascii_alphanumeric) => s,
            _ => errx("name source produced characters outside the filename alphabet"),
        };

        self.text.replace_range(self.span.clone(), generated);
        Ok(())
    }
}
