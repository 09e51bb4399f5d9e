//! 随机文件名生成。
//!
//! 从操作系统熵源取随机字节，再按取模映射到 62 个可用于文件名的字符。
//! 生成结果不保证唯一，重名由调用方通过重试处理。

use rand::{RngCore, rngs::OsRng};

use crate::error::ScratchError;

/// 文件名字母表：`0-9A-Za-z`
pub const ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// 占位符填充来源。
///
/// 实现者必须只写入 [`ALPHABET`] 中的字符。
pub trait NameSource {
    fn fill(&mut self, span: &mut [u8]) -> Result<(), ScratchError>;
}

/// 基于 `OsRng` 的默认实现
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNameGenerator {
    _private: (),
}

impl RandomNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameSource for RandomNameGenerator {
    fn fill(&mut self, span: &mut [u8]) -> Result<(), ScratchError> {
        OsRng.try_fill_bytes(span)?;
        map_to_alphabet(span);
        Ok(())
    }
}

/// 将任意字节就地映射到字母表
pub fn map_to_alphabet(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        *b = ALPHABET[usize::from(*b) % ALPHABET.len()];
    }
}
