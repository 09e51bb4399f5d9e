//! 字符串排序工具
//!
//! 对以 `None` 结尾的字符串引用数组按字节序原地排序。
//! 只重排引用，不复制字符串，所有权仍属于调用方。
//!
//! 算法为快速排序：每个分区取首元素为枢轴，
//! 严格小于枢轴的进入左侧，其余（含相等）进入右侧。
//! 分区借助辅助 Vec 完成，用显式工作栈代替递归，
//! 已排序的大数组也不会耗尽调用栈。

use std::collections::TryReserveError;
use std::ops::Range;

use crate::error::{ARCHIVE_FATAL, ARCHIVE_OK, ScratchError};

/// 排序以 `None` 结尾的字符串数组。
///
/// 终止符及其之后的元素保持不动；没有终止符时整个切片参与排序。
///
/// #### 错误
/// - 分区所需内存分配失败：`Fatal`，此时数组内容可能已部分重排
pub fn sort_strings<S>(strings: &mut [Option<&S>]) -> Result<(), ScratchError>
where
    S: AsRef<[u8]> + ?Sized,
{
    let len = strings
        .iter()
        .position(Option::is_none)
        .unwrap_or(strings.len());

    quicksort(&mut strings[..len], |a, b| bytes_of(a) < bytes_of(b))?;
    Ok(())
}

/// 与 [`sort_strings`] 相同，返回归档层使用的状态码
pub fn sort_strings_status<S>(strings: &mut [Option<&S>]) -> i32
where
    S: AsRef<[u8]> + ?Sized,
{
    match sort_strings(strings) {
        Ok(()) => ARCHIVE_OK,
        Err(err) => {
            tracing::debug!("string sort failed: {err}");
            ARCHIVE_FATAL
        }
    }
}

/// 排序不带终止符的字符串引用切片
pub fn sort_refs<S>(strings: &mut [&S]) -> Result<(), ScratchError>
where
    S: AsRef<[u8]> + ?Sized,
{
    quicksort(strings, |a, b| bytes(*a) < bytes(*b))?;
    Ok(())
}

fn bytes<S: AsRef<[u8]> + ?Sized>(s: &S) -> &[u8] {
    <S as AsRef<[u8]>>::as_ref(s)
}

fn bytes_of<'a, S: AsRef<[u8]> + ?Sized>(item: &Option<&'a S>) -> &'a [u8] {
    match *item {
        Some(s) => bytes(s),
        None => &[],
    }
}

fn quicksort<T, F>(items: &mut [T], less: F) -> Result<(), TryReserveError>
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    let mut pending: Vec<Range<usize>> = Vec::new();
    let mut lesser: Vec<T> = Vec::new();
    let mut greater: Vec<T> = Vec::new();

    if items.len() > 1 {
        pending.try_reserve(1)?;
        pending.push(0..items.len());
    }

    while let Some(range) = pending.pop() {
        let region = &mut items[range.clone()];
        let pivot = region[0];

        lesser.clear();
        greater.clear();
        lesser.try_reserve(region.len() - 1)?;
        greater.try_reserve(region.len() - 1)?;

        for &item in &region[1..] {
            if less(&item, &pivot) {
                lesser.push(item);
            } else {
                greater.push(item);
            }
        }

        let split = lesser.len();
        region[..split].copy_from_slice(&lesser);
        region[split] = pivot;
        region[split + 1..].copy_from_slice(&greater);

        // 长度不超过 1 的分区已有序，不入栈
        for sub in [range.start..range.start + split, range.start + split + 1..range.end] {
            if sub.len() > 1 {
                pending.try_reserve(1)?;
                pending.push(sub);
            }
        }
    }

    Ok(())
}
