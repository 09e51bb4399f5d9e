//! 描述符加固：保证新建的文件句柄不会被子进程继承。
//!
//! 即使平台在创建时已原子地设置了 close-on-exec，这里仍会检查一次；
//! 部分旧内核只声明了 `O_CLOEXEC` 而并不生效。
//! 系统调用失败时静默忽略。

use std::fs::File;

#[cfg(unix)]
pub fn harden(file: &File) {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();

    // SAFETY: fd 由 `file` 持有，在本函数执行期间保持有效。
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if flags == -1 {
        tracing::trace!(fd, "F_GETFD failed, skipping close-on-exec");
        return;
    }

    if flags & libc::FD_CLOEXEC == 0 {
        // SAFETY: 同上，只修改描述符标志位。
        let rc = unsafe { libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) };
        if rc == -1 {
            tracing::trace!(fd, "F_SETFD failed, descriptor stays inheritable");
        }
    }
}

#[cfg(windows)]
pub fn harden(file: &File) {
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Foundation::{
        GetHandleInformation, HANDLE, HANDLE_FLAG_INHERIT, SetHandleInformation,
    };

    let handle = file.as_raw_handle() as HANDLE;
    let mut flags: u32 = 0;

    // SAFETY: handle 由 `file` 持有，flags 指向有效的栈变量。
    if unsafe { GetHandleInformation(handle, &mut flags) } == 0 {
        tracing::trace!("GetHandleInformation failed, skipping inherit check");
        return;
    }

    if flags & HANDLE_FLAG_INHERIT != 0 {
        // SAFETY: 同上，只清除继承标志。
        if unsafe { SetHandleInformation(handle, HANDLE_FLAG_INHERIT, 0) } == 0 {
            tracing::trace!("SetHandleInformation failed, handle stays inheritable");
        }
    }
}

/// 句柄当前是否会被子进程继承
#[cfg(all(test, unix))]
pub(crate) fn is_inheritable(file: &File) -> bool {
    use std::os::fd::AsRawFd;

    // SAFETY: 只读取描述符标志位。
    let flags = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_GETFD) };
    flags != -1 && flags & libc::FD_CLOEXEC == 0
}

#[cfg(all(test, windows))]
pub(crate) fn is_inheritable(file: &File) -> bool {
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Foundation::{GetHandleInformation, HANDLE, HANDLE_FLAG_INHERIT};

    let mut flags: u32 = 0;
    // SAFETY: 只读取句柄信息。
    let ok = unsafe { GetHandleInformation(file.as_raw_handle() as HANDLE, &mut flags) };
    ok != 0 && flags & HANDLE_FLAG_INHERIT != 0
}
