//! 临时文件创建的端到端测试

use std::collections::HashSet;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use scratchfile::fs::name::ALPHABET;
use scratchfile::{ScratchConfig, ScratchError, TempFileFactory};
use tempfile::tempdir;

fn template_in(dir: &Path, name: &str) -> String {
    dir.join(name)
        .into_os_string()
        .into_string()
        .expect("utf-8 temp dir")
}

#[test]
fn anonymous_file_is_writable() {
    let temp_dir = tempdir().expect("create temp dir");

    let mut file =
        scratchfile::create_anonymous_temp_file(Some(temp_dir.path())).expect("create anonymous");
    file.write_all(b"scratch payload").expect("write");
    file.seek(SeekFrom::Start(0)).expect("rewind");

    let mut back = String::new();
    file.read_to_string(&mut back).expect("read back");
    assert_eq!(back, "scratch payload");
}

#[cfg(unix)]
#[test]
fn anonymous_file_is_not_listed() {
    // 创建返回后目录中不应出现任何条目
    let temp_dir = tempdir().expect("create temp dir");

    let _file =
        scratchfile::create_anonymous_temp_file(Some(temp_dir.path())).expect("create anonymous");
    let _second =
        scratchfile::create_anonymous_temp_file(Some(temp_dir.path())).expect("create anonymous");

    let entries = fs::read_dir(temp_dir.path()).expect("list dir").count();
    assert_eq!(entries, 0);
}

#[cfg(unix)]
#[test]
fn anonymous_uses_configured_fallback_dir() {
    let temp_dir = tempdir().expect("create temp dir");
    let config = ScratchConfig {
        tmpdir_var: "SCRATCHFILE_TEST_NEVER_SET".into(),
        fallback_dir: temp_dir.path().to_path_buf(),
        ..ScratchConfig::default()
    };

    let handle = TempFileFactory::new(config)
        .create_anonymous(None)
        .expect("create in fallback dir");
    assert!(handle.is_anonymous());
}

#[test]
fn anonymous_accepts_trailing_separator() {
    let temp_dir = tempdir().expect("create temp dir");
    let mut dir = temp_dir.path().as_os_str().to_os_string();
    dir.push(std::path::MAIN_SEPARATOR_STR);

    scratchfile::create_anonymous_temp_file(Some(Path::new(&dir))).expect("create anonymous");
}

#[test]
fn non_directory_is_rejected_without_creating_files() {
    let temp_dir = tempdir().expect("create temp dir");
    let plain = temp_dir.path().join("plain.txt");
    fs::write(&plain, b"not a dir").expect("write plain file");

    let err = scratchfile::create_anonymous_temp_file(Some(&plain)).expect_err("must fail");
    assert!(matches!(err, ScratchError::NotADirectory(ref p) if p == &plain));

    let names: Vec<_> = fs::read_dir(temp_dir.path())
        .expect("list dir")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("plain.txt")]);
}

#[test]
fn missing_directory_is_io_error() {
    let temp_dir = tempdir().expect("create temp dir");
    let missing = temp_dir.path().join("missing");

    let err = scratchfile::create_anonymous_temp_file(Some(&missing)).expect_err("must fail");
    assert!(matches!(err, ScratchError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn named_template_is_resolved_in_place() {
    let temp_dir = tempdir().expect("create temp dir");
    let original = template_in(temp_dir.path(), "archive_XXXXXXXXXX");
    let mut template = original.clone();

    let mut file = scratchfile::create_named_temp_file(&mut template).expect("create named");
    file.write_all(b"kept").expect("write");

    let prefix_len = original.len() - 10;
    assert_eq!(&template[..prefix_len], &original[..prefix_len]);
    assert!(template[prefix_len..].bytes().all(|b| ALPHABET.contains(&b)));
    assert_eq!(fs::read(&template).expect("read named file"), b"kept");
}

#[test]
fn named_templates_resolve_to_different_names() {
    let temp_dir = tempdir().expect("create temp dir");
    let original = template_in(temp_dir.path(), "entry_XXXXXXXXXX");

    let mut first = original.clone();
    let mut second = original.clone();
    scratchfile::create_named_temp_file(&mut first).expect("first");
    scratchfile::create_named_temp_file(&mut second).expect("second");

    assert_ne!(first, second);
    assert_eq!(fs::read_dir(temp_dir.path()).expect("list dir").count(), 2);
}

#[cfg(unix)]
#[test]
fn named_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().expect("create temp dir");
    let mut template = template_in(temp_dir.path(), "private_XXXXXX");
    scratchfile::create_named_temp_file(&mut template).expect("create named");

    let mode = fs::metadata(&template).expect("stat").permissions().mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn concurrent_anonymous_creation_never_fails() {
    let temp_dir = tempdir().expect("create temp dir");
    let dir = temp_dir.path();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(move || {
                    let factory = TempFileFactory::new(ScratchConfig::default());
                    for _ in 0..1000 {
                        factory.create_anonymous(Some(dir)).expect("create anonymous");
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }
    });
}

#[test]
fn collisions_are_absorbed_by_retry() {
    // 两位占位符只有 3844 个名字，大量具名文件必然撞名
    let temp_dir = tempdir().expect("create temp dir");
    let original = template_in(temp_dir.path(), "c_XX");

    let names: Vec<String> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..2)
            .map(|_| {
                let original = original.clone();
                scope.spawn(move || {
                    (0..300)
                        .map(|_| {
                            let mut template = original.clone();
                            scratchfile::create_named_temp_file(&mut template)
                                .expect("create named");
                            template
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|w| w.join().expect("worker panicked"))
            .collect()
    });

    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), 600);
}
