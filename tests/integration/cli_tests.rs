use clap::Parser;
use dupefind::cli::Cli;
use dupefind::error::ExitCode;
use dupefind::run_app_with_output;
use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch workspace with a config that disables every exclusion rule.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("dupefind.toml");
        fs::write(&config, "excluded_dirs = []\nexcluded_files = []\n").unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        Self { dir, config }
    }

    fn data(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn file(&self, name: &str, content: &[u8], secs: i64) -> PathBuf {
        let path = self.data().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
        path
    }

    fn cli(&self, extra: &[&str]) -> Cli {
        let mut args: Vec<OsString> = vec!["dupefind".into(), "-q".into(), "--config".into()];
        args.push(self.config.clone().into());
        args.extend(extra.iter().map(OsString::from));
        args.push(self.data().into());
        Cli::try_parse_from(args).unwrap()
    }

    fn run(&self, extra: &[&str]) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = run_app_with_output(self.cli(extra), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }
}

fn quoted(path: &Path) -> String {
    format!("'{}'", path.display())
}

#[test]
fn test_report_and_candidate_file() {
    let ws = Workspace::new();
    let older = ws.file("a.txt", &[b'x'; 100], 1_600_000_000);
    let newer = ws.file("b.txt", &[b'x'; 100], 1_700_000_000);
    let output = ws.dir.path().join("candidates.txt");
    let output_arg = output.to_string_lossy().into_owned();

    let (code, report) = ws.run(&["-o", &output_arg]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.contains("Found 1 duplicate group(s) with 1 duplicate file(s)"));
    assert!(report.contains(&newer.display().to_string()));
    assert!(report.contains("1 deletion candidate(s) written to"));

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(contents, format!("{}\n", quoted(&older)));
}

#[test]
fn test_no_duplicates_writes_no_file() {
    let ws = Workspace::new();
    ws.file("one.txt", b"alpha", 100);
    ws.file("two.txt", b"beta!", 200);
    let output = ws.dir.path().join("candidates.txt");
    let output_arg = output.to_string_lossy().into_owned();

    let (code, report) = ws.run(&["-o", &output_arg]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.contains("No duplicate files found (2 files scanned)."));
    assert!(!output.exists());
}

#[test]
fn test_quote_in_file_name_is_escaped() {
    let ws = Workspace::new();
    let tricky = ws.file("it's old.txt", b"same bytes", 100);
    ws.file("fresh.txt", b"same bytes", 200);
    let output = ws.dir.path().join("candidates.txt");
    let output_arg = output.to_string_lossy().into_owned();

    ws.run(&["-o", &output_arg]);

    let contents = fs::read_to_string(&output).unwrap();
    let expected = format!("'{}'\n", tricky.display().to_string().replace('\'', "'\\''"));
    assert_eq!(contents, expected);
}

#[test]
fn test_recursive_flag_controls_depth() {
    let ws = Workspace::new();
    ws.file("top.bin", b"payload", 100);
    ws.file("nested/deep.bin", b"payload", 200);

    let (_, shallow) = ws.run(&[]);
    assert!(shallow.contains("No duplicate files found (1 files scanned)."));

    let (_, recursive) = ws.run(&["-r"]);
    assert!(recursive.contains("Found 1 duplicate group(s)"));
}

#[test]
fn test_hash_algorithm_flag_changes_digest() {
    let ws = Workspace::new();
    ws.file("a", b"hello", 100);
    ws.file("b", b"hello", 200);

    let (_, md5) = ws.run(&[]);
    assert!(md5.contains("5d41402abc4b2a76b9719d911017c592"));

    let (_, sha256) = ws.run(&["--hash-algorithm", "sha256"]);
    assert!(sha256
        .contains("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"));
}

#[test]
fn test_delete_permanent_removes_only_candidates() {
    let ws = Workspace::new();
    let first = ws.file("first.dat", b"duplicate content", 100);
    let second = ws.file("second.dat", b"duplicate content", 200);
    let keeper = ws.file("third.dat", b"duplicate content", 300);
    let unique = ws.file("unique.dat", b"something else entirely", 50);

    let (code, _) = ws.run(&["--delete", "--permanent", "--yes"]);

    assert_eq!(code, ExitCode::Success);
    assert!(!first.exists());
    assert!(!second.exists());
    assert!(keeper.exists());
    assert!(unique.exists());
}

#[test]
fn test_unsupported_algorithm_rejected_by_parser() {
    let result = Cli::try_parse_from(["dupefind", "--hash-algorithm", "sha512", "/data"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_directories_rejected_by_parser() {
    assert!(Cli::try_parse_from(["dupefind", "-r"]).is_err());
}

#[test]
fn test_empty_directory_list_is_config_error() {
    let ws = Workspace::new();
    let mut cli = ws.cli(&[]);
    cli.directories.clear();

    let mut out = Vec::new();
    let err = run_app_with_output(cli, &mut out).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_missing_root_is_skipped() {
    let ws = Workspace::new();
    ws.file("a", b"dup", 100);
    ws.file("b", b"dup", 200);
    let missing = ws.dir.path().join("missing").to_string_lossy().into_owned();

    let (code, report) = ws.run(&[&missing]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.contains("Found 1 duplicate group(s)"));
}

#[test]
fn test_repeated_root_writes_no_candidates() {
    let ws = Workspace::new();
    let only = ws.file("only.txt", b"one copy", 100);
    let output = ws.dir.path().join("cand.txt");
    let output_arg = output.to_string_lossy().into_owned();
    let again = ws.data().to_string_lossy().into_owned();

    let (code, report) = ws.run(&["-o", &output_arg, &again]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.contains("No duplicate files found"));
    assert!(!output.exists());
    assert!(only.exists());
}

#[test]
fn test_delete_with_overlapping_roots_keeps_only_copy() {
    let ws = Workspace::new();
    let only = ws.file("only.txt", b"one copy", 100);
    let dotted = ws.data().join("..").join("data");
    let dotted_arg = dotted.to_string_lossy().into_owned();

    let (code, report) = ws.run(&["--delete", "--permanent", "--yes", &dotted_arg]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.contains("No duplicate files found"));
    assert!(only.exists());
}

#[cfg(unix)]
#[test]
fn test_delete_never_removes_symlink_target() {
    let ws = Workspace::new();
    let real = ws.file("z_real", b"payload", 100);
    let link = ws.data().join("a_link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let (code, _) = ws.run(&["--delete", "--permanent", "--yes"]);

    assert_eq!(code, ExitCode::Success);
    assert!(real.exists());
    assert!(link.exists());
}

#[cfg(unix)]
#[test]
fn test_hardlinked_names_are_not_reported() {
    let ws = Workspace::new();
    let original = ws.file("original", b"payload", 100);
    fs::hard_link(&original, ws.data().join("second_name")).unwrap();
    let output = ws.dir.path().join("cand.txt");
    let output_arg = output.to_string_lossy().into_owned();

    let (_, report) = ws.run(&["-o", &output_arg]);

    assert!(report.contains("No duplicate files found (2 files scanned)."));
    assert!(!output.exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_candidate_written_verbatim() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let ws = Workspace::new();
    let odd = ws.data().join(OsStr::from_bytes(b"caf\xff.txt"));
    fs::write(&odd, b"same bytes").unwrap();
    filetime::set_file_mtime(&odd, FileTime::from_unix_time(100, 0)).unwrap();
    ws.file("fresh.txt", b"same bytes", 200);
    let output = ws.dir.path().join("candidates.txt");
    let output_arg = output.to_string_lossy().into_owned();

    ws.run(&["-o", &output_arg]);

    let mut expected = b"'".to_vec();
    expected.extend_from_slice(odd.as_os_str().as_bytes());
    expected.extend_from_slice(b"'\n");
    assert_eq!(fs::read(&output).unwrap(), expected);
}
