use clap::Parser;
use dupefind::cli::Cli;
use dupefind::config::{Config, ConfigError};
use dupefind::error::ExitCode;
use dupefind::run_app_with_output;
use dupefind::scanner::HashAlgorithm;
use std::ffi::OsString;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "hash_algorithm = \"sha1\"\nchunk_size = 4096\nexcluded_dirs = [\"vendor\"]\nexcluded_files = []\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.hash_algorithm, HashAlgorithm::Sha1);
    assert_eq!(config.chunk_size, 4096);
    assert_eq!(config.excluded_dirs, vec!["vendor".to_string()]);
    assert!(config.excluded_files.is_empty());
}

#[test]
fn test_partial_config_keeps_remaining_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "hash_algorithm = \"sha256\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    let defaults = Config::default();
    assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.chunk_size, defaults.chunk_size);
    assert_eq!(config.excluded_dirs, defaults.excluded_dirs);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
}

#[test]
fn test_unknown_algorithm_in_file_fails_before_scanning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "hash_algorithm = \"sha512\"\n").unwrap();

    let scan_root = dir.path().join("data");
    fs::create_dir(&scan_root).unwrap();
    let output = dir.path().join("candidates.txt");

    let args: Vec<OsString> = vec![
        "dupefind".into(),
        "--config".into(),
        path.clone().into(),
        "-o".into(),
        output.clone().into(),
        "-q".into(),
        scan_root.into(),
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    let mut out = Vec::new();
    let err = run_app_with_output(cli, &mut out).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
    assert!(out.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_zero_chunk_size_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "chunk_size = 0\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidChunkSize));
}
