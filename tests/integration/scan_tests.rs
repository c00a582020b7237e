use dupefind::duplicates::{DuplicateFinder, FinderConfig};
use dupefind::output::CandidateList;
use dupefind::scanner::{ExclusionRules, HashAlgorithm, ScanError};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_at(path: &Path, content: &[u8], secs: i64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn finder(recursive: bool, rules: ExclusionRules) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default()
            .with_recursive(recursive)
            .with_rules(rules),
    )
}

#[test]
fn test_two_identical_files_newest_is_kept() {
    let dir = TempDir::new().unwrap();
    let content = vec![b'z'; 100];
    write_at(&dir.path().join("a.txt"), &content, 1_600_000_000);
    write_at(&dir.path().join("b.txt"), &content, 1_700_000_000);

    let (groups, summary) = finder(false, ExclusionRules::none())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups.values().next().unwrap().len(), 2);
    assert_eq!(summary.duplicate_files, 1);

    let candidates = CandidateList::from_groups(&groups);
    assert_eq!(candidates.paths(), &[dir.path().join("a.txt")]);
}

#[test]
fn test_same_size_distinct_content_not_grouped() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("one"), &[7u8; 50], 100);
    write_at(&dir.path().join("two"), &[7u8; 50], 200);
    write_at(&dir.path().join("three"), &[8u8; 50], 300);

    let (groups, summary) = finder(false, ExclusionRules::none())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.files_hashed, 3);
    assert_eq!(groups.len(), 1);
    let group = groups.values().next().unwrap();
    assert_eq!(group.len(), 2);
    assert!(!group.paths().contains(&dir.path().join("three")));
}

#[test]
fn test_node_modules_is_never_entered() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_at(&root.join("src/index.js"), b"module.exports = 1;", 100);
    write_at(&root.join("node_modules/pkg/index.js"), b"module.exports = 1;", 200);
    write_at(&root.join("node_modules/other/index.js"), b"module.exports = 1;", 300);

    let rules = ExclusionRules::new(["node_modules"], Vec::<String>::new());
    let (groups, summary) = finder(true, rules)
        .find_duplicates(&[root.to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_shallow_scan_ignores_subdirectories() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("top.txt"), b"same", 100);
    write_at(&dir.path().join("sub/nested.txt"), b"same", 200);

    let (groups, _) = finder(false, ExclusionRules::none())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert!(groups.is_empty());

    let (groups, _) = finder(true, ExclusionRules::none())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_excluded_suffix_and_hidden_files() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("keep1.txt"), b"payload", 100);
    write_at(&dir.path().join("keep2.txt"), b"payload", 200);
    write_at(&dir.path().join("scratch.swp"), b"payload", 300);
    write_at(&dir.path().join(".hidden"), b"payload", 400);

    let rules = ExclusionRules::new([".*"], [".swp"]);
    let (groups, summary) = finder(false, rules)
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.total_files, 2);
    let group = groups.values().next().unwrap();
    let mut paths = group.paths();
    paths.sort();
    assert_eq!(
        paths,
        vec![dir.path().join("keep1.txt"), dir.path().join("keep2.txt")]
    );
}

#[test]
fn test_every_algorithm_finds_the_same_groups() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("x1"), b"identical bytes", 100);
    write_at(&dir.path().join("x2"), b"identical bytes", 200);
    write_at(&dir.path().join("y"), b"different bytes", 300);

    for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
        let finder = DuplicateFinder::new(
            FinderConfig::default()
                .with_rules(ExclusionRules::none())
                .with_hash_algorithm(algorithm),
        );
        let (groups, _) = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(groups.len(), 1, "{algorithm}");
        let key = groups.keys().next().unwrap();
        assert_eq!(key.digest.len(), algorithm.hex_len());
        assert_eq!(key.size, 15);
    }
}

#[test]
fn test_small_chunk_size_gives_same_result() {
    let dir = TempDir::new().unwrap();
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    write_at(&dir.path().join("big1"), &content, 100);
    write_at(&dir.path().join("big2"), &content, 200);

    let roots = [dir.path().to_path_buf()];
    let default = finder(false, ExclusionRules::none())
        .find_duplicates(&roots)
        .unwrap()
        .0;
    let tiny = DuplicateFinder::new(
        FinderConfig::default()
            .with_rules(ExclusionRules::none())
            .with_chunk_size(7),
    )
    .find_duplicates(&roots)
    .unwrap()
    .0;

    assert_eq!(default.keys().collect::<Vec<_>>(), tiny.keys().collect::<Vec<_>>());
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = TempDir::new().unwrap();
    for i in 0..8 {
        let content = format!("content-{}", i % 3);
        write_at(&dir.path().join(format!("f{i}.dat")), content.as_bytes(), 1000 + i);
    }

    let finder = finder(false, ExclusionRules::none());
    let roots = [dir.path().to_path_buf()];
    let (first, _) = finder.find_duplicates(&roots).unwrap();
    let (second, _) = finder.find_duplicates(&roots).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_nonexistent_root_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("a"), b"dup", 100);
    write_at(&dir.path().join("b"), b"dup", 200);
    let missing: PathBuf = dir.path().join("nowhere");

    let (groups, summary) = finder(false, ExclusionRules::none())
        .find_duplicates(&[missing.clone(), dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert!(summary
        .scan_errors
        .iter()
        .any(|e| matches!(e, ScanError::NotFound(p) if *p == missing)));
}
