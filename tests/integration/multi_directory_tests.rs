use dupefind::duplicates::{DuplicateFinder, FinderConfig};
use dupefind::output::CandidateList;
use dupefind::scanner::ExclusionRules;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_at(path: &Path, content: &[u8], secs: i64) {
    fs::write(path, content).unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

#[test]
fn test_duplicates_across_roots() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_at(&first.path().join("photo.jpg"), b"jpeg data", 100);
    write_at(&second.path().join("photo copy.jpg"), b"jpeg data", 500);

    let finder = DuplicateFinder::new(FinderConfig::default().with_rules(ExclusionRules::none()));
    let (groups, _) = finder
        .find_duplicates(&[first.path().to_path_buf(), second.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    let group = groups.values().next().unwrap();
    assert_eq!(
        group.keeper().unwrap().path,
        second.path().join("photo copy.jpg")
    );
    assert_eq!(
        CandidateList::from_groups(&groups).paths(),
        &[first.path().join("photo.jpg")]
    );
}

#[test]
fn test_same_root_twice_yields_no_groups() {
    let dir = TempDir::new().unwrap();
    write_at(&dir.path().join("only.txt"), b"single", 100);

    let finder = DuplicateFinder::new(FinderConfig::default().with_rules(ExclusionRules::none()));
    let (groups, summary) = finder
        .find_duplicates(&[dir.path().to_path_buf(), dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.aliases_skipped, 1);
    assert!(groups.is_empty());
    assert!(CandidateList::from_groups(&groups).is_empty());
}

#[test]
fn test_nested_roots_do_not_double_count() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    write_at(&dir.path().join("top.txt"), b"copy", 100);
    write_at(&nested.join("inner.txt"), b"copy", 200);

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_recursive(true)
            .with_rules(ExclusionRules::none()),
    );
    let (groups, _) = finder
        .find_duplicates(&[dir.path().to_path_buf(), nested.clone()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    let group = groups.values().next().unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(
        CandidateList::from_groups(&groups).paths(),
        &[dir.path().join("top.txt")]
    );
}

#[test]
fn test_candidate_count_is_group_size_minus_one() {
    let roots: Vec<TempDir> = (0..4).map(|_| TempDir::new().unwrap()).collect();
    for (i, root) in roots.iter().enumerate() {
        write_at(&root.path().join("same.bin"), b"shared bytes", 100 + i as i64);
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_rules(ExclusionRules::none()));
    let paths: Vec<_> = roots.iter().map(|r| r.path().to_path_buf()).collect();
    let (groups, summary) = finder.find_duplicates(&paths).unwrap();

    let group = groups.values().next().unwrap();
    assert_eq!(group.len(), 4);
    assert_eq!(group.deletion_candidates().len(), 3);
    assert_eq!(summary.reclaimable_space, 3 * 12);
    assert_eq!(group.keeper().unwrap().path, roots[3].path().join("same.bin"));
}
