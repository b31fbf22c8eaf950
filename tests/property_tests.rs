//! Property tests: the trie's partition must agree with a naive
//! group-by-content partition, and files with unique sizes must never be
//! hashed.

use dupetrie::engine::{InitParams, RunSummary, SearchEngine};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tempfile::TempDir;

fn scan(contents: &[Vec<u8>], block_size: u64) -> (TempDir, SearchEngine, RunSummary) {
    let dir = TempDir::new().unwrap();
    for (i, content) in contents.iter().enumerate() {
        fs::write(dir.path().join(format!("f{i:03}")), content).unwrap();
    }

    let mut engine = SearchEngine::new(InitParams {
        block_size,
        file_min_size: 0,
        paths_scan: vec![dir.path().to_path_buf()],
        ..Default::default()
    })
    .unwrap();
    let summary = engine.run(false);
    (dir, engine, summary)
}

fn trie_partition(engine: &SearchEngine) -> BTreeSet<Vec<String>> {
    engine
        .groups()
        .map(|class| {
            let mut names: Vec<String> = class
                .paths()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        })
        .collect()
}

fn content_partition(contents: &[Vec<u8>]) -> BTreeSet<Vec<String>> {
    let mut by_content: BTreeMap<&Vec<u8>, Vec<String>> = BTreeMap::new();
    for (i, content) in contents.iter().enumerate() {
        by_content.entry(content).or_default().push(format!("f{i:03}"));
    }
    by_content
        .into_values()
        .map(|mut names| {
            names.sort();
            names
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // A low-entropy alphabet and tiny blocks force plenty of size and
    // prefix collisions, which is where the trie earns its keep.
    #[test]
    fn test_partition_matches_group_by_content(
        contents in prop::collection::vec(prop::collection::vec(0u8..3, 0..12), 1..10),
        block_size in 1u64..6,
    ) {
        let (_dir, engine, summary) = scan(&contents, block_size);

        prop_assert_eq!(summary.files_accepted as usize, contents.len());
        prop_assert_eq!(trie_partition(&engine), content_partition(&contents));
    }

    #[test]
    fn test_unique_sizes_perform_zero_digests(
        lengths in prop::collection::btree_set(0usize..40, 1..8),
    ) {
        let contents: Vec<Vec<u8>> = lengths.iter().map(|&n| vec![b'x'; n]).collect();
        let (_dir, engine, summary) = scan(&contents, 4);

        prop_assert_eq!(summary.digest_ops, 0);
        prop_assert_eq!(engine.digest_count(), 0);
        prop_assert_eq!(engine.groups().count(), contents.len());
    }

    #[test]
    fn test_rerun_is_idempotent(
        contents in prop::collection::vec(prop::collection::vec(0u8..3, 0..10), 1..8),
        block_size in 1u64..5,
    ) {
        let (_dir, mut engine, first_summary) = scan(&contents, block_size);
        let first = trie_partition(&engine);

        let second_summary = engine.run(false);
        prop_assert_eq!(trie_partition(&engine), first);
        prop_assert_eq!(second_summary.files_accepted, first_summary.files_accepted);
        prop_assert_eq!(second_summary.digest_ops, first_summary.digest_ops);
    }

    #[test]
    fn test_every_file_lands_in_exactly_one_class(
        contents in prop::collection::vec(prop::collection::vec(0u8..2, 0..8), 1..10),
        block_size in 1u64..4,
    ) {
        let (_dir, engine, summary) = scan(&contents, block_size);

        let mut all = Vec::new();
        for class in engine.groups() {
            class.visit(|path| all.push(path.to_path_buf()));
        }
        let unique: BTreeSet<_> = all.iter().cloned().collect();
        prop_assert_eq!(unique.len(), all.len());
        prop_assert_eq!(all.len() as u64, summary.files_accepted);
    }
}
