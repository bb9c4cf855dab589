use recall_wager::design::session_rng;
use recall_wager::pool::{load_word_list, read_word_list, ItemPool};
use recall_wager::WagerError;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_read_word_list_trims_and_skips_blanks() {
    let input = Cursor::new("apple\n  banana \n\n\t\ncherry\r\n");
    let words = read_word_list(input).unwrap();
    assert_eq!(words, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_load_word_list_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..300 {
        writeln!(file, "word{}", i).unwrap();
    }
    let words = load_word_list(file.path()).unwrap();
    assert_eq!(words.len(), 300);
    assert_eq!(words[0], "word0");
}

#[test]
fn test_missing_word_list_is_resource_missing() {
    let res = load_word_list("/nonexistent/words.txt");
    assert!(matches!(res, Err(WagerError::ResourceMissing(_))));
}

#[test]
fn test_partition_is_disjoint_and_drops_duplicates() {
    let mut words: Vec<String> = (0..60).map(|i| format!("w{}", i)).collect();
    words.extend((0..20).map(|i| format!("w{}", i)));

    let mut rng = session_rng(Some(3));
    let pool = ItemPool::partition(words, 16, 8, &mut rng).unwrap();

    let targets: HashSet<&String> = pool.targets().iter().collect();
    let lures: HashSet<&String> = pool.lures().iter().collect();
    assert_eq!(targets.len(), 24);
    assert_eq!(lures.len(), 16);
    assert!(targets.is_disjoint(&lures));
}

#[test]
fn test_partition_counts_unique_words() {
    // 40 lines but only 20 distinct words.
    let words: Vec<String> = (0..40).map(|i| format!("w{}", i % 20)).collect();
    let mut rng = session_rng(Some(1));
    match ItemPool::partition(words, 16, 8, &mut rng) {
        Err(WagerError::ResourceMissing(msg)) => assert!(msg.contains("20 unique")),
        other => panic!("expected ResourceMissing, got {:?}", other),
    }
}

#[test]
fn test_partition_without_practice() {
    let words: Vec<String> = (0..32).map(|i| format!("w{}", i)).collect();
    let mut rng = session_rng(Some(2));
    let pool = ItemPool::partition(words, 16, 0, &mut rng).unwrap();
    assert!(pool.practice_targets().is_empty());
    assert_eq!(pool.main_targets().len(), 16);
    assert_eq!(pool.lures().len(), 16);
}

#[test]
fn test_partition_replays_with_seed() {
    let words: Vec<String> = (0..100).map(|i| format!("w{}", i)).collect();
    let a = ItemPool::partition(words.clone(), 16, 8, &mut session_rng(Some(5))).unwrap();
    let b = ItemPool::partition(words, 16, 8, &mut session_rng(Some(5))).unwrap();
    assert_eq!(a, b);
}
