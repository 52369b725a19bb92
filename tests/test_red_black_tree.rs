extern crate rand;
extern crate rbset;

use rand::Rng;
use rbset::red_black_tree::RedBlackSet;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 2_000;

fn new_rng() -> rand::XorShiftRng {
    rand::SeedableRng::from_seed([1, 1, 1, 1])
}

fn ascending(set: &RedBlackSet<u32>) -> Vec<u32> {
    set.iter().cloned().collect()
}

#[test]
fn int_test_ascending_inserts() {
    let mut set = RedBlackSet::new();
    for value in 0..NUM_OF_OPERATIONS as u32 {
        assert_eq!(set.insert(value).unwrap(), true);
        assert!(set.contains(&value));
        assert!(set.validate().is_ok());
    }
    assert_eq!(set.len(), NUM_OF_OPERATIONS);

    for value in 0..NUM_OF_OPERATIONS as u32 {
        assert_eq!(set.remove(&value), Some(value));
        assert!(!set.contains(&value));
        assert!(set.validate().is_ok());
    }
    assert!(set.is_empty());
}

#[test]
fn int_test_descending_inserts() {
    let mut set = RedBlackSet::new();
    for value in (1..=NUM_OF_OPERATIONS as u32).rev() {
        assert_eq!(set.insert(value).unwrap(), true);
        assert!(set.validate().is_ok());
    }
    assert_eq!(ascending(&set), (1..=NUM_OF_OPERATIONS as u32).collect::<Vec<u32>>());

    for value in (1..=NUM_OF_OPERATIONS as u32).rev() {
        assert_eq!(set.remove(&value), Some(value));
        assert!(set.validate().is_ok());
    }
    assert!(set.is_empty());
}

#[test]
fn int_test_height_is_logarithmic() {
    let set: RedBlackSet<u32> = (0..NUM_OF_OPERATIONS as u32).collect();
    let black_height = set.validate().unwrap();
    // every root to leaf path has between `black_height` and `2 * black_height` nodes
    assert!(1 << black_height <= NUM_OF_OPERATIONS + 1);
}

#[test]
fn int_test_random_round_trip() {
    let mut rng = new_rng();
    let mut values: Vec<u32> = (0..NUM_OF_OPERATIONS as u32).collect();
    rng.shuffle(&mut values);

    let mut set = RedBlackSet::new();
    for value in &values {
        assert_eq!(set.insert(*value).unwrap(), true);
    }
    assert_eq!(set.len(), NUM_OF_OPERATIONS);

    rng.shuffle(&mut values);
    for (index, value) in values.iter().enumerate() {
        assert_eq!(set.remove(value), Some(*value));
        assert_eq!(set.len(), NUM_OF_OPERATIONS - index - 1);
        if index % 100 == 0 {
            for removed in &values[..=index] {
                assert!(!set.contains(removed));
            }
        }
    }
    assert!(set.is_empty());
    assert_eq!(set.validate(), Ok(0));
}

#[test]
fn int_test_against_btreeset() {
    let mut rng = new_rng();
    let mut set = RedBlackSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0, 500u32);
        if rng.gen::<bool>() {
            assert_eq!(set.insert(value).unwrap(), expected.insert(value));
        } else {
            assert_eq!(set.remove(&value).is_some(), expected.remove(&value));
        }
        assert_eq!(set.len(), expected.len());
        assert_eq!(set.contains(&value), expected.contains(&value));
    }

    assert!(set.validate().is_ok());
    assert_eq!(ascending(&set), expected.iter().cloned().collect::<Vec<u32>>());
    assert_eq!(set.min(), expected.iter().next());
    assert_eq!(set.max(), expected.iter().next_back());
}

#[test]
fn int_test_idempotence() {
    let mut rng = new_rng();
    let mut set = RedBlackSet::new();
    let mut inserted = 0;

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0, 1000u32);
        if set.insert(value).unwrap() {
            inserted += 1;
            assert_eq!(set.insert(value).unwrap(), false);
        }
    }
    assert_eq!(set.len(), inserted);

    let mut removed = 0;
    for value in 0..1000u32 {
        if set.remove(&value).is_some() {
            removed += 1;
            assert_eq!(set.remove(&value), None);
        }
    }
    assert_eq!(removed, inserted);
    assert!(set.is_empty());
}

#[test]
fn int_test_small_scenarios() {
    let mut set = RedBlackSet::new();
    for value in &[2, 4, 3] {
        set.insert(*value).unwrap();
    }
    assert_eq!(set.len(), 3);
    assert!(set.contains(&4));
    assert_eq!(ascending(&set), vec![2, 3, 4]);

    let mut set = RedBlackSet::new();
    for value in &[4, 3, 2, 1] {
        set.insert(*value).unwrap();
    }
    assert_eq!(set.remove(&3), Some(3));
    assert_eq!(set.len(), 3);
    assert_eq!(ascending(&set), vec![1, 2, 4]);
}

#[test]
fn int_test_wrapped_sequence_remove() {
    let mut set = RedBlackSet::new();
    for i in 0..15u32 {
        set.insert((i + 6) % 16).unwrap();
    }
    assert_eq!(set.remove(&9), Some(9));
    assert!(set.validate().is_ok());
    assert_eq!(set.len(), 14);
}

#[test]
fn int_test_for_each_snapshot() {
    let mut set: RedBlackSet<u32> = (1..=10).collect();
    let size = set.len();

    let mut counter = 0;
    set.for_each(|value, set| {
        counter += 1;
        set.remove(&(value + 1));
    });

    assert_eq!(counter, size);
    assert_eq!(set.len(), 1);
    assert!(set.validate().is_ok());
}

#[test]
fn int_test_for_each_random_mutation() {
    let mut rng = new_rng();
    let mut values: Vec<u32> = (0..200).map(|_| rng.gen_range(0, 1000u32)).collect();
    let mut set: RedBlackSet<u32> = values.iter().cloned().collect();
    values.sort();
    values.dedup();

    let mut visited = Vec::new();
    set.for_each(|value, set| {
        visited.push(value);
        set.remove(&(value * 2));
        set.insert(value + 1000).unwrap();
    });

    assert_eq!(visited, values);
    assert!(set.validate().is_ok());
}

#[test]
fn int_test_dump_to_file() {
    let set: RedBlackSet<u32> = (0..20).collect();
    let path = std::env::temp_dir().join(format!("rbset-dump-{}.dot", std::process::id()));
    set.dump_to_file(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(contents.starts_with("digraph RBTree {\n"));
    assert!(contents.ends_with("}\n"));
    assert_eq!(contents.matches("fillcolor=").count(), 20);
    // every node except the root is the target of exactly one edge
    assert_eq!(contents.matches(" -> ").count(), 19);
}
