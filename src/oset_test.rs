use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;

use std::collections::BTreeSet;

#[test]
fn test_oset() {
    let seed: u64 = random();
    // let seed: u64 = 8597341430317980227;
    println!("test_oset {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index = OSet::new(|a: &u8, b: &u8| a.cmp(b));
    let mut btset: BTreeSet<u8> = BTreeSet::new();

    let mut counts = [0_usize; 10];

    for _i in 0..1_000_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u8> = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btset.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btset.is_empty());
            }
            Op::Insert(key) => {
                counts[2] += 1;
                match (index.insert(key), btset.insert(key)) {
                    (Ok(()), true) => (),
                    (Err(Error::DuplicateKey(_, _)), false) => (),
                    (res, ok) => panic!("insert key {} oset:{:?} btset:{}", key, res, ok),
                }
            }
            Op::Remove(key) => {
                counts[3] += 1;
                let was_empty = btset.is_empty();
                match (index.remove(&key), btset.remove(&key)) {
                    (Ok(()), true) => (),
                    (Err(Error::EmptyTree(_, _)), false) if was_empty => (),
                    (Err(Error::KeyNotFound(_, _)), false) if !was_empty => (),
                    (res, ok) => panic!("remove key {} oset:{:?} btset:{}", key, res, ok),
                }
            }
            Op::Validate => {
                counts[4] += 1;
                index.validate().unwrap();
            }
            Op::Contains(key) => {
                counts[5] += 1;
                assert_eq!(index.contains(&key), btset.contains(&key), "for key {}", key);
            }
            Op::Min => {
                counts[6] += 1;
                match (index.min(), btset.iter().next()) {
                    (Ok(min), Some(r)) => assert_eq!(min, r),
                    (Err(Error::EmptyTree(_, _)), None) => (),
                    (res, r) => panic!("min oset:{:?} btset:{:?}", res, r),
                }
            }
            Op::Max => {
                counts[7] += 1;
                match (index.max(), btset.iter().next_back()) {
                    (Ok(max), Some(r)) => assert_eq!(max, r),
                    (Err(Error::EmptyTree(_, _)), None) => (),
                    (res, r) => panic!("max oset:{:?} btset:{:?}", res, r),
                }
            }
            Op::Iter => {
                counts[8] += 1;
                let a: Vec<&u8> = index.iter().collect();
                let b: Vec<&u8> = btset.iter().collect();
                assert_eq!(a, b);
            }
            Op::LevelOrder => {
                counts[9] += 1;
                let mut a: Vec<u8> = index.level_order().copied().collect();
                assert_eq!(a.len(), btset.len());
                a.sort_unstable();
                let b: Vec<u8> = btset.iter().copied().collect();
                assert_eq!(a, b);
            }
        }
    }

    let a: Vec<&u8> = index.iter().collect();
    let b: Vec<&u8> = btset.iter().collect();
    assert_eq!(a, b);

    println!("counts {:?} len:{}/{}", counts, index.len(), btset.len());
}

#[test]
fn test_insert_ascending() {
    let mut index = OSet::new(numeric_cmp);
    for key in (0..10).map(|i| i.to_string()) {
        index.insert(key).unwrap();
    }

    assert_eq!(index.len(), 10);
    assert_eq!(index.as_root().unwrap().to_color(), Color::Black);
    index.validate().unwrap();
    black_height(index.as_root());

    let keys: Vec<String> = index.iter().cloned().collect();
    let refkeys: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(keys, refkeys);

    assert_eq!(index.min().unwrap(), "0");
    assert_eq!(index.max().unwrap(), "9");
}

#[test]
fn test_numeric_comparator() {
    let mut index = OSet::new(numeric_cmp);
    for key in vec!["2", "10", "1"] {
        index.insert(key.to_string()).unwrap();
    }

    let keys: Vec<String> = index.iter().cloned().collect();
    assert_eq!(keys, vec!["1", "2", "10"]);
}

#[test]
fn test_contains() {
    let mut index = OSet::new(|a: &u64, b: &u64| a.cmp(b));
    assert_eq!(index.contains(&10), false);

    index.insert(10).unwrap();
    assert_eq!(index.contains(&10), true);

    index.remove(&10).unwrap();
    assert_eq!(index.contains(&10), false);
    assert_eq!(index.is_empty(), true);
}

#[test]
fn test_remove_two_child() {
    let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    for key in vec![5, 3, 8, 1, 4, 7, 9] {
        index.insert(key).unwrap();
    }

    index.remove(&5).unwrap();

    // successor of 5, that is 7, must take its place at the root.
    assert_eq!(*index.as_root().unwrap().as_key(), 7);
    assert_eq!(index.contains(&5), false);

    let keys: Vec<i32> = index.iter().copied().collect();
    assert_eq!(keys, vec![1, 3, 4, 7, 8, 9]);

    index.validate().unwrap();
    black_height(index.as_root());
}

#[test]
fn test_remove_missing() {
    let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    for key in vec![5, 3, 8, 1, 4, 7, 9] {
        index.insert(key).unwrap();
    }

    let mut before = Vec::default();
    snapshot(index.as_root(), &mut before);

    match index.remove(&6) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("expected KeyNotFound, got {:?}", res),
    }
    assert_eq!(index.len(), 7);

    let mut after = Vec::default();
    snapshot(index.as_root(), &mut after);
    assert_eq!(before, after);
}

#[test]
fn test_insert_duplicate() {
    let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    for key in vec![10, 20, 30] {
        index.insert(key).unwrap();
    }

    let mut before = Vec::default();
    snapshot(index.as_root(), &mut before);

    match index.insert(20) {
        Err(Error::DuplicateKey(_, _)) => (),
        res => panic!("expected DuplicateKey, got {:?}", res),
    }
    assert_eq!(index.len(), 3);

    let mut after = Vec::default();
    snapshot(index.as_root(), &mut after);
    assert_eq!(before, after);

    index.validate().unwrap();
}

#[test]
fn test_remove_all() {
    let seed: u64 = random();
    // let seed: u64 = 13843352057269056793;
    println!("test_remove_all {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index = OSet::new(|a: &u16, b: &u16| a.cmp(b));
    let mut keys: Vec<u16> = (0..512).collect();
    for key in keys.clone() {
        index.insert(key).unwrap();
    }

    keys.shuffle(&mut rng);
    for key in keys {
        index.remove(&key).unwrap();
        index.validate().unwrap();
    }

    assert_eq!(index.len(), 0);
    assert_eq!(index.is_empty(), true);
    assert!(index.iter().next().is_none());
    assert!(index.level_order().next().is_none());

    match index.remove(&0) {
        Err(Error::EmptyTree(_, _)) => (),
        res => panic!("expected EmptyTree, got {:?}", res),
    }
    match index.min() {
        Err(Error::EmptyTree(_, _)) => (),
        res => panic!("expected EmptyTree, got {:?}", res),
    }
    match index.max() {
        Err(Error::EmptyTree(_, _)) => (),
        res => panic!("expected EmptyTree, got {:?}", res),
    }
}

#[test]
fn test_level_order() {
    let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    assert!(index.level_order().next().is_none());

    for key in vec![5, 3, 8, 1, 4, 7, 9] {
        index.insert(key).unwrap();
    }

    // a perfect tree, keys show up level by level, left to right.
    let keys: Vec<i32> = index.level_order().copied().collect();
    assert_eq!(keys, vec![5, 3, 8, 1, 4, 7, 9]);

    // a fresh scan starts over from the root.
    let keys: Vec<i32> = index.level_order().copied().collect();
    assert_eq!(keys, vec![5, 3, 8, 1, 4, 7, 9]);
}

#[test]
fn test_black_height() {
    let mut index = OSet::new(|a: &u32, b: &u32| a.cmp(b));

    for key in 0..256 {
        index.insert(key).unwrap();
        black_height(index.as_root());
    }
    for key in (0..256).filter(|k| k % 2 == 0) {
        index.remove(&key).unwrap();
        black_height(index.as_root());
        index.validate().unwrap();
    }

    assert_eq!(index.len(), 128);
    let keys: Vec<u32> = index.iter().copied().collect();
    let refkeys: Vec<u32> = (0..256).filter(|k| k % 2 == 1).collect();
    assert_eq!(keys, refkeys);
}

#[derive(Debug, Arbitrary)]
enum Op<K> {
    Len,
    IsEmpty,
    Insert(K),
    Remove(K),
    Validate,
    Contains(K),
    Min,
    Max,
    Iter,
    LevelOrder,
}

// order strings numerically when both parse as integers, lexicographic
// otherwise.
fn numeric_cmp(a: &String, b: &String) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

// count blacks from node to every absent child, asserting that all
// paths agree on the count.
fn black_height<K>(node: Option<&Node<K>>) -> usize {
    match node {
        None => 0,
        Some(node) => {
            let lb = black_height(node.as_left_ref());
            let rb = black_height(node.as_right_ref());
            assert_eq!(lb, rb, "unbalanced blacks");
            match node.to_color() {
                Color::Black => lb + 1,
                Color::Red => lb,
            }
        }
    }
}

// pre-order listing of (key, color) with explicit markers for absent
// children, pins the exact tree shape.
fn snapshot<K: Clone>(node: Option<&Node<K>>, acc: &mut Vec<Option<(K, Color)>>) {
    match node {
        None => acc.push(None),
        Some(node) => {
            acc.push(Some((node.as_key().clone(), node.to_color())));
            snapshot(node.as_left_ref(), acc);
            snapshot(node.as_right_ref(), acc);
        }
    }
}
