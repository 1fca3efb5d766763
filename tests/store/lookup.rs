use workset::prelude::*;

use crate::{X, orders};

fn store_with_b() -> Store<X> {
    let mut store = Store::<X>::new();
    store.create_field(["b"]);
    store
}

#[test]
fn lookup() {
    let mut store = store_with_b();
    store.put(X::new(2, "test", "")).unwrap();
    store.put(X::new(1, "test", "")).unwrap();
    store.put(X::new(3, "not", "")).unwrap();

    let vals = store.select_by(&["b"]).lookup(&["test"]).unwrap();
    assert_eq!(orders(&vals), vec![1, 2]);
}

#[test]
fn lookup_invalid_field() {
    let mut store = store_with_b();
    store.put(X::new(1, "test", "")).unwrap();

    let selection = store.select_by(&["c"]);
    assert!(!selection.is_registered());
    assert!(selection.lookup(&["test"]).is_none());
    assert!(store.keys(&["c"]).is_empty());
}

#[test]
fn lookup_non_present_key() {
    let mut store = store_with_b();
    store.put(X::new(1, "test", "")).unwrap();

    assert!(store.select_by(&["b"]).lookup(&["dumb"]).is_none());
}

#[test]
fn lookup_wrong_arity() {
    let mut store = store_with_b();
    store.put(X::new(1, "test", "")).unwrap();

    assert!(store.select_by(&["b"]).lookup(&["test", ""]).is_none());
    assert!(store.select_by(&["b"]).lookup::<&str>(&[]).is_none());
}

#[test]
fn compound() {
    let mut store = Store::<X>::new();
    store.create_field(["b", "c"]);
    store.put(X::new(1, "one", "xxx")).unwrap();
    store.put(X::new(2, "one", "zzz")).unwrap();
    store.put(X::new(3, "two", "xxx")).unwrap();
    store.put(X::new(4, "two", "zzz")).unwrap();

    let out = store.select_by(&["b", "c"]).lookup(&["one", "zzz"]).unwrap();
    assert_eq!(orders(&out), vec![2]);

    // field order is part of the field set
    assert!(store.select_by(&["c", "b"]).lookup(&["zzz", "one"]).is_none());
    assert!(store.select_by(&["b"]).lookup(&["one"]).is_none());
}

#[test]
fn overlapping_field_sets() {
    let mut store = Store::<X>::new();
    store.create_field(["b"]);
    store.create_field(["b", "c"]);
    store.put(X::new(1, "one", "xxx")).unwrap();
    store.put(X::new(2, "one", "zzz")).unwrap();

    let by_b = store.select_by(&["b"]).lookup(&["one"]).unwrap();
    assert_eq!(orders(&by_b), vec![1, 2]);

    let mut keys = store.keys(&["b", "c"]);
    keys.sort();
    assert_eq!(keys, vec![vec!["one", "xxx"], vec!["one", "zzz"]]);
}
