use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use workset::prelude::*;

use crate::X;

#[test]
fn create_field() {
    let mut store = Store::<X>::new();
    store.create_field(["test"]);

    assert_eq!(store.fields(), vec![vec!["test".to_string()]]);
    assert!(!store.is_active());
}

#[test]
fn fields_keep_registration_order() {
    let mut store = Store::<X>::new();
    store.create_field(["c", "b"]);
    store.create_field(["b"]);
    store.create_field(["b"]);

    assert_eq!(store.fields(), vec![vec!["c", "b"], vec!["b"], vec!["b"]]);
}

#[test]
#[should_panic]
fn create_field_after_put() {
    let mut store = Store::<X>::new();
    store.put(X::order(0)).unwrap();
    store.create_field(["b"]);
}

#[test]
#[should_panic]
fn create_empty_field_set() {
    let mut store = Store::<X>::new();
    store.create_field(Vec::<String>::new());
}

#[test]
fn with_config_registers_fields() {
    let config = StoreConfig::new("xs").with_fields(["b"]).with_fields(["b", "c"]);
    let store = Store::<X>::with_config(config);

    assert_eq!(store.name(), "xs");
    assert_eq!(store.fields(), vec![vec!["b"], vec!["b", "c"]]);
}

#[test]
fn get_returns_stored_instance() {
    let mut store = Store::<X>::new();
    let orig = X::order(1);
    store.put(orig.clone()).unwrap();

    let got = store.get(X::order(1)).unwrap();
    assert!(Arc::ptr_eq(&got, &orig));
}

#[test]
fn get_missing() {
    let mut store = Store::<X>::new();
    store.put(X::order(1)).unwrap();

    assert!(store.get(X::order(2)).is_none());
}

#[test]
fn put_replaces_equal_order() {
    let mut store = Store::<X>::new();
    store.create_field(["b"]);
    let first = X::new(1, "one", "");
    let second = X::new(1, "two", "");

    assert!(store.put(first.clone()).unwrap().is_none());
    let replaced = store.put(second.clone()).unwrap().unwrap();

    assert!(Arc::ptr_eq(&replaced, &first));
    assert_eq!(store.len(), 1);
    assert!(Arc::ptr_eq(&store.get(X::order(1)).unwrap(), &second));
    assert!(store.select_by(&["b"]).lookup(&["one"]).is_none());
    assert_eq!(store.keys(&["b"]), vec![vec!["two"]]);
}

#[test]
fn delete_by_probe() {
    let mut store = Store::<X>::new();
    store.create_field(["b"]);
    let stored = X::new(1, "one", "");
    store.put(stored.clone()).unwrap();

    let deleted = store.delete(X::order(1)).unwrap().unwrap();
    assert!(Arc::ptr_eq(&deleted, &stored));
    assert!(store.is_empty());
    assert!(store.keys(&["b"]).is_empty());

    assert!(store.delete(X::order(1)).unwrap().is_none());
}

#[test]
fn expire_removes_from_every_index() {
    let mut store = Store::<X>::new();
    store.create_field(["b"]);
    store.create_field(["b", "c"]);
    let stale = X::new(2, "shared", "old");
    store.put(X::new(1, "shared", "new")).unwrap();
    store.put(stale.clone()).unwrap();
    store.put(X::new(3, "other", "new")).unwrap();

    stale.expire();
    let removed = store.expire().unwrap();

    assert_eq!(removed.len(), 1);
    assert!(Arc::ptr_eq(&removed[0], &stale));
    assert_eq!(store.len(), 2);
    assert!(store.select_by(&["b", "c"]).lookup(&["shared", "old"]).is_none());
    let shared = store.select_by(&["b"]).lookup(&["shared"]).unwrap();
    assert_eq!(crate::orders(&shared), vec![1]);

    assert!(store.expire().unwrap().is_empty());
}

#[test]
fn system_info_counts() {
    let mut store = Store::<X>::with_config(StoreConfig::new("xs").with_fields(["b"]));
    store.put(X::new(1, "one", "")).unwrap();
    store.put(X::new(2, "one", "")).unwrap();
    store.put(X::new(3, "two", "")).unwrap();

    let info = store.system_info();
    assert_eq!(info.records, 3);
    assert_eq!(info.indexes[0].fields, FieldSet::new(["b"]));
    assert_eq!(info.indexes[0].keys, 2);
    assert_eq!(info.indexes[0].records, 3);
}

struct Tagged {
    a: u32,
    tag: Mutex<String>,
    expired: AtomicBool,
}

impl Tagged {
    fn new(a: u32, tag: &str) -> Arc<Self> {
        Arc::new(Self {
            a,
            tag: Mutex::new(tag.to_string()),
            expired: AtomicBool::new(false),
        })
    }

    fn retag(&self, tag: &str) {
        *self.tag.lock() = tag.to_string();
    }
}

impl Indexer for Tagged {
    fn less(&self, other: &Self) -> bool {
        self.a < other.a
    }

    fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    fn field(&self, name: &str) -> String {
        match name {
            "tag" => self.tag.lock().clone(),
            _ => String::new(),
        }
    }
}

fn tagged_store(stored: &Arc<Tagged>) -> Store<Tagged> {
    let mut store = Store::<Tagged>::new();
    store.create_field(["tag"]);
    store.put(stored.clone()).unwrap();
    stored.retag("new");
    store
}

#[test]
fn delete_after_field_change() {
    let stored = Tagged::new(1, "old");
    let mut store = tagged_store(&stored);

    store.delete(Tagged::new(1, "")).unwrap().unwrap();

    assert!(store.is_empty());
    assert!(store.keys(&["tag"]).is_empty());
    assert!(store.select_by(&["tag"]).lookup(&["old"]).is_none());
    assert!(store.select_by(&["tag"]).lookup(&["new"]).is_none());
}

#[test]
fn replace_after_field_change() {
    let stored = Tagged::new(1, "old");
    let mut store = tagged_store(&stored);

    store.put(Tagged::new(1, "fresh")).unwrap().unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.keys(&["tag"]), vec![vec!["fresh"]]);
    assert!(store.select_by(&["tag"]).lookup(&["old"]).is_none());
    let fresh = store.select_by(&["tag"]).lookup(&["fresh"]).unwrap();
    assert_eq!(fresh.iter().map(|t| t.a).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn expire_after_field_change() {
    let stored = Tagged::new(1, "old");
    let mut store = tagged_store(&stored);

    stored.expired.store(true, Ordering::Relaxed);
    assert_eq!(store.expire().unwrap().len(), 1);

    assert!(store.is_empty());
    assert!(store.keys(&["tag"]).is_empty());
    assert!(store.select_by(&["tag"]).lookup(&["old"]).is_none());
}
