use dirmap_lib::{DirStore, StoreError};
use serial_test::serial;

use super::common::{Person, TestDir, person};

#[test]
fn values_persist_across_reopen() {
  let dir = TestDir::new();

  let mut store = dir.open();
  store.put("alice", person("Alice", 30)).unwrap();
  store.put("bob", person("Bob", 40)).unwrap();
  store.close();

  let mut reopened = dir.open();
  assert_eq!(reopened.len().unwrap(), 2);
  assert_eq!(reopened.get("alice").unwrap().as_deref(), Some(&person("Alice", 30)));
  assert_eq!(reopened.get("bob").unwrap().as_deref(), Some(&person("Bob", 40)));
}

#[test]
fn removal_persists_across_reopen() {
  let dir = TestDir::new();

  {
    let mut store = dir.open();
    store.put("a", person("A", 1)).unwrap();
    store.put("b", person("B", 2)).unwrap();
    store.remove("a").unwrap();
  }

  let mut reopened = dir.open();
  let keys: Vec<&str> = reopened.keys().unwrap().collect();
  assert_eq!(keys, vec!["b"]);
}

#[test]
fn reopen_on_existing_layout_reuses_lock_file() {
  let dir = TestDir::new();
  drop(dir.open());

  let lock = dir.store_path().join("lock");
  std::fs::write(&lock, "left by a previous run").unwrap();

  let mut store = dir.open();
  store.put("x", person("X", 1)).unwrap();
  assert_eq!(std::fs::read_to_string(&lock).unwrap(), "left by a previous run");
}

#[test]
fn closed_store_rejects_operations() {
  let dir = TestDir::new();
  let mut store = dir.open();
  store.close();

  match store.get("anything") {
    Err(StoreError::Closed(path)) => assert_eq!(path, store.path()),
    Err(other) => panic!("expected Closed error, got: {}", other),
    Ok(_) => panic!("expected error, got Ok"),
  }
}

#[test]
#[serial]
fn open_reads_capacity_from_environment() {
  let dir = TestDir::new();
  temp_env::with_var("DIRMAP_CACHE_CAPACITY", Some("1"), || {
    let mut store: DirStore<Person> = DirStore::open(dir.store_path()).unwrap();
    store.put("a", person("A", 1)).unwrap();
    store.put("b", person("B", 2)).unwrap();
    assert_eq!(store.cached_len(), 1);
  });
}

#[test]
#[serial]
fn open_with_entries_then_reopen() {
  let dir = TestDir::new();
  let initial = vec![("one".to_string(), person("One", 1)), ("two".to_string(), person("Two", 2))];
  let store = DirStore::open_with_entries(dir.store_path(), initial).unwrap();
  drop(store);

  let mut reopened = dir.open();
  assert_eq!(reopened.get("two").unwrap().as_deref(), Some(&person("Two", 2)));
}
