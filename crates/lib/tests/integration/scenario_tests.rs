use super::common::{TestDir, person};

#[test]
fn put_overwrite_remove_scenario() {
  let dir = TestDir::new();
  let mut store = dir.open();

  assert!(store.put("alice", person("Alice", 30)).unwrap().is_none());

  let previous = store.put("alice", person("Alice", 31)).unwrap();
  assert_eq!(previous.as_deref(), Some(&person("Alice", 30)));
  assert_eq!(store.len().unwrap(), 1);

  let removed = store.remove("alice").unwrap();
  assert_eq!(removed.as_deref(), Some(&person("Alice", 31)));
  assert_eq!(store.len().unwrap(), 0);
}

#[test]
fn missing_keys_are_absent_and_harmless() {
  let dir = TestDir::new();
  let mut store = dir.open();
  store.put("kept", person("Kept", 1)).unwrap();

  for key in ["ghost", "phantom", "nobody"] {
    assert!(store.get(key).unwrap().is_none());
    assert!(store.remove(key).unwrap().is_none());
  }

  assert_eq!(store.len().unwrap(), 1);
  assert_eq!(store.get("kept").unwrap().as_deref(), Some(&person("Kept", 1)));
  assert_eq!(dir.data_files(), vec!["kept".to_string()]);
}

#[test]
fn values_survive_eviction() {
  let dir = TestDir::new();
  let mut store = dir.open();

  let people = [person("Ann", 1), person("Ben", 64), person("", 0), person("Zoë ✓", u32::MAX)];
  for (i, p) in people.iter().enumerate() {
    store.put(&format!("p{}", i), p.clone()).unwrap();
  }
  store.evict_all();

  for (i, p) in people.iter().enumerate() {
    assert_eq!(store.get(&format!("p{}", i)).unwrap().as_deref(), Some(p));
  }
}

#[test]
fn caller_keeps_value_after_eviction() {
  let dir = TestDir::new();
  let mut store = dir.open();
  store.put("held", person("Held", 5)).unwrap();

  let value = store.get("held").unwrap().unwrap();
  store.evict_all();
  store.remove("held").unwrap();

  assert_eq!(*value, person("Held", 5));
}

#[test]
fn clear_twice_leaves_store_empty() {
  let dir = TestDir::new();
  let mut store = dir.open();
  store.put("a", person("A", 1)).unwrap();
  store.put("b", person("B", 2)).unwrap();

  store.clear().unwrap();
  assert!(store.is_empty().unwrap());
  assert!(dir.data_files().is_empty());

  store.clear().unwrap();
  assert!(store.is_empty().unwrap());
  assert!(dir.data_files().is_empty());

  // Usable afterwards.
  store.put("c", person("C", 3)).unwrap();
  assert_eq!(dir.data_files(), vec!["c".to_string()]);
}

#[test]
fn removed_key_is_gone() {
  let dir = TestDir::new();
  let mut store = dir.open();
  store.put("k", person("K", 7)).unwrap();
  store.remove("k").unwrap();

  assert!(store.get("k").unwrap().is_none());
  assert!(!store.keys().unwrap().any(|key| key == "k"));
  assert!(dir.data_files().is_empty());
}

#[test]
fn entries_visit_every_pair() {
  let dir = TestDir::new();
  let mut store = dir.open();
  for (name, age) in [("x", 1), ("y", 2), ("z", 3)] {
    store.put(name, person(name, age)).unwrap();
  }
  store.evict_all();

  let pairs: Vec<(String, u32)> = store
    .entries()
    .unwrap()
    .map(|entry| {
      let (key, value) = entry.unwrap();
      (key, value.age)
    })
    .collect();

  assert_eq!(
    pairs,
    vec![("x".to_string(), 1), ("y".to_string(), 2), ("z".to_string(), 3)]
  );
}
