use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn put_then_get_roundtrip() {
  let env = TestEnv::empty();
  env.put("alice", r#"{"name":"Alice","age":30}"#);

  env
    .dirmap_cmd()
    .args(["get", "alice"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""name": "Alice""#))
    .stdout(predicate::str::contains(r#""age": 30"#));

  assert_eq!(
    std::fs::read_to_string(env.entry_path("alice")).unwrap(),
    r#"{"name":"Alice","age":30}"#
  );
}

#[test]
fn put_reports_previous_value() {
  let env = TestEnv::empty();
  env.put("alice", r#"{"age":30}"#);

  env
    .dirmap_cmd()
    .args(["-o", "json", "put", "alice", r#"{"age":31}"#])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""replaced": true"#))
    .stdout(predicate::str::contains(r#""age": 30"#));
}

#[test]
fn remove_prints_value_and_deletes_file() {
  let env = TestEnv::empty();
  env.put("bob", "42");

  env
    .dirmap_cmd()
    .args(["remove", "bob"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed 'bob'"))
    .stdout(predicate::str::contains("42"));

  assert!(!env.entry_path("bob").exists());
  env.dirmap_cmd().args(["get", "bob"]).assert().failure();
}

#[test]
fn remove_missing_key_warns() {
  let env = TestEnv::empty();

  env
    .dirmap_cmd()
    .args(["remove", "ghost"])
    .assert()
    .success()
    .stderr(predicate::str::contains("No entry for key 'ghost'"));
}

#[test]
fn corrupt_entry_needs_delete() {
  let env = TestEnv::empty();
  env.put("ok", "1");
  std::fs::write(env.entry_path("broken"), "{{{").unwrap();

  env
    .dirmap_cmd()
    .args(["remove", "broken"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("use `delete`"));
  assert!(env.entry_path("broken").exists());

  env
    .dirmap_cmd()
    .args(["delete", "broken"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Deleted 'broken'"));
  assert!(!env.entry_path("broken").exists());
}

#[test]
fn keys_are_listed_in_order() {
  let env = TestEnv::empty();
  env.put("pear", "1");
  env.put("apple", "2");
  env.put("fig", "3");

  env
    .dirmap_cmd()
    .arg("keys")
    .assert()
    .success()
    .stdout("apple\nfig\npear\n");

  env
    .dirmap_cmd()
    .args(["keys", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""apple""#));
}

#[test]
fn dump_prints_every_entry() {
  let env = TestEnv::empty();
  env.put("a", r#"{"n":1}"#);
  env.put("b", r#""two""#);

  env
    .dirmap_cmd()
    .arg("dump")
    .assert()
    .success()
    .stdout("a\t{\"n\":1}\nb\t\"two\"\n");

  env
    .dirmap_cmd()
    .args(["dump", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""b": "two""#));
}

#[test]
fn clear_removes_everything() {
  let env = TestEnv::empty();
  env.put("a", "1");
  env.put("b", "2");

  env
    .dirmap_cmd()
    .arg("clear")
    .assert()
    .success()
    .stdout(predicate::str::contains("Cleared 2 entries"));

  env.dirmap_cmd().arg("size").assert().success().stdout("0\n");
  assert!(env.store_path().join("data").is_dir());
}

#[test]
fn info_json_is_valid() {
  let env = TestEnv::empty();
  env.put("a", r#""xyz""#);

  let output = env.dirmap_cmd().args(["info", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(info["entries"], 1);
  assert_eq!(info["bytes"], 5);
  assert!(info["lock_file"].as_str().unwrap().ends_with("lock"));
}

#[test]
fn dir_flag_overrides_environment() {
  let env = TestEnv::empty();
  let other = env.temp.path().join("other");

  env
    .dirmap_cmd()
    .arg("--dir")
    .arg(&other)
    .args(["put", "k", "1"])
    .assert()
    .success();

  assert!(other.join("data").join("k").is_file());
  assert!(!env.entry_path("k").exists());
}

#[test]
fn verbose_logs_to_stderr() {
  let env = TestEnv::empty();

  env
    .dirmap_cmd()
    .args(["-v", "size"])
    .assert()
    .success()
    .stdout("0\n")
    .stderr(predicate::str::contains("opened store"));
}
