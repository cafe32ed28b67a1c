//! End-to-end batch runs against temporary directory trees

use rescue_core::{
    BatchConfig, BatchDriver, CollisionPolicy, ErrorCategory, FileTarget, Stage, TextEncoding,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn rescue_moves_then_transforms() {
    let root = TempDir::new().unwrap();
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    write(&src.join("a.csv"), "id,status\n1,BURNOUT\n2,OK");
    fs::create_dir_all(&dst).unwrap();

    let config = BatchConfig::new(vec![FileTarget::new("rescue", "error rescue", &dst)
        .with_source(&src)]);
    let report = BatchDriver::new(config).run();

    assert!(report.is_clean());
    assert_eq!(report.total_moved(), 1);
    assert_eq!(report.total_transformed(), 1);
    assert_eq!(report.total_replacements(), 1);
    assert!(!src.join("a.csv").exists());
    assert_eq!(
        fs::read_to_string(dst.join("a.csv")).unwrap(),
        "id,status\n1,\n2,OK\n"
    );
}

#[test]
fn destination_is_created_when_missing() {
    let root = TempDir::new().unwrap();
    let src = root.path().join("dataerror");
    let dst = root.path().join("data");
    write(&src.join("one.csv"), "v\nBURNOUT\n");
    write(&src.join("two.csv"), "a,b\n1,2\n");
    assert!(!dst.exists());

    let report = BatchDriver::new(BatchConfig::default_for(root.path())).run();

    assert!(report.is_clean());
    assert!(dst.is_dir());
    assert!(dst.join("one.csv").exists());
    assert!(dst.join("two.csv").exists());
    assert!(!src.join("one.csv").exists());

    // the normal phase ran first against a missing directory
    assert_eq!(report.targets[0].listed, 0);
    assert_eq!(report.targets[1].moved, 2);
    assert_eq!(report.targets[1].transformed, 2);
}

#[test]
fn one_bad_file_does_not_stop_the_batch() {
    let root = TempDir::new().unwrap();
    let dst = root.path().join("data");
    write(&dst.join("a.csv"), "x\nBURNOUT\n");
    write(&dst.join("b.csv"), "x,y\n1,2,3\n");
    write(&dst.join("c.csv"), "x,y\nBURNOUT,1\n");
    let other = root.path().join("other");
    write(&other.join("d.csv"), "z\nBURNOUT\n");

    let config = BatchConfig::new(vec![
        FileTarget::new("first", "first", &dst),
        FileTarget::new("second", "second", &other),
    ]);
    let report = BatchDriver::new(config).run();

    let first = &report.targets[0];
    assert_eq!(first.listed, 3);
    assert_eq!(first.transformed, 2);
    assert_eq!(first.failed(), 1);
    assert_eq!(first.failures[0].stage, Stage::Transform);
    assert_eq!(first.failures[0].category, ErrorCategory::Parse);
    assert!(first.failures[0].path.ends_with("b.csv"));

    assert_eq!(report.targets[1].transformed, 1);
    assert_eq!(fs::read_to_string(dst.join("c.csv")).unwrap(), "x,y\n,1\n");
    assert_eq!(fs::read_to_string(dst.join("b.csv")).unwrap(), "x,y\n1,2,3\n");
}

#[test]
fn only_csv_files_at_top_level_are_touched() {
    let root = TempDir::new().unwrap();
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    write(&src.join("a.csv"), "s\nBURNOUT\n");
    write(&src.join("notes.txt"), "BURNOUT");
    write(&src.join("nested").join("b.csv"), "s\nBURNOUT\n");

    let config = BatchConfig::new(vec![FileTarget::new("t", "t", &dst).with_source(&src)]);
    let report = BatchDriver::new(config).run();

    assert_eq!(report.targets[0].source_listed, 1);
    assert!(src.join("notes.txt").exists());
    assert_eq!(
        fs::read_to_string(src.join("nested").join("b.csv")).unwrap(),
        "s\nBURNOUT\n"
    );
    assert!(!dst.join("notes.txt").exists());
}

#[test]
fn collision_rename_keeps_both_files() {
    let root = TempDir::new().unwrap();
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    write(&src.join("a.csv"), "s\nBURNOUT\n");
    write(&dst.join("a.csv"), "s\nkeep\n");

    let config = BatchConfig::new(vec![FileTarget::new("t", "t", &dst)
        .with_source(&src)
        .with_collision(CollisionPolicy::Rename)]);
    let report = BatchDriver::new(config).run();

    assert!(report.is_clean());
    assert_eq!(report.targets[0].listed, 2);
    assert_eq!(fs::read_to_string(dst.join("a.csv")).unwrap(), "s\nkeep\n");
    assert_eq!(fs::read_to_string(dst.join("a_1.csv")).unwrap(), "s\n\"\"\n");
}

#[test]
fn running_twice_changes_nothing_more() {
    let root = TempDir::new().unwrap();
    let dst = root.path().join("data");
    write(
        &dst.join("a.csv"),
        "id,score,name,code\n1,BURNOUT,x,007\n2,3.5,BURNOUT,BURNOUT\n",
    );

    let config = BatchConfig::new(vec![FileTarget::new("t", "t", &dst)]);
    let driver = BatchDriver::new(config);

    let first = driver.run();
    let after_first = fs::read_to_string(dst.join("a.csv")).unwrap();
    let second = driver.run();
    let after_second = fs::read_to_string(dst.join("a.csv")).unwrap();

    assert_eq!(first.total_replacements(), 3);
    assert_eq!(second.total_replacements(), 0);
    assert_eq!(after_first, "id,score,name,code\n1,,x,007\n2,3.5,,\n");
    assert_eq!(after_first, after_second);
}

#[test]
fn non_utf8_target_encoding() {
    let root = TempDir::new().unwrap();
    let dst = root.path().join("data");
    fs::create_dir_all(&dst).unwrap();
    fs::write(dst.join("a.csv"), b"name,state\ncaf\xE9,BURNOUT\n").unwrap();

    let target = FileTarget::new("t", "t", &dst)
        .with_encoding(TextEncoding::for_label("windows-1252").unwrap());
    let report = BatchDriver::new(BatchConfig::new(vec![target])).run();

    assert!(report.is_clean());
    assert_eq!(fs::read(dst.join("a.csv")).unwrap(), b"name,state\ncaf\xE9,\n");
}

#[test]
fn default_phases_do_not_reformat_rescued_files() {
    let root = TempDir::new().unwrap();
    write(
        &root.path().join("dataerror").join("a.csv"),
        "id,code\n12345678901234567891,007\n12345678901234567899,BURNOUT\n",
    );
    write(&root.path().join("data").join("b.csv"), "id,code\n1,BURNOUT\n");

    let first = BatchDriver::new(BatchConfig::default_for(root.path())).run();
    let second = BatchDriver::new(BatchConfig::default_for(root.path())).run();

    assert!(first.is_clean());
    assert_eq!(first.total_replacements(), 2);
    assert_eq!(second.total_replacements(), 0);
    assert_eq!(
        fs::read_to_string(root.path().join("data").join("a.csv")).unwrap(),
        "id,code\n12345678901234567891,007\n12345678901234567899,\n"
    );
}
