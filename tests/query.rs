// tests/query.rs

//! Locator tests: sync archive scans, local database scans, repository
//! fallback order, and cache behavior.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use pacdb::{Database, Error, PackageRecord, Repository};
use tempfile::TempDir;

fn record(name: &str, version: &str) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        version: version.to_string(),
        description: format!("{name} test package"),
        depends: vec!["glibc".to_string()],
        ..Default::default()
    }
}

/// Write a sync database archive: a gzip tar of `<name>-<version>/desc`
/// entries.
fn write_sync_db(path: &Path, packages: &[&PackageRecord]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for pkg in packages {
        let blob = pkg.encode();
        let mut header = tar::Header::new_gnu();
        header.set_size(blob.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{}-{}/desc", pkg.name, pkg.version),
                blob.as_slice(),
            )
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// Write a raw blob as a single desc entry, bypassing the codec.
fn write_sync_db_raw(path: &Path, entry: &str, blob: &[u8]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let mut header = tar::Header::new_gnu();
    header.set_size(blob.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, entry, blob).unwrap();
    builder.into_inner().unwrap().finish().unwrap();
}

/// Write a local database: per-package subdirectories each holding a desc
/// file, plus the version marker pacman keeps at the root.
fn write_local_db(root: &Path, packages: &[&PackageRecord]) {
    for pkg in packages {
        let dir = root.join(format!("{}-{}", pkg.name, pkg.version));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("desc"), pkg.encode()).unwrap();
    }
    fs::write(root.join("ALPM_DB_VERSION"), b"9\n").unwrap();
}

#[test]
fn test_query_in_sync_archive() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("core.db");
    write_sync_db(&db_path, &[&record("foo", "1.0-1"), &record("bar", "2.0-1")]);

    let db = Database::new(vec![Repository::sync(&db_path)]);
    let pkg = db
        .query_in("bar", &Repository::sync(&db_path))
        .unwrap()
        .unwrap();
    assert_eq!(pkg.name, "bar");
    assert_eq!(pkg.version, "2.0-1");
}

#[test]
fn test_query_in_returns_none_when_absent() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("core.db");
    write_sync_db(&db_path, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![Repository::sync(&db_path)]);
    let found = db.query_in("baz", &Repository::sync(&db_path)).unwrap();
    assert!(found.is_none());
}

#[test]
fn test_multi_repository_fallback() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("core.db");
    let second = tmp.path().join("extra.db");
    write_sync_db(&first, &[&record("foo", "1.0-1")]);
    write_sync_db(&second, &[&record("bar", "2.0-1")]);

    let db = Database::new(vec![Repository::sync(&first), Repository::sync(&second)]);
    let pkg = db.query("bar").unwrap();
    assert_eq!(pkg.name, "bar");
}

#[test]
fn test_absent_repository_skipped() {
    let tmp = TempDir::new().unwrap();
    let present = tmp.path().join("extra.db");
    write_sync_db(&present, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![
        Repository::sync(tmp.path().join("missing.db")),
        Repository::sync(&present),
    ]);
    let pkg = db.query("foo").unwrap();
    assert_eq!(pkg.name, "foo");
}

#[test]
fn test_exhausted_search_is_package_not_found() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("core.db");
    write_sync_db(&db_path, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![Repository::sync(&db_path)]);
    match db.query("nope") {
        Err(Error::PackageNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn test_second_query_is_served_from_cache() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("core.db");
    write_sync_db(&db_path, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![Repository::sync(&db_path)]);
    let first = db.query("foo").unwrap();

    // With the backing file gone, only the cache can answer.
    fs::remove_file(&db_path).unwrap();
    let second = db.query("foo").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_prefix_collision_warms_cache() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("core.db");
    // Both entries share the "xz" prefix, so a scan for "xz" reads and
    // caches "xz-utils" before reaching the exact match.
    write_sync_db(
        &db_path,
        &[&record("xz-utils", "1.0-1"), &record("xz", "5.8.1-1")],
    );

    let db = Database::new(vec![Repository::sync(&db_path)]);
    let pkg = db.query("xz").unwrap();
    assert_eq!(pkg.name, "xz");

    fs::remove_file(&db_path).unwrap();
    let warmed = db.query("xz-utils").unwrap();
    assert_eq!(warmed.version, "1.0-1");
}

#[test]
fn test_local_database_lookup() {
    let tmp = TempDir::new().unwrap();
    write_local_db(tmp.path(), &[&record("foo", "1.0-1"), &record("bar", "2.0-1")]);

    let db = Database::new(vec![Repository::local(tmp.path())]);
    let pkg = db.query("bar").unwrap();
    assert_eq!(pkg.name, "bar");
    assert_eq!(pkg.version, "2.0-1");
}

#[test]
fn test_decode_error_aborts_search() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("core.db");
    let second = tmp.path().join("extra.db");
    write_sync_db_raw(&first, "foo-1.0-1/desc", b"%BOGUS%\nx\n\n");
    write_sync_db(&second, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![Repository::sync(&first), Repository::sync(&second)]);
    // The malformed record in the first repository is fatal; the search
    // never falls through to the second.
    match db.query("foo") {
        Err(Error::Format(_)) => {}
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_unreadable_archive_aborts_search() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("core.db");
    let second = tmp.path().join("extra.db");
    fs::write(&first, b"this is not a gzip archive").unwrap();
    write_sync_db(&second, &[&record("foo", "1.0-1")]);

    let db = Database::new(vec![Repository::sync(&first), Repository::sync(&second)]);
    match db.query("foo") {
        Err(Error::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}
