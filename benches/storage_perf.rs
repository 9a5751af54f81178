//! Storage layer performance benchmarks.
//!
//! Run with: cargo bench

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use cellar::config::Config;
use cellar::ops;
use cellar::storage::record::Match;
use cellar::storage::Session;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

fn open_session() -> (TempDir, Session) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("bench.db");
    let session = Session::open(&db_path, Config::default()).expect("open session");
    (dir, session)
}

fn seed(session: &mut Session, count: usize) {
    for i in 0..count {
        let key = format!("key-{i:06}");
        session
            .run(|tx| ops::set(tx, &key, "value", None, None))
            .expect("seed key");
    }
}

fn bench_set_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/set");

    group.bench_function("single", |b| {
        let (_dir, mut session) = open_session();
        let mut counter = 0usize;

        b.iter(|| {
            let key = format!("key-{counter}");
            session
                .run(|tx| ops::set(tx, black_box(&key), "value", None, None))
                .unwrap();
            counter += 1;
        });
    });

    group.finish();
}

fn bench_set_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/set_batch");

    for size in [10, 100, 500] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_with_large_drop(|| {
                let (dir, mut session) = open_session();
                seed(&mut session, size);
                (dir, session)
            });
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let (_dir, mut session) = open_session();
    seed(&mut session, 1000);

    c.bench_function("storage/get", |b| {
        b.iter(|| {
            let value = session
                .run(|tx| ops::get(tx, black_box("key-000500"), None))
                .unwrap();
            black_box(value)
        });
    });
}

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/list");

    for size in [100, 1_000, 10_000] {
        let (_dir, mut session) = open_session();
        seed(&mut session, size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let records = session
                    .run(|tx| ops::list(tx, "", Match::Existing))
                    .unwrap();
                black_box(records)
            });
        });
    }

    group.finish();
}

fn bench_history_revert_oscillation(c: &mut Criterion) {
    c.bench_function("storage/revert_oscillation", |b| {
        let (_dir, mut session) = open_session();
        session.run(|tx| ops::set(tx, "k", "a", None, None)).unwrap();
        session.run(|tx| ops::set(tx, "k", "b", None, None)).unwrap();

        b.iter(|| {
            session
                .run(|tx| ops::transform::revert(tx, black_box("k"), 1))
                .unwrap();
        });
    });
}

fn bench_lock_unlock(c: &mut Criterion) {
    c.bench_function("storage/lock_unlock", |b| {
        let (_dir, mut session) = open_session();
        session.run(|tx| ops::set(tx, "k", "secret", None, None)).unwrap();
        let mut locked = false;

        b.iter(|| {
            if locked {
                session.run(|tx| ops::unlock(tx, "k", "pw")).unwrap();
            } else {
                session.run(|tx| ops::lock(tx, "k", "pw")).unwrap();
            }
            locked = !locked;
        });
    });
}

fn bench_backup_to_path(c: &mut Criterion) {
    c.bench_function("storage/backup_to_path", |b| {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("bench.db");
        let backup_path = dir.path().join("bench.db.backup");
        let mut session = Session::open(&db_path, Config::default()).unwrap();
        seed(&mut session, 200);

        b.iter(|| {
            let taken = Session::open(&db_path, Config::default()).unwrap();
            session = cellar::storage::backup::backup_to_path(taken, &db_path, &backup_path).unwrap();
        });
    });
}

criterion_group!(
    storage_benches,
    bench_set_single,
    bench_set_batch,
    bench_get,
    bench_list,
    bench_history_revert_oscillation,
    bench_lock_unlock,
);

criterion_group!(backup_benches, bench_backup_to_path);

criterion_main!(storage_benches, backup_benches);
