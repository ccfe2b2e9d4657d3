//! Concurrent file store access tests
//!
//! Several processes (server plus CLI) may share one data directory. Each
//! test opens a separate `FileBlobStore` per thread, like separate processes
//! would, and checks that readers never observe a half-written blob.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use tally_core::adapters::FileBlobStore;
use tally_core::ports::{BlobStore, TRANSACTIONS_KEY};
use tally_core::Transaction;

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 20;

/// A batch whose size identifies the writer
fn batch_for(thread_id: usize) -> String {
    let batch: Vec<Transaction> = (0..=thread_id * 10)
        .map(|i| Transaction::new("2024-01-05", format!("t{} row {}", thread_id, i), -(i as f64)))
        .collect();
    serde_json::to_string_pretty(&batch).unwrap()
}

/// Writers and readers on separate store instances; every read must parse
#[test]
fn test_concurrent_writers_and_readers() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());

    let barrier = Arc::new(Barrier::new(THREAD_COUNT * 2));
    let torn_reads = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let writer_dir = Arc::clone(&dir);
        let writer_barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            let store = FileBlobStore::new(&writer_dir).unwrap();
            let content = batch_for(thread_id);
            writer_barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                store.put(TRANSACTIONS_KEY, &content).unwrap();
            }
        }));

        let reader_dir = Arc::clone(&dir);
        let reader_barrier = Arc::clone(&barrier);
        let torn_reads = Arc::clone(&torn_reads);
        handles.push(thread::spawn(move || {
            let store = FileBlobStore::new(&reader_dir).unwrap();
            reader_barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                if let Some(content) = store.get(TRANSACTIONS_KEY).unwrap() {
                    if serde_json::from_str::<Vec<Transaction>>(&content).is_err() {
                        torn_reads.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(torn_reads.load(Ordering::SeqCst), 0, "readers saw partial writes");

    // Last write wins: the final blob is exactly one writer's batch
    let store = FileBlobStore::new(&dir).unwrap();
    let final_content = store.get(TRANSACTIONS_KEY).unwrap().unwrap();
    assert!((0..THREAD_COUNT).any(|id| batch_for(id) == final_content));
}

/// Shorter content after longer content must not leave a stale tail
#[test]
fn test_alternating_sizes_never_leave_trailing_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileBlobStore::new(temp_dir.path()).unwrap();

    for thread_id in [5, 0, 3, 1] {
        let content = batch_for(thread_id);
        store.put(TRANSACTIONS_KEY, &content).unwrap();
        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().unwrap(), content);
    }
}
