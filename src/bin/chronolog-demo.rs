//! ChronoLog Demo Binary
//!
//! Exercises a memtable the way an engine's write path would: writer threads
//! fill the active memtable, a full one is frozen and swapped for a fresh one,
//! and a background flush thread drains the frozen tables.

use std::sync::Arc;
use std::thread;

use chronolog::{ChronoError, Config, MemTable};
use clap::Parser;
use crossbeam::channel::{self, Receiver};
use parking_lot::RwLock;
use tracing_subscriber::{fmt, EnvFilter};

/// ChronoLog Demo
#[derive(Parser, Debug)]
#[command(name = "chronolog-demo")]
#[command(about = "In-memory LSM write buffer demo")]
#[command(version)]
struct Args {
    /// MemTable size limit in KB before a flush is due
    #[arg(short = 'm', long, default_value = "64")]
    memtable_kb: usize,

    /// Keys written per writer thread
    #[arg(short, long, default_value = "10000")]
    keys: usize,

    /// Number of writer threads
    #[arg(short, long, default_value = "4")]
    writers: usize,
}

/// Summary reported by the flush thread
#[derive(Debug, Default)]
struct FlushStats {
    tables: usize,
    entries: usize,
    tombstones: usize,
    bytes: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chronolog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("ChronoLog Demo v{}", chronolog::VERSION);

    let config = Config::builder()
        .memtable_size_limit(args.memtable_kb * 1024)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    basic_walkthrough(&config);

    let stats = run_rotation(&config, args.writers, args.keys);
    tracing::info!(
        "Flushed {} memtables: {} entries ({} tombstones), ~{} bytes",
        stats.tables,
        stats.entries,
        stats.tombstones,
        stats.bytes
    );
}

/// Single-threaded tour of the memtable API
fn basic_walkthrough(config: &Config) {
    let memtable = MemTable::with_config(config);

    memtable.put("user:1", "Alice");
    memtable.put("user:2", "Bob");
    memtable.put("user:3", "Charlie");
    tracing::info!("Inserted 3 users");

    if let Some(v) = memtable.get(b"user:2") {
        tracing::info!("user:2 = {}", String::from_utf8_lossy(&v));
    }

    memtable.put("user:2", "Robert");
    if let Some(v) = memtable.get(b"user:2") {
        tracing::info!("Updated user:2 = {}", String::from_utf8_lossy(&v));
    }

    memtable.remove("user:3");
    if memtable.get(b"user:3").is_none() {
        tracing::info!(
            "user:3 deleted (tombstone kept: {})",
            memtable.get_entry(b"user:3").is_some()
        );
    }

    for entry in memtable.get_range(b"user:1", b"user:9") {
        tracing::info!(
            "{} {} @ {}",
            entry.kind,
            String::from_utf8_lossy(&entry.key),
            entry.timestamp
        );
    }

    tracing::info!(
        "MemTable size: {} bytes, entry count: {}",
        memtable.size_bytes(),
        memtable.entry_count()
    );
}

/// Write from several threads, rotating memtables as they fill up
fn run_rotation(config: &Config, writers: usize, keys: usize) -> FlushStats {
    let (tx, rx) = channel::unbounded::<Arc<MemTable>>();
    let active = Arc::new(RwLock::new(Arc::new(MemTable::with_config(config))));

    let flusher = thread::spawn(move || flush_loop(rx));

    let mut handles = Vec::with_capacity(writers);
    for w in 0..writers {
        let active = Arc::clone(&active);
        let tx = tx.clone();
        let config = config.clone();

        handles.push(thread::spawn(move || {
            for j in 0..keys {
                let key = format!("writer{:02}:key{:08}", w, j);
                let value = format!("value{}", j);

                // A frozen table rejects the write; retry on the new active one
                loop {
                    let memtable = Arc::clone(&*active.read());
                    let result = if j % 7 == 6 {
                        memtable.try_remove(key.clone())
                    } else {
                        memtable.try_put(key.clone(), value.clone())
                    };

                    match result {
                        Ok(()) => {
                            if memtable.should_flush() {
                                rotate(&active, &memtable, &config, &tx);
                            }
                            break;
                        }
                        Err(ChronoError::Immutable) => continue,
                        Err(e) => {
                            tracing::error!("Write failed: {}", e);
                            return;
                        }
                    }
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("Writer thread panicked");
        }
    }

    // Hand over whatever is left in the last active table
    let last = Arc::clone(&*active.read());
    last.make_immutable();
    if !last.is_empty() && tx.send(last).is_err() {
        tracing::error!("Flush thread exited early");
    }
    drop(tx);

    match flusher.join() {
        Ok(stats) => stats,
        Err(_) => {
            tracing::error!("Flush thread panicked");
            FlushStats::default()
        }
    }
}

/// Freeze `full` and install a fresh memtable, unless another writer already did
fn rotate(
    active: &RwLock<Arc<MemTable>>,
    full: &Arc<MemTable>,
    config: &Config,
    tx: &channel::Sender<Arc<MemTable>>,
) {
    let mut current = active.write();
    if !Arc::ptr_eq(&*current, full) {
        return;
    }

    full.make_immutable();
    *current = Arc::new(MemTable::with_config(config));

    if tx.send(Arc::clone(full)).is_err() {
        tracing::error!("Flush thread exited early");
    }
}

/// Drain frozen memtables until every sender is gone
fn flush_loop(rx: Receiver<Arc<MemTable>>) -> FlushStats {
    let mut stats = FlushStats::default();

    for memtable in rx {
        let entries = memtable.get_all_entries();
        let tombstones = entries.iter().filter(|e| e.is_tombstone()).count();

        tracing::debug!(
            "Flushing memtable #{}: {} entries ({} tombstones), ~{} bytes",
            stats.tables,
            entries.len(),
            tombstones,
            memtable.size_bytes()
        );

        stats.tables += 1;
        stats.entries += entries.len();
        stats.tombstones += tombstones;
        stats.bytes += memtable.size_bytes();
    }

    stats
}
