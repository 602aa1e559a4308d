//! Concurrent file processor (§5): a bounded worker pool over a
//! crossbeam-channel producer/worker/consumer pipeline, grounded on the
//! parse/build split in `parallel_pipeline.rs`/`bounded_pipeline.rs` — file
//! I/O and parsing fan out across `W = 2 × hardware_parallelism` workers,
//! the caller collects results sequentially.

use crate::error::{EngineError, ErrorLog};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tree_sitter::Parser;

#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress reporting hook. `add` registers the total unit count up front,
/// `tick` reports one unit (one file) done.
pub trait Tracker: Send + Sync {
    fn add(&self, n: u64);
    fn tick(&self, path: &Path);
}

#[derive(Default)]
pub struct NullTracker;

impl Tracker for NullTracker {
    fn add(&self, _n: u64) {}
    fn tick(&self, _path: &Path) {}
}

/// Shared state for one `map_files`-family call: cancellation, error
/// collection, progress reporting, and the worker-pool width.
pub struct Context {
    pub cancellation: CancellationToken,
    pub errors: Arc<ErrorLog>,
    pub tracker: Arc<dyn Tracker>,
    pub workers: usize,
}

impl Context {
    pub fn new() -> Self {
        let workers = default_worker_count();
        Self {
            cancellation: CancellationToken::new(),
            errors: Arc::new(ErrorLog::new()),
            tracker: Arc::new(NullTracker),
            workers,
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn Tracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4) * 2
}

/// Bounded pool of pre-constructed `tree_sitter::Parser`s, leased one at a
/// time per worker. Built once up front so workers never pay allocation
/// cost mid-pipeline; `set_language` is still called per file since the
/// language varies.
pub struct ParserPool {
    tx: Sender<Parser>,
    rx: Receiver<Parser>,
}

impl ParserPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (tx, rx) = bounded(size);
        for _ in 0..size {
            let _ = tx.send(Parser::new());
        }
        Self { tx, rx }
    }

    pub fn lease(&self) -> Parser {
        self.rx.recv().unwrap_or_else(|_| Parser::new())
    }

    pub fn release(&self, parser: Parser) {
        let _ = self.tx.send(parser);
    }
}

/// Generic parallel map over file paths. `f` runs on whichever worker
/// leases the path; results are collected in completion order (not input
/// order — callers that need stable ordering sort by path downstream).
pub fn map_files<F, R>(ctx: &Context, files: Vec<PathBuf>, f: F) -> Vec<R>
where
    F: Fn(&Path) -> Result<R, EngineError> + Send + Sync + 'static,
    R: Send + 'static,
{
    ctx.tracker.add(files.len() as u64);
    let num_workers = ctx.workers.max(1);
    let (file_tx, file_rx) = bounded::<PathBuf>(num_workers * 4);
    let (result_tx, result_rx) = bounded::<R>(num_workers * 4);

    let cancellation = ctx.cancellation.clone();
    let producer = thread::spawn(move || {
        for file in files {
            if cancellation.is_canceled() || file_tx.send(file).is_err() {
                break;
            }
        }
    });

    let f = Arc::new(f);
    let mut workers = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let rx = file_rx.clone();
        let tx = result_tx.clone();
        let f = Arc::clone(&f);
        let cancellation = ctx.cancellation.clone();
        let errors = Arc::clone(&ctx.errors);
        let tracker = Arc::clone(&ctx.tracker);
        workers.push(thread::spawn(move || {
            for path in rx {
                if cancellation.is_canceled() {
                    errors.push(path.clone(), EngineError::Canceled);
                    tracker.tick(&path);
                    continue;
                }
                match f(&path) {
                    Ok(value) => {
                        tracker.tick(&path);
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        errors.push(path.clone(), e);
                        tracker.tick(&path);
                    }
                }
            }
        }));
    }
    drop(file_rx);
    drop(result_tx);

    let results: Vec<R> = result_rx.into_iter().collect();
    let _ = producer.join();
    for w in workers {
        let _ = w.join();
    }
    results
}

/// `map_files` with a per-file byte-size cap, enforced before `f` runs so
/// oversized files never get parsed.
pub fn map_files_with_size_limit<F, R>(
    ctx: &Context,
    files: Vec<PathBuf>,
    limit: u64,
    f: F,
) -> Vec<R>
where
    F: Fn(&Path) -> Result<R, EngineError> + Send + Sync + 'static,
    R: Send + 'static,
{
    let wrapped = move |path: &Path| -> Result<R, EngineError> {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if size > limit {
            return Err(EngineError::SizeLimitExceeded { size, limit });
        }
        f(path)
    };
    map_files(ctx, files, wrapped)
}

/// Abstracts where file bytes come from, so `map_source_files` can run over
/// an in-memory fixture set in tests without touching the filesystem.
pub trait ContentSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError>;
}

pub struct FsContentSource;

impl ContentSource for FsContentSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError> {
        Ok(std::fs::read(path)?)
    }
}

pub fn map_source_files<S, F, R>(ctx: &Context, files: Vec<PathBuf>, source: Arc<S>, f: F) -> Vec<R>
where
    S: ContentSource + 'static,
    F: Fn(&Path, Vec<u8>) -> Result<R, EngineError> + Send + Sync + 'static,
    R: Send + 'static,
{
    let wrapped = move |path: &Path| -> Result<R, EngineError> {
        let bytes = source.read(path)?;
        f(path, bytes)
    };
    map_files(ctx, files, wrapped)
}

/// Runs `f` over every file using a per-worker resource built by `init` and
/// torn down by `destroy` once that worker's share of the queue drains —
/// e.g. leasing one `Parser` per worker instead of per file.
pub fn for_each_file_with_resource<I, D, F, Res>(
    ctx: &Context,
    files: Vec<PathBuf>,
    init: I,
    destroy: D,
    f: F,
) where
    I: Fn() -> Res + Send + Sync + 'static,
    D: Fn(Res) + Send + Sync + 'static,
    F: Fn(&mut Res, &Path) -> Result<(), EngineError> + Send + Sync + 'static,
    Res: Send + 'static,
{
    ctx.tracker.add(files.len() as u64);
    let num_workers = ctx.workers.max(1);
    let (file_tx, file_rx) = bounded::<PathBuf>(num_workers * 4);

    let cancellation = ctx.cancellation.clone();
    let producer = thread::spawn(move || {
        for file in files {
            if cancellation.is_canceled() || file_tx.send(file).is_err() {
                break;
            }
        }
    });

    let init = Arc::new(init);
    let destroy = Arc::new(destroy);
    let f = Arc::new(f);
    let mut workers = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let rx = file_rx.clone();
        let init = Arc::clone(&init);
        let destroy = Arc::clone(&destroy);
        let f = Arc::clone(&f);
        let cancellation = ctx.cancellation.clone();
        let errors = Arc::clone(&ctx.errors);
        let tracker = Arc::clone(&ctx.tracker);
        workers.push(thread::spawn(move || {
            let mut resource = init();
            for path in rx {
                if cancellation.is_canceled() {
                    errors.push(path.clone(), EngineError::Canceled);
                    tracker.tick(&path);
                    continue;
                }
                if let Err(e) = f(&mut resource, &path) {
                    errors.push(path.clone(), e);
                }
                tracker.tick(&path);
            }
            destroy(resource);
        }));
    }
    drop(file_rx);
    let _ = producer.join();
    for w in workers {
        let _ = w.join();
    }
}
