//! Queued background writer.
//!
//! Callers enqueue whole-file writes and removals and return immediately; one
//! worker thread applies them in submission order. A failed job is logged and
//! dropped, it never reaches the caller.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, error};

#[derive(Debug)]
enum Job {
    Write { path: Utf8PathBuf, bytes: Vec<u8> },
    Remove { path: Utf8PathBuf },
}

impl Job {
    fn path(&self) -> &Utf8Path {
        match self {
            Job::Write { path, .. } | Job::Remove { path } => path,
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn add(&self) {
        *self.count.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.drained.wait(&mut count);
        }
    }
}

pub struct PersistQueue {
    sender: Option<mpsc::UnboundedSender<Job>>,
    pending: Arc<Pending>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PersistQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistQueue")
            .field("pending", &*self.pending.count.lock())
            .finish_non_exhaustive()
    }
}

impl PersistQueue {
    pub fn start() -> anyhow::Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let pending = Arc::new(Pending::default());
        let worker_pending = Arc::clone(&pending);
        let worker = std::thread::Builder::new()
            .name("itemguard-persist".to_string())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    apply(job);
                    worker_pending.done();
                }
            })
            .context("spawn persistence worker")?;
        Ok(Self {
            sender: Some(sender),
            pending,
            worker: Some(worker),
        })
    }

    pub fn write(&self, path: impl Into<Utf8PathBuf>, bytes: Vec<u8>) {
        self.enqueue(Job::Write {
            path: path.into(),
            bytes,
        });
    }

    /// Serialize now, write later. Only serialization can fail here.
    pub fn write_json<T: Serialize>(
        &self,
        path: impl Into<Utf8PathBuf>,
        value: &T,
    ) -> anyhow::Result<()> {
        let mut bytes = serde_json::to_vec_pretty(value).context("serialize json")?;
        bytes.push(b'\n');
        self.write(path, bytes);
        Ok(())
    }

    pub fn remove(&self, path: impl Into<Utf8PathBuf>) {
        self.enqueue(Job::Remove { path: path.into() });
    }

    /// Block until every job queued so far has been applied.
    pub fn flush(&self) {
        self.pending.wait();
    }

    fn enqueue(&self, job: Job) {
        let Some(sender) = &self.sender else { return };
        self.pending.add();
        if let Err(err) = sender.send(job) {
            self.pending.done();
            error!(path = %err.0.path(), "persistence worker is gone; dropping job");
        }
    }
}

impl Drop for PersistQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is left and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("persistence worker panicked");
        }
    }
}

fn apply(job: Job) {
    match job {
        Job::Write { path, bytes } => match write_replacing(&path, &bytes) {
            Ok(()) => debug!(path = %path, bytes = bytes.len(), "persisted"),
            Err(err) => error!(path = %path, error = %err, "failed to persist file"),
        },
        Job::Remove { path } => match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path, "removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => error!(path = %path, error = %err, "failed to remove file"),
        },
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_replacing(path: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = Utf8PathBuf::from(format!("{path}.tmp"));
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}
