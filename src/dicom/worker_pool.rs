// SPDX-License-Identifier: MPL-2.0
//! Bounded pool of decode workers.
//!
//! Decoding a DICOM file is CPU bound and may block for a while on large or
//! compressed images, so every decode runs on tokio's blocking thread pool. A
//! semaphore sized to `max_workers` limits how many decodes run at once; extra
//! requests wait for a free worker. Workers are counted as started the first
//! time the load needs them unless the pool was configured to start them all up
//! front.
//!
//! After [`DecodeWorkerPool::terminate`], waiting and future loads fail with
//! [`Error::WorkerPool`]. A decode already running on a blocking thread is
//! allowed to finish but its result is discarded.

use super::file_manager::ImageId;
use super::image::{self, DicomImage};
use crate::error::{Error, Result};
use dicom::transfer_syntax::TransferSyntaxRegistry;
use log::debug;
use std::future::Future;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;

const TERMINATED: &str = "decode worker pool has been terminated";

/// Number of hardware threads, or 1 when it cannot be determined.
#[must_use]
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on concurrent decodes. Zero is treated as one.
    pub max_workers: usize,
    /// Start workers lazily as loads arrive instead of during initialize.
    pub start_workers_on_demand: bool,
    /// Enumerate the transfer syntax registry during initialize.
    pub initialize_codecs_on_startup: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            start_workers_on_demand: true,
            initialize_codecs_on_startup: false,
        }
    }
}

/// Snapshot of the pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub max_workers: usize,
    pub started_workers: usize,
    pub in_flight: usize,
    pub codecs_initialized: bool,
    pub terminated: bool,
}

#[derive(Debug)]
struct Inner {
    max_workers: usize,
    permits: Arc<Semaphore>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    codecs: OnceLock<usize>,
    terminated: AtomicBool,
}

impl Inner {
    fn ensure_codecs(&self) -> usize {
        *self.codecs.get_or_init(|| {
            let count = TransferSyntaxRegistry.iter().count();
            debug!("Registered {} transfer syntaxes for decoding", count);
            count
        })
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

/// Handle to the decode worker pool. Clones share the same workers.
#[derive(Debug, Clone)]
pub struct DecodeWorkerPool {
    inner: Arc<Inner>,
}

impl DecodeWorkerPool {
    /// Creates the pool and, depending on `config`, starts workers and codecs.
    #[must_use]
    pub fn initialize(config: &PoolConfig) -> Self {
        let max_workers = config.max_workers.max(1);
        let started = if config.start_workers_on_demand {
            0
        } else {
            max_workers
        };
        let pool = Self {
            inner: Arc::new(Inner {
                max_workers,
                permits: Arc::new(Semaphore::new(max_workers)),
                started: AtomicUsize::new(started),
                in_flight: AtomicUsize::new(0),
                codecs: OnceLock::new(),
                terminated: AtomicBool::new(false),
            }),
        };
        if config.initialize_codecs_on_startup {
            pool.inner.ensure_codecs();
        }
        debug!(
            "Decode worker pool initialized: max_workers={}, started={}",
            max_workers, started
        );
        pool
    }

    /// Decodes the file registered as `image_id`.
    ///
    /// The returned future owns everything it needs, so it can be handed to
    /// the iced runtime directly.
    pub fn load(
        &self,
        image_id: ImageId,
        path: PathBuf,
    ) -> impl Future<Output = Result<DicomImage>> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        async move {
            if inner.is_terminated() {
                return Err(Error::WorkerPool(TERMINATED.to_string()));
            }
            let permit = Arc::clone(&inner.permits)
                .acquire_owned()
                .await
                .map_err(|_| Error::WorkerPool(TERMINATED.to_string()))?;
            inner.ensure_codecs();

            let in_flight = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            inner.started.fetch_max(in_flight, Ordering::SeqCst);
            debug!("Decoding {} from {}", image_id, path.display());

            let joined = tokio::task::spawn_blocking(move || image::decode_file(&path)).await;
            // Release the worker only after the count drops, so the next
            // waiting load never observes more than max_workers in flight.
            inner.in_flight.fetch_sub(1, Ordering::SeqCst);
            drop(permit);

            if inner.is_terminated() {
                return Err(Error::WorkerPool(TERMINATED.to_string()));
            }
            joined?
        }
    }

    /// Stops the pool. Safe to call more than once.
    pub fn terminate(&self) {
        if !self.inner.terminated.swap(true, Ordering::SeqCst) {
            self.inner.permits.close();
            debug!("Decode worker pool terminated");
        }
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            max_workers: self.inner.max_workers,
            started_workers: self.inner.started.load(Ordering::SeqCst),
            in_flight: self.inner.in_flight.load(Ordering::SeqCst),
            codecs_initialized: self.inner.codecs.get().is_some(),
            terminated: self.inner.is_terminated(),
        }
    }
}
