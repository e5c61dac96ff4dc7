// Single-slot executor: at most one conversion runs at a time, and a new one
// can only be submitted after the previous result has been collected.
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use thiserror::Error;
use tracing::warn;

use crate::convert::{ConversionRequest, ConvertOpts, convert};
use crate::error::ConvertError;

pub const SUCCESS_MSG: &str = "Conversion successful!";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a conversion is already running")]
pub struct WorkerBusy;

#[derive(Debug, Default)]
pub struct ConversionWorker {
    opts: ConvertOpts,
    pending: Option<Receiver<Result<(), ConvertError>>>,
}

impl ConversionWorker {
    pub fn new(opts: ConvertOpts) -> Self {
        Self {
            opts,
            pending: None,
        }
    }

    /// True from a successful submit until its result is taken by
    /// [`poll`](Self::poll) or [`wait`](Self::wait).
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit(&mut self, request: ConversionRequest) -> Result<(), WorkerBusy> {
        self.submit_with(request, || {})
    }

    /// Like [`submit`](Self::submit); `notify` runs on the worker thread after
    /// the result has been sent.
    pub fn submit_with<F>(&mut self, request: ConversionRequest, notify: F) -> Result<(), WorkerBusy>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_busy() {
            warn!(src = %request.source().display(), "conversion rejected, worker busy");
            return Err(WorkerBusy);
        }
        let (tx, rx) = mpsc::channel();
        let opts = self.opts;
        thread::spawn(move || {
            let result = convert(&request, &opts);
            let _ = tx.send(result);
            notify();
        });
        self.pending = Some(rx);
        Ok(())
    }

    /// Non-blocking; yields the finished result exactly once.
    pub fn poll(&mut self) -> Option<Result<(), ConvertError>> {
        let rx = self.pending.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ConvertError::WorkerLost),
        };
        self.pending = None;
        Some(outcome)
    }

    /// Blocks until the running conversion finishes. `None` when idle.
    pub fn wait(&mut self) -> Option<Result<(), ConvertError>> {
        let rx = self.pending.take()?;
        Some(rx.recv().unwrap_or(Err(ConvertError::WorkerLost)))
    }
}

/// Status line shown to the user for a finished conversion.
pub fn status_line(result: &Result<(), ConvertError>) -> String {
    match result {
        Ok(()) => SUCCESS_MSG.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn second_submit_is_rejected_until_result_is_taken() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.json");
        std::fs::write(&src, "{\"a\": 1}").unwrap();
        let req = ConversionRequest::new(&src, dir.path().join("out.yaml")).unwrap();

        let mut worker = ConversionWorker::default();
        worker.submit(req.clone()).unwrap();
        assert!(worker.is_busy());
        assert_eq!(worker.submit(req.clone()), Err(WorkerBusy));

        assert!(worker.wait().unwrap().is_ok());
        assert!(!worker.is_busy());
        worker.submit(req).unwrap();
        assert!(worker.wait().unwrap().is_ok());
    }

    #[test]
    fn poll_reports_result_once() {
        let dir = tempfile::tempdir().unwrap();
        let req = ConversionRequest::new(dir.path().join("missing.json"), dir.path().join("o.xml"))
            .unwrap();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        let mut worker = ConversionWorker::default();
        worker
            .submit_with(req, move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        let result = loop {
            if let Some(r) = worker.poll() {
                break r;
            }
            std::thread::yield_now();
        };
        assert!(matches!(result, Err(ConvertError::Read { .. })));
        while !done.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        assert!(worker.poll().is_none());
        assert!(worker.wait().is_none());
    }

    #[test]
    fn status_lines() {
        assert_eq!(status_line(&Ok(())), "Conversion successful!");
        let err = Err(ConvertError::WorkerLost);
        assert_eq!(
            status_line(&err),
            "Error: conversion worker stopped without reporting a result"
        );
    }
}
