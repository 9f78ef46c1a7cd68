//! Worker thread handle and correlation machinery

use super::{SceneReply, SceneRequest};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::fmt;
use std::thread;
use thiserror::Error;

/// Monotonically increasing correlation id attached to every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A correlated message: the request id plus its payload
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    /// Correlation id of the originating request
    pub request: RequestId,
    /// Message body
    pub payload: T,
}

/// Worker-channel errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The worker thread is gone and its channel is closed
    #[error("worker `{0}` is no longer running")]
    Unavailable(&'static str),

    /// The worker thread could not be created
    #[error("failed to spawn worker `{name}`: {source}")]
    SpawnFailed {
        /// Worker name
        name: &'static str,
        /// Underlying OS error
        source: std::io::Error,
    },
}

/// Handle to an isolated worker thread
///
/// The thread owns a pure kernel function; requests go in over one channel
/// and replies come back over another, each stamped with the request's
/// correlation id. Dropping the handle closes the request channel, which
/// ends the worker loop, and joins the thread.
pub struct WorkerHandle {
    name: &'static str,
    requests: Option<Sender<Envelope<SceneRequest>>>,
    replies: Receiver<Envelope<SceneReply>>,
    next_request: u64,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn a worker thread running the given kernel
    ///
    /// The kernel may decline a request by returning `None`; nothing is
    /// sent back in that case.
    pub fn spawn<F>(name: &'static str, kernel: F) -> Result<Self, WorkerError>
    where
        F: Fn(SceneRequest) -> Option<SceneReply> + Send + 'static,
    {
        let (request_tx, request_rx) = unbounded::<Envelope<SceneRequest>>();
        let (reply_tx, reply_rx) = unbounded::<Envelope<SceneReply>>();

        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(envelope) = request_rx.recv() {
                    if let Some(payload) = kernel(envelope.payload) {
                        let reply = Envelope { request: envelope.request, payload };
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                }
            })
            .map_err(|source| WorkerError::SpawnFailed { name, source })?;

        log::debug!("spawned worker `{name}`");
        Ok(Self {
            name,
            requests: Some(request_tx),
            replies: reply_rx,
            next_request: 0,
            thread: Some(thread),
        })
    }

    /// Send a request, fire-and-forget, returning its correlation id
    pub fn send(&mut self, payload: SceneRequest) -> Result<RequestId, WorkerError> {
        let request = RequestId(self.next_request);
        self.next_request += 1;

        let sender = self
            .requests
            .as_ref()
            .ok_or(WorkerError::Unavailable(self.name))?;
        sender
            .send(Envelope { request, payload })
            .map_err(|_| WorkerError::Unavailable(self.name))?;
        Ok(request)
    }

    /// Collect every reply that has arrived, without blocking
    pub fn drain_replies(&mut self) -> Vec<Envelope<SceneReply>> {
        self.replies.try_iter().collect()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("worker `{}` panicked", self.name);
            }
        }
    }
}
