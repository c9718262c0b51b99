//=========================================================================
// Decode Worker
//
// Turns opaque external payloads (raw bytes, dropped files) into sliced
// tile sets off the UI thread.
//
// Architecture:
// ```text
//  UI Thread:                        Decode Thread:
//  ┌────────────────────────┐        ┌──────────────────────┐
//  │ GridController         │        │ decode loop          │
//  │  submit(payload) ──────┼──req──>│  read file / bytes   │
//  │                        │        │  image::load_...     │
//  │                        │        │  slice into TileSet  │
//  │  drain() <─────────────┼──res───┤  send DecodeResult   │
//  │   (bounded per frame)  │        └──────────────────────┘
//  └────────────────────────┘
// ```
//
// Notes:
// The worker builds fresh tile sets but never touches the live one. The
// UI thread drains results once per frame and swaps them in itself.
// Dropping the worker closes the request channel, which ends the loop.
// A decode still in progress is left to finish on its own thread; its
// result is discarded because nobody holds the result receiver.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError, TrySendError};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::TileError;
use crate::core::tiles::{SlicePolicy, TileSet};

//=== ExternalPayload =====================================================

/// Image data dropped from outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalPayload {
    /// Encoded image bytes (PNG, JPEG).
    Bytes(Vec<u8>),

    /// Path of a dropped file, read on the worker.
    File(PathBuf),
}

//=== DecodeRequest / DecodeResult ========================================

#[derive(Debug)]
pub(crate) struct DecodeRequest {
    pub generation: u64,
    pub payload: ExternalPayload,
}

/// Completion of one decode request.
#[derive(Debug)]
pub struct DecodeResult {
    /// Tag assigned at submission; later submissions have larger tags.
    pub generation: u64,
    pub outcome: Result<TileSet, TileError>,
}

//=== SliceSpec ===========================================================

/// How the worker slices decoded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub dimension: usize,
    pub policy: SlicePolicy,
}

//=== DecodeWorker ========================================================

/// Background decoder with a bounded request queue.
///
/// Dropping the worker never waits for an in-flight decode.
pub struct DecodeWorker {
    requests: Option<Sender<DecodeRequest>>,
    results: Receiver<DecodeResult>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl DecodeWorker {
    /// Maximum results handed to the UI thread per `drain()`.
    const MAX_RESULTS_PER_DRAIN: usize = 8;

    //--- Construction -----------------------------------------------------

    /// Spawns the decode thread, slicing every decoded image per `spec`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn spawn(capacity: usize, spec: SliceSpec) -> Self {
        assert!(capacity > 0, "Decode queue capacity must be positive");

        let (request_tx, request_rx) = bounded::<DecodeRequest>(capacity);
        let (result_tx, result_rx) = unbounded::<DecodeResult>();

        let handle = thread::Builder::new()
            .name("tile-decode".into())
            .spawn(move || Self::decode_loop(request_rx, result_tx, spec));

        let handle = match handle {
            Ok(handle) => {
                info!(target: "decode", "Decode worker spawned (queue: {})", capacity);
                Some(handle)
            }
            Err(e) => {
                error!(target: "decode", "Decode worker failed to start: {}", e);
                None
            }
        };

        Self {
            requests: handle.as_ref().map(|_| request_tx),
            results: result_rx,
            handle,
            next_generation: 1,
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Queues `payload` for decoding and returns its generation tag.
    ///
    /// Returns `None` when the queue is full or the worker is gone; the
    /// payload is dropped in that case.
    pub fn submit(&mut self, payload: ExternalPayload) -> Option<u64> {
        let sender = self.requests.as_ref()?;
        let generation = self.next_generation;

        match sender.try_send(DecodeRequest { generation, payload }) {
            Ok(()) => {
                self.next_generation += 1;
                debug!(target: "decode", "Queued decode #{}", generation);
                Some(generation)
            }
            Err(TrySendError::Full(_)) => {
                warn!(target: "decode", "Decode queue full, payload dropped");
                None
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "decode", "Decode worker gone, payload dropped");
                None
            }
        }
    }

    //--- Results ----------------------------------------------------------

    /// Collects finished results without blocking (bounded per call).
    pub fn drain(&self) -> Vec<DecodeResult> {
        let mut finished = Vec::new();

        while finished.len() < Self::MAX_RESULTS_PER_DRAIN {
            match self.results.try_recv() {
                Ok(result) => finished.push(result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        finished
    }

    /// Blocks up to `timeout` for the next result.
    pub fn wait(&self, timeout: Duration) -> Option<DecodeResult> {
        self.results.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    //--- Worker Thread ----------------------------------------------------

    fn decode_loop(
        requests: Receiver<DecodeRequest>,
        results: Sender<DecodeResult>,
        spec: SliceSpec,
    ) {
        for request in requests.iter() {
            let outcome = decode_payload(request.payload, spec);

            if let Err(e) = &outcome {
                debug!(target: "decode", "Decode #{} failed: {}", request.generation, e);
            }

            let result = DecodeResult {
                generation: request.generation,
                outcome,
            };

            if results.send(result).is_err() {
                break;
            }
        }

        debug!(target: "decode", "Decode worker exiting");
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the loop after the current decode.
        self.requests.take();

        let Some(handle) = self.handle.take() else {
            return;
        };

        if handle.is_finished() {
            if handle.join().is_err() {
                error!(target: "decode", "Decode worker panicked");
            }
        } else {
            debug!(target: "decode", "Decode in flight, detaching worker");
        }
    }
}

//--- Internal Helpers ----------------------------------------------------

fn decode_payload(payload: ExternalPayload, spec: SliceSpec) -> Result<TileSet, TileError> {
    let bytes = match payload {
        ExternalPayload::Bytes(bytes) => bytes,
        ExternalPayload::File(path) => std::fs::read(&path)?,
    };

    TileSet::from_bytes(&bytes, spec.dimension, spec.policy)
}

//=========================================================================
// Unit Tests
//=========================================================================
