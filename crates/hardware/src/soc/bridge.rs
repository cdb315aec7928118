//! Transport-to-bus bridge with explicit clock-domain crossing.
//!
//! Translates the external transport endpoint's request stream into
//! transactions on the internal register bus. It provides:
//! 1. **Identity translation:** The bus sees the same address the endpoint
//!    sent, gated by a route predicate (always-true in the base
//!    composition).
//! 2. **Ordering:** Requests complete in the order received; nothing
//!    reorders across the bridge.
//! 3. **Crossing:** The endpoint and the bus run in unrelated clock domains,
//!    so requests and completions pass through bounded handshake FIFOs —
//!    never a bare shared register. A full FIFO stalls its producer;
//!    nothing is ever dropped.
//!
//! Writes are posted (no completion); reads always produce a completion,
//! including reads the route predicate rejects, which complete with zero
//! data and are counted.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::soc::interconnect::Bus;

/// Direction of a transport request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Register read; produces a completion.
    Read,
    /// Posted register write; no completion.
    Write,
}

/// One request from the transport endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// Endpoint-assigned tag echoed in the completion.
    pub tag: u16,
    /// Target address (identity-translated onto the bus).
    pub addr: u64,
    /// Read or write.
    pub kind: AccessKind,
    /// Write data (ignored for reads).
    pub data: u32,
    /// Byte-enable mask, bit `i` enabling byte lane `i`.
    pub byte_enable: u8,
}

/// One completion returned to the transport endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportCompletion {
    /// Tag of the originating request.
    pub tag: u16,
    /// Address the request targeted.
    pub addr: u64,
    /// Read data.
    pub data: u32,
}

/// Bounded handshake queue used to cross between clock domains.
///
/// Producers push on their own domain's edges and observe `is_full` as the
/// not-ready backpressure signal; consumers pop on theirs. Order is
/// preserved and nothing is lost: a push against a full queue hands the item
/// back.
#[derive(Clone, Debug)]
pub struct CrossingFifo<T> {
    queue: VecDeque<T>,
    depth: usize,
}

impl<T> CrossingFifo<T> {
    /// Creates a queue holding at most `depth` items.
    pub fn new(depth: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Pushes an item, or returns it if the queue is full.
    ///
    /// # Errors
    ///
    /// The rejected item, so the producer can stall and retry.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.queue.len() >= self.depth {
            return Err(item);
        }
        self.queue.push_back(item);
        Ok(())
    }

    /// Pops the oldest item, if any.
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Returns the oldest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.queue.front()
    }

    /// Returns whether a push would be refused.
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.depth
    }

    /// Returns whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the current occupancy.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Counters the bridge maintains across its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeCounters {
    /// Requests accepted into the crossing queue.
    pub accepted: u64,
    /// Read transactions issued on the bus.
    pub reads: u64,
    /// Write transactions issued on the bus.
    pub writes: u64,
    /// Requests the route predicate rejected.
    pub rejected: u64,
    /// Completions delivered back to the endpoint.
    pub completions: u64,
}

/// Bridge between the transport endpoint and the register bus.
pub struct TransportBridge {
    /// Address-decode predicate; a request proceeds only if this accepts its
    /// address. Total over all addresses by construction.
    route: Box<dyn Fn(u64) -> bool + Send + Sync>,
    /// Endpoint-side staging of the incoming request stream.
    endpoint_queue: VecDeque<TransportRequest>,
    /// Transport→sys crossing for requests.
    requests: CrossingFifo<TransportRequest>,
    /// Sys→transport crossing for completions.
    completions: CrossingFifo<TransportCompletion>,
    /// Completions already crossed back, awaiting endpoint pickup.
    delivered: VecDeque<TransportCompletion>,
    counters: BridgeCounters,
}

impl fmt::Debug for TransportBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportBridge")
            .field("pending", &self.endpoint_queue.len())
            .field("requests", &self.requests.len())
            .field("completions", &self.completions.len())
            .field("counters", &self.counters)
            .finish()
    }
}

impl TransportBridge {
    /// Creates the bridge with the given crossing depth and route predicate.
    ///
    /// # Arguments
    ///
    /// * `fifo_depth` - Depth of each crossing queue.
    /// * `route` - Address-decode predicate for the single active route.
    pub fn new(fifo_depth: usize, route: Box<dyn Fn(u64) -> bool + Send + Sync>) -> Self {
        Self {
            route,
            endpoint_queue: VecDeque::new(),
            requests: CrossingFifo::new(fifo_depth),
            completions: CrossingFifo::new(fifo_depth),
            delivered: VecDeque::new(),
            counters: BridgeCounters::default(),
        }
    }

    /// Queues one request from the transport endpoint.
    ///
    /// The request enters the crossing queue on a later transport-domain
    /// edge; arrival order here is delivery order on the bus.
    pub fn push_request(&mut self, req: TransportRequest) {
        self.endpoint_queue.push_back(req);
    }

    /// Drains completions delivered to the endpoint so far, in order.
    pub fn take_completions(&mut self) -> Vec<TransportCompletion> {
        self.delivered.drain(..).collect()
    }

    /// Returns the lifetime counters.
    pub fn counters(&self) -> BridgeCounters {
        self.counters
    }

    /// Returns whether any request is still staged or in flight.
    pub fn is_idle(&self) -> bool {
        self.endpoint_queue.is_empty() && self.requests.is_empty() && self.completions.is_empty()
    }

    /// Processes one transport-domain clock edge.
    ///
    /// Moves at most one staged request into the crossing queue (the
    /// endpoint stalls while the queue is full) and collects at most one
    /// completion out of it.
    pub fn tick_transport(&mut self) {
        if let Some(req) = self.endpoint_queue.pop_front() {
            match self.requests.push(req) {
                Ok(()) => {
                    self.counters.accepted += 1;
                    trace!(tag = req.tag, addr = format_args!("{:#010x}", req.addr), "request crossed");
                }
                Err(req) => {
                    // Backpressure: hand the request back, keep order.
                    self.endpoint_queue.push_front(req);
                }
            }
        }
        if let Some(cpl) = self.completions.pop() {
            self.counters.completions += 1;
            self.delivered.push_back(cpl);
        }
    }

    /// Processes one sys-domain clock edge.
    ///
    /// Executes at most one crossed request as a bus transaction. A read is
    /// only started when the completion queue has room, so its result can
    /// never be dropped.
    pub fn tick_sys(&mut self, bus: &mut Bus) {
        let needs_completion = matches!(
            self.requests.peek().map(|r| r.kind),
            Some(AccessKind::Read)
        );
        if needs_completion && self.completions.is_full() {
            return;
        }
        let Some(req) = self.requests.pop() else {
            return;
        };

        if !(self.route)(req.addr) {
            self.counters.rejected += 1;
            warn!(
                addr = format_args!("{:#010x}", req.addr),
                "request outside the active route"
            );
            if req.kind == AccessKind::Read {
                // A rejected read still completes, with zero data.
                let _ = self.completions.push(TransportCompletion {
                    tag: req.tag,
                    addr: req.addr,
                    data: 0,
                });
            }
            return;
        }

        match req.kind {
            AccessKind::Read => {
                let data = bus.read_u32(req.addr);
                self.counters.reads += 1;
                debug!(
                    tag = req.tag,
                    addr = format_args!("{:#010x}", req.addr),
                    data = format_args!("{data:#010x}"),
                    "bus read"
                );
                let _ = self.completions.push(TransportCompletion {
                    tag: req.tag,
                    addr: req.addr,
                    data,
                });
            }
            AccessKind::Write => {
                bus.write_u32_masked(req.addr, req.data, req.byte_enable);
                self.counters.writes += 1;
                debug!(
                    tag = req.tag,
                    addr = format_args!("{:#010x}", req.addr),
                    data = format_args!("{:#010x}", req.data),
                    "bus write"
                );
            }
        }
    }
}
