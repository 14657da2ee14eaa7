//! Interrupt-driven edge event channel.
//!
//! The GPIO ISR produces raw tick timestamps; the event monitor task
//! consumes them in FIFO order.
//!
//! ```text
//! ┌─────────────┐  push()   ┌──────────────┐  receive_timeout()  ┌──────────────┐
//! │ GPIO ISR    │─────────▶│  EdgeQueue   │───────────────────▶│ EventMonitor │
//! │ (producer)  │          │  (lock-free) │                    │  (consumer)  │
//! └─────────────┘          └──────────────┘                    └──────────────┘
//! ```
//!
//! Single producer, single consumer.  `push` is wait-free and
//! allocation-free: it stores into an atomic slot, publishes the new head
//! and wakes the consumer.  A full queue drops the new timestamp.

use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use core::task::Poll;
use core::time::Duration;

use embassy_sync::waitqueue::AtomicWaker;

use crate::config::EDGE_QUEUE_DEPTH;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// `head` is only written by the producer, `tail` only by the consumer.
// Both count monotonically (wrapping); the slot index is `count % N`,
// which stays continuous across the wrap because N is a power of two.

pub struct EdgeQueue<const N: usize> {
    slots: [AtomicU32; N],
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicU32,
    waker: AtomicWaker,
}

impl<const N: usize> EdgeQueue<N> {
    const POWER_OF_TWO: () = assert!(N.is_power_of_two(), "EdgeQueue depth must be a power of two");

    pub const fn new() -> Self {
        let () = Self::POWER_OF_TWO;
        Self {
            slots: [const { AtomicU32::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
            waker: AtomicWaker::new(),
        }
    }

    /// Enqueue a timestamp.  Safe to call from ISR context.
    /// Returns `false` if the queue is full (timestamp dropped).
    pub fn push(&self, ticks: u32) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.slots[head % N].store(ticks, Ordering::Relaxed);
        self.head.store(head.wrapping_add(1), Ordering::Release);
        self.waker.wake();
        true
    }

    /// Dequeue the oldest timestamp.  Consumer side only.
    pub fn pop(&self) -> Option<u32> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let ticks = self.slots[tail % N].load(Ordering::Relaxed);
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(ticks)
    }

    /// Wait for the next timestamp.
    pub async fn receive(&self) -> u32 {
        poll_fn(|cx| {
            if let Some(ticks) = self.pop() {
                return Poll::Ready(ticks);
            }
            self.waker.register(cx.waker());
            // Re-check: a push may have landed between pop and register.
            match self.pop() {
                Some(ticks) => Poll::Ready(ticks),
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Wait at most `timeout` for the next timestamp.
    pub async fn receive_timeout(&self, timeout: Duration) -> Option<u32> {
        futures_lite::future::or(async { Some(self.receive().await) }, async {
            async_io_mini::Timer::after(timeout).await;
            None
        })
        .await
    }

    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        tail == head
    }

    /// Number of pending timestamps.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Relaxed);
        head.wrapping_sub(tail)
    }

    /// Timestamps discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for EdgeQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire sensor falling edges, fed by the GPIO ISR.
pub static FIRE_EDGES: EdgeQueue<EDGE_QUEUE_DEPTH> = EdgeQueue::new();
