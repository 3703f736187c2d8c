//! Status notification queue.
//!
//! Producers (USB, BLE and battery handlers, possibly running in interrupt
//! context) push [`StatusEvent`]s; the indicator worker drains them. Built on
//! `critical-section` and `heapless::Deque`, so it is usable from any context
//! without an async runtime.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::adapter::StatusEvent;

/// Error returned when trying to send to a full queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, interrupt-safe queue.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a producer handle for this queue.
    ///
    /// Any number of producers may coexist, including ones called from
    /// interrupt handlers.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Get the consumer handle for the indicator worker.
    ///
    /// Only the worker should drain the queue; extra receivers compete for
    /// notifications.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Try to enqueue a value.
    ///
    /// Returns `Err(TrySendError(value))` if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Enqueue `value`, evicting the oldest entry if the queue is full.
    ///
    /// Status notifications describe a level, not an edge: when the worker
    /// falls behind, the newest state is the one worth keeping. Returns the
    /// evicted entry, or `value` itself if the queue has no capacity at all.
    pub fn send_latest(&self, value: T) -> Option<T> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let evicted = if queue.is_full() {
                queue.pop_front()
            } else {
                None
            };
            match queue.push_back(value) {
                Ok(()) => evicted,
                Err(value) => Some(value),
            }
        })
    }

    /// Try to take the oldest value.
    ///
    /// Returns `Err(TryReceiveError)` if the queue is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
///
/// Just a shared reference, cheap to copy into every producer.
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Try to enqueue a value.
    ///
    /// Returns `Err(TrySendError(value))` if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }

    /// Enqueue a value, evicting the oldest one if the queue is full.
    ///
    /// See [`Channel::send_latest`].
    pub fn send_latest(&self, value: T) -> Option<T> {
        self.channel.send_latest(value)
    }
}

/// A receiver handle for a [`Channel`].
///
/// Just a shared reference, owned by the indicator worker.
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Try to take the oldest value.
    ///
    /// Returns `Err(TryReceiveError)` if the queue is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    /// Check if no notification is waiting.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

/// Type alias for the status notification queue
pub type StatusChannel<const SIZE: usize> = Channel<StatusEvent, SIZE>;

/// Type alias for a status producer handle
pub type StatusSender<'a, const SIZE: usize> = Sender<'a, StatusEvent, SIZE>;

/// Type alias for the worker's status receiver
pub type StatusReceiver<'a, const SIZE: usize> = Receiver<'a, StatusEvent, SIZE>;
