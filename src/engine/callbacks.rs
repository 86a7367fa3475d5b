use crate::engine::Engine;

/// Per-tick user callback. Runs after compositing, in registration order.
pub type FrameCallback = Box<dyn FnMut(&mut Engine) -> anyhow::Result<()>>;

/// Handle returned by [`Engine::on_frame`], used to cancel the callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Ordered frame callbacks.
///
/// While a tick is iterating the callbacks they are moved out of the registry; registrations,
/// cancellations and clears made meanwhile are recorded and applied when the batch is returned,
/// so they only affect the next tick. Batches nest when a callback runs a tick itself.
#[derive(Default)]
pub(crate) struct FrameCallbacks {
    entries: Vec<(FrameHandle, FrameCallback)>,
    next: u64,
    // One per batch currently out, innermost last.
    in_flight: Vec<InFlight>,
}

#[derive(Default)]
struct InFlight {
    handles: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    cleared: bool,
}

impl InFlight {
    fn is_live(&self, handle: FrameHandle) -> bool {
        !self.cleared && self.handles.contains(&handle) && !self.cancelled.contains(&handle)
    }
}

impl FrameCallbacks {
    pub(crate) fn push(&mut self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.entries.push((handle, callback));
        handle
    }

    /// Remove `handle`; returns whether it was registered.
    pub(crate) fn cancel(&mut self, handle: FrameHandle) -> bool {
        if let Some(i) = self.entries.iter().position(|(h, _)| *h == handle) {
            self.entries.remove(i);
            return true;
        }
        match self.in_flight.iter_mut().find(|b| b.is_live(handle)) {
            Some(batch) => {
                batch.cancelled.push(handle);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        for batch in &mut self.in_flight {
            batch.cleared = true;
        }
    }

    pub(crate) fn len(&self) -> usize {
        let live: usize = self
            .in_flight
            .iter()
            .map(|b| b.handles.iter().filter(|h| b.is_live(**h)).count())
            .sum();
        self.entries.len() + live
    }

    pub(crate) fn take(&mut self) -> Vec<(FrameHandle, FrameCallback)> {
        let batch = std::mem::take(&mut self.entries);
        self.in_flight.push(InFlight {
            handles: batch.iter().map(|(h, _)| *h).collect(),
            ..InFlight::default()
        });
        batch
    }

    /// Return the most recent batch from [`FrameCallbacks::take`], applying changes made while it
    /// was out.
    pub(crate) fn restore(&mut self, mut batch: Vec<(FrameHandle, FrameCallback)>) {
        let state = self.in_flight.pop().unwrap_or_default();
        if state.cleared {
            batch.clear();
        } else {
            batch.retain(|(h, _)| !state.cancelled.contains(h));
        }
        batch.append(&mut self.entries);
        self.entries = batch;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/callbacks.rs"]
mod tests;
