use std::collections::VecDeque;

use super::PropagatorId;
use crate::containers::KeyedVec;

/// The awake propagators of a space, drained in passes.
///
/// Within a pass propagators run in the order they were woken. Propagators woken during a pass are
/// collected for the next pass, so no re-awakening takes effect before the current pass completes.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    current: VecDeque<PropagatorId>,
    next: VecDeque<PropagatorId>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_passes: u64,
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.current.is_empty() && self.next.is_empty()
    }

    pub(crate) fn enqueue(&mut self, propagator: PropagatorId) {
        self.is_enqueued.accomodate(propagator, false);
        if !self.is_enqueued[propagator] {
            self.is_enqueued[propagator] = true;
            self.next.push_back(propagator);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        if self.current.is_empty() {
            if self.next.is_empty() {
                return None;
            }
            std::mem::swap(&mut self.current, &mut self.next);
            for &propagator in &self.current {
                self.is_enqueued[propagator] = false;
            }
            self.num_passes += 1;
        }
        self.current.pop_front()
    }

    pub(crate) fn clear(&mut self) {
        for propagator in self.current.drain(..).chain(self.next.drain(..)) {
            self.is_enqueued[propagator] = false;
        }
    }

    pub(crate) fn num_passes(&self) -> u64 {
        self.num_passes
    }
}

#[cfg(test)]
mod tests {
    use super::PropagatorQueue;
    use crate::engine::propagation::PropagatorId;

    #[test]
    fn wakeups_during_a_pass_run_in_the_next_pass() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue(PropagatorId(0));
        queue.enqueue(PropagatorId(1));
        queue.enqueue(PropagatorId(0));

        assert_eq!(queue.pop(), Some(PropagatorId(0)));
        queue.enqueue(PropagatorId(0));
        queue.enqueue(PropagatorId(2));
        assert_eq!(queue.pop(), Some(PropagatorId(1)));
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
        assert_eq!(queue.pop(), Some(PropagatorId(2)));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.num_passes(), 2);
    }
}
