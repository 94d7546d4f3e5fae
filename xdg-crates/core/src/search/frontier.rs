use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use super::SearchStrategy;
use crate::engine::Space;

/// The spaces that are waiting to be expanded.
#[derive(Debug)]
pub(crate) enum Frontier {
    Stack(Vec<Space>),
    Queue(VecDeque<Space>),
    Ranked {
        heap: BinaryHeap<RankedSpace>,
        next_sequence: u64,
    },
}

impl Frontier {
    pub(crate) fn new(strategy: SearchStrategy) -> Frontier {
        match strategy {
            SearchStrategy::DepthFirst => Frontier::Stack(Vec::new()),
            SearchStrategy::BreadthFirst => Frontier::Queue(VecDeque::new()),
            SearchStrategy::BestFirst => Frontier::Ranked {
                heap: BinaryHeap::new(),
                next_sequence: 0,
            },
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Frontier::Stack(stack) => stack.len(),
            Frontier::Queue(queue) => queue.len(),
            Frontier::Ranked { heap, .. } => heap.len(),
        }
    }

    pub(crate) fn push(&mut self, space: Space) {
        match self {
            Frontier::Stack(stack) => stack.push(space),
            Frontier::Queue(queue) => queue.push_back(space),
            Frontier::Ranked {
                heap,
                next_sequence,
            } => {
                heap.push(RankedSpace {
                    undetermined: space.num_undetermined_core(),
                    sequence: *next_sequence,
                    space,
                });
                *next_sequence += 1;
            }
        }
    }

    /// Push the two children of a distribution so that the positive child is expanded first among
    /// equals.
    pub(crate) fn push_children(&mut self, [positive, negative]: [Space; 2]) {
        if let Frontier::Stack(_) = self {
            self.push(negative);
            self.push(positive);
        } else {
            self.push(positive);
            self.push(negative);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Space> {
        match self {
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Ranked { heap, .. } => heap.pop().map(|ranked| ranked.space),
        }
    }
}

/// A space in the best-first frontier: fewer undetermined core variables first, then the order of
/// insertion.
#[derive(Debug)]
pub(crate) struct RankedSpace {
    undetermined: usize,
    sequence: u64,
    space: Space,
}

impl RankedSpace {
    fn key(&self) -> (Reverse<usize>, Reverse<u64>) {
        (Reverse(self.undetermined), Reverse(self.sequence))
    }
}

impl PartialEq for RankedSpace {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RankedSpace {}

impl PartialOrd for RankedSpace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedSpace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
