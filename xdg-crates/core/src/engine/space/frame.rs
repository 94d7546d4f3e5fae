use std::rc::Rc;

use crate::containers::HashMap;
use crate::containers::IntSet;
use crate::engine::variables::IntVar;
use crate::engine::variables::SetBounds;
use crate::engine::variables::SetVar;

/// Frame chains longer than this are collapsed when a space is frozen.
const MAX_CHAIN_LENGTH: usize = 8;

/// The bounds a space changed with respect to its parent.
///
/// A frame is mutable while it belongs to a live space and becomes shared (behind an [`Rc`]) as
/// soon as the space is distributed. Lookups that miss fall through to the parent frame and
/// finally to the initial bounds stored in the model.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    pub(crate) ints: HashMap<IntVar, IntSet>,
    pub(crate) sets: HashMap<SetVar, SetBounds>,
    pub(crate) parent: Option<Rc<Frame>>,
    /// The number of frames in the chain, this one included.
    pub(crate) chain_length: usize,
}

impl Frame {
    pub(crate) fn child_of(parent: &Rc<Frame>) -> Frame {
        Frame {
            ints: HashMap::default(),
            sets: HashMap::default(),
            parent: Some(Rc::clone(parent)),
            chain_length: parent.chain_length + 1,
        }
    }

    pub(crate) fn int_domain(&self, var: IntVar) -> Option<&IntSet> {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some(domain) = current.ints.get(&var) {
                return Some(domain);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    pub(crate) fn set_bounds(&self, var: SetVar) -> Option<&SetBounds> {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some(bounds) = current.sets.get(&var) {
                return Some(bounds);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    /// Share this frame so children can be stacked on top of it.
    pub(crate) fn freeze(self) -> Rc<Frame> {
        if self.chain_length > MAX_CHAIN_LENGTH {
            Rc::new(self.flatten())
        } else {
            Rc::new(self)
        }
    }

    /// Merge the whole chain into a single frame without a parent.
    fn flatten(self) -> Frame {
        let mut ancestors = Vec::new();
        let mut frame = self.parent.as_deref();
        while let Some(current) = frame {
            ancestors.push(current);
            frame = current.parent.as_deref();
        }

        let mut flat = Frame {
            chain_length: 1,
            ..Frame::default()
        };
        for ancestor in ancestors.into_iter().rev() {
            flat.ints
                .extend(ancestor.ints.iter().map(|(&var, domain)| (var, domain.clone())));
            flat.sets
                .extend(ancestor.sets.iter().map(|(&var, bounds)| (var, bounds.clone())));
        }
        flat.ints.extend(self.ints);
        flat.sets.extend(self.sets);
        flat
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Frame;
    use crate::containers::IntSet;
    use crate::containers::StorageKey;
    use crate::engine::variables::IntVar;

    #[test]
    fn lookups_fall_through_to_ancestors() {
        let x = IntVar::create_from_index(0);
        let y = IntVar::create_from_index(1);

        let mut root = Frame {
            chain_length: 1,
            ..Frame::default()
        };
        let _ = root.ints.insert(x, IntSet::from([1, 2]));
        let _ = root.ints.insert(y, IntSet::from([3, 4]));
        let root = root.freeze();

        let mut child = Frame::child_of(&root);
        let _ = child.ints.insert(x, IntSet::singleton(1));

        assert_eq!(child.int_domain(x), Some(&IntSet::singleton(1)));
        assert_eq!(child.int_domain(y), Some(&IntSet::from([3, 4])));
        assert_eq!(root.int_domain(x), Some(&IntSet::from([1, 2])));
    }

    #[test]
    fn long_chains_are_flattened_keeping_the_newest_bounds() {
        let x = IntVar::create_from_index(0);
        let mut frame = Rc::new(Frame {
            chain_length: 1,
            ..Frame::default()
        });
        for value in 0..12 {
            let mut child = Frame::child_of(&frame);
            let _ = child.ints.insert(x, IntSet::range(value, 20));
            frame = child.freeze();
            assert!(frame.chain_length <= 9);
        }
        assert_eq!(frame.int_domain(x), Some(&IntSet::range(11, 20)));
    }
}
