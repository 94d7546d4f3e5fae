use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A dense handle into an arena: variables and propagators are stored by their position.
pub trait StorageKey: Copy {
    fn index(self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

/// An arena of `Value`s that is only indexed by handles of type `Key`, so that an [`IntVar`]
/// cannot look up a set variable or a propagator.
///
/// [`IntVar`]: crate::variables::IntVar
#[derive(Clone, Debug)]
pub struct KeyedVec<Key, Value> {
    elements: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            elements: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Store `value` and return its handle.
    pub fn push(&mut self, value: Value) -> Key {
        self.elements.push(value);
        Key::create_from_index(self.elements.len() - 1)
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    /// All handles, in allocation order.
    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Make `key` a valid handle; slots added on the way hold `fill`.
    pub fn accomodate(&mut self, key: Key, fill: Value) {
        if key.index() >= self.elements.len() {
            self.elements.resize(key.index() + 1, fill);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> FromIterator<Value> for KeyedVec<Key, Value> {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        KeyedVec {
            elements: iter.into_iter().collect(),
            key: PhantomData,
        }
    }
}
