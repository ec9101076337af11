use std::marker::PhantomData;

/// Arena indexed by a typed id `K`, so activity and flow indexes can't be mixed up.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct IdVec<K, V> {
    vec: Vec<V>,
    _phantom: PhantomData<K>,
}

impl<K, V> Default for IdVec<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V> IdVec<K, V> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            vec: Vec::with_capacity(cap),
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vec.iter()
    }
}

impl<K: From<usize>, V> IdVec<K, V> {
    /// Push `v` and return the id it can be retrieved with.
    #[inline]
    pub fn push(&mut self, v: V) -> K {
        let id = self.vec.len().into();
        self.vec.push(v);
        id
    }

    /// Iterate over `(id, value)` pairs in id order.
    pub fn iter_ids(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.vec.iter().enumerate().map(|(i, v)| (K::from(i), v))
    }

    /// Every id currently allocated, in order.
    pub fn ids(&self) -> impl Iterator<Item = K> {
        (0..self.vec.len()).map(K::from)
    }
}

impl<K: Into<usize>, V> IdVec<K, V> {
    /// Get the value with id `k`.
    /// Ids are only ever handed out by [`IdVec::push`], so this panics
    /// only if an id from another arena is used.
    #[inline]
    pub fn get(&self, k: K) -> &V {
        &self.vec[k.into()]
    }

    /// Like [`IdVec::get`], but returns `None` for an out-of-range id.
    #[inline]
    pub fn try_get(&self, k: K) -> Option<&V> {
        self.vec.get(k.into())
    }
}

impl<K, V> FromIterator<V> for IdVec<K, V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            vec: iter.into_iter().collect(),
            _phantom: PhantomData,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    crate::typed_id!(TestId, u32);

    #[test]
    fn test_push_returns_sequential_ids() {
        let mut v: IdVec<TestId, &str> = IdVec::with_capacity(2);
        let a = v.push("a");
        let b = v.push("b");
        assert_eq!(a, TestId::from(0));
        assert_eq!(b, TestId::from(1));
        assert_eq!(*v.get(b), "b");
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_iter_ids() {
        let v: IdVec<TestId, u8> = [7, 8, 9].into_iter().collect();
        let pairs: Vec<_> = v.iter_ids().map(|(k, v)| (k.index(), *v)).collect();
        assert_eq!(pairs, vec![(0, 7), (1, 8), (2, 9)]);
        assert_eq!(v.ids().last(), Some(TestId::from(2)));
    }

    #[test]
    fn test_try_get_out_of_range() {
        let v: IdVec<TestId, u8> = IdVec::default();
        assert!(v.is_empty());
        assert_eq!(v.try_get(TestId::from(3)), None);
    }
}
