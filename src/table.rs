//! Rolling two-array DP table.
//!
//! Each column of the sweep reads one dense array (`current`) and writes the
//! other (`next`), then the two swap roles. Slots hold `Option<V>`; `None`
//! marks a state no configuration reaches, which keeps "unreachable" apart
//! from a legitimate zero count or zero payoff.
//!
//! Alongside each array a list of live indices is kept, so iteration and
//! clearing cost O(live states) instead of O(table length).

/// Pair of dense, index-addressed arrays with live-index tracking.
#[derive(Clone, Debug)]
pub struct RollingTable<V> {
    current: Vec<Option<V>>,
    next: Vec<Option<V>>,
    live: Vec<usize>,
    next_live: Vec<usize>,
}

impl<V: Copy> RollingTable<V> {
    /// Allocate both arrays with `len` empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            current: vec![None; len],
            next: vec![None; len],
            live: Vec::new(),
            next_live: Vec::new(),
        }
    }

    /// Slots per array.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of reachable states in the current array.
    #[inline]
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Live indices of the current array, in first-reached order.
    #[inline]
    pub fn live(&self) -> &[usize] {
        &self.live
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<V> {
        self.current[index]
    }

    /// Reachable `(index, value)` pairs of the current array.
    pub fn iter(&self) -> impl Iterator<Item = (usize, V)> + '_ {
        self.live.iter().filter_map(move |&idx| self.current[idx].map(|v| (idx, v)))
    }

    /// Accumulate `value` into slot `index` of the next array.
    #[inline]
    pub fn stage<F>(&mut self, index: usize, value: V, combine: F)
    where
        F: Fn(V, V) -> V,
    {
        self.staging().stage(index, value, combine);
    }

    /// Visit every live entry of the current array, letting `expand` stage
    /// successors into the next array, then [`commit`](Self::commit).
    pub fn fold_column<F>(&mut self, mut expand: F)
    where
        F: FnMut(usize, V, &mut Staging<'_, V>),
    {
        let mut staging = Staging {
            slots: &mut self.next,
            live: &mut self.next_live,
        };
        for &idx in &self.live {
            if let Some(value) = self.current[idx] {
                expand(idx, value, &mut staging);
            }
        }
        self.commit();
    }

    fn staging(&mut self) -> Staging<'_, V> {
        Staging {
            slots: &mut self.next,
            live: &mut self.next_live,
        }
    }

    /// Make the staged array current and clear the stale one.
    pub fn commit(&mut self) {
        for &idx in &self.live {
            self.current[idx] = None;
        }
        self.live.clear();
        std::mem::swap(&mut self.current, &mut self.next);
        std::mem::swap(&mut self.live, &mut self.next_live);
    }

    /// Reachable entries of the current array sorted by index.
    pub fn snapshot(&self) -> Vec<(usize, V)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        entries
    }
}

/// Write handle on the next array of a [`RollingTable`].
pub struct Staging<'a, V> {
    slots: &'a mut [Option<V>],
    live: &'a mut Vec<usize>,
}

impl<V: Copy> Staging<'_, V> {
    /// Accumulate `value` into slot `index`, combining with any value already
    /// staged there.
    #[inline]
    pub fn stage<F>(&mut self, index: usize, value: V, combine: F)
    where
        F: Fn(V, V) -> V,
    {
        let slot = &mut self.slots[index];
        *slot = Some(match *slot {
            Some(acc) => combine(acc, value),
            None => {
                self.live.push(index);
                value
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::RollingTable;

    #[test]
    fn fold_column_maps_every_live_entry() {
        let mut t = RollingTable::<u64>::new(8);
        for idx in [1, 2, 4] {
            t.stage(idx, idx as u64, |a, b| a + b);
        }
        t.commit();
        // send every index i to i / 2, summing collisions
        t.fold_column(|idx, v, next| next.stage(idx / 2, v, |a, b| a + b));
        assert_eq!(t.snapshot(), vec![(0, 1), (1, 2), (2, 4)]);
        t.fold_column(|idx, v, next| next.stage(idx / 2, v, |a, b| a + b));
        assert_eq!(t.snapshot(), vec![(0, 3), (1, 4)]);
    }

    #[test]
    fn stage_then_commit_exposes_values() {
        let mut t = RollingTable::<u64>::new(8);
        t.stage(3, 2, |a, b| a + b);
        t.stage(5, 1, |a, b| a + b);
        t.stage(3, 4, |a, b| a + b);
        assert_eq!(t.live_len(), 0);
        t.commit();
        assert_eq!(t.live_len(), 2);
        assert_eq!(t.get(3), Some(6));
        assert_eq!(t.get(5), Some(1));
        assert_eq!(t.get(0), None);
        assert_eq!(t.snapshot(), vec![(3, 6), (5, 1)]);
    }

    #[test]
    fn commit_clears_stale_slots() {
        let mut t = RollingTable::<i64>::new(4);
        t.stage(1, 10, i64::max);
        t.commit();
        t.stage(2, -3, i64::max);
        t.commit();
        assert_eq!(t.get(1), None);
        assert_eq!(t.get(2), Some(-3));
        // the stale array must come back empty on the next round
        t.commit();
        assert_eq!(t.live_len(), 0);
        assert_eq!(t.get(2), None);
        t.stage(1, 4, i64::max);
        t.commit();
        assert_eq!(t.snapshot(), vec![(1, 4)]);
    }

    #[test]
    fn zero_is_distinct_from_unreachable() {
        let mut t = RollingTable::<u64>::new(2);
        t.stage(0, 0, |a, b| a + b);
        t.commit();
        assert_eq!(t.get(0), Some(0));
        assert_eq!(t.get(1), None);
        assert_eq!(t.iter().count(), 1);
    }
}
