use std::collections::HashMap;

/// A nickname and its accumulated value
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<T> {
    pub nickname: String,
    pub value: T,
}

/// Values a [`Tally`] can sum. Integer totals saturate instead of overflowing.
pub trait Total: Copy + Default + PartialOrd {
    fn plus(self, other: Self) -> Self;
}

impl Total for f64 {
    fn plus(self, other: Self) -> Self {
        self + other
    }
}

impl Total for i64 {
    fn plus(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

/// Per-nickname accumulator that remembers first-insertion order.
///
/// Ranking ties are broken by that order, so a plain `HashMap` is not enough.
#[derive(Debug, Clone)]
pub struct Tally<T> {
    index: HashMap<String, usize>,
    entries: Vec<Standing<T>>,
}

impl<T> Default for Tally<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T: Total> Tally<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a nickname's total, starting missing keys at zero
    pub fn add(&mut self, nickname: &str, amount: T) {
        match self.index.get(nickname) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.value = entry.value.plus(amount);
            }
            None => {
                self.index.insert(nickname.to_string(), self.entries.len());
                self.entries.push(Standing {
                    nickname: nickname.to_string(),
                    value: T::default().plus(amount),
                });
            }
        }
    }

    pub fn get(&self, nickname: &str) -> Option<T> {
        self.index.get(nickname).map(|&i| self.entries[i].value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Standings by value descending. The sort is stable: equal values stay
    /// in the order their nicknames were first added.
    pub fn into_sorted(self) -> Vec<Standing<T>> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries
    }
}
