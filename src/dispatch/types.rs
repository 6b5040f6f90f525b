//! Commitment bitmask and dispatch outcome types.

use std::fmt;

use crate::fleet::{Fleet, MAX_UNITS};

/// Set of committed units, one bit per fleet index.
///
/// # Examples
///
/// ```
/// use thermal_dispatch::dispatch::Commitment;
///
/// let c = Commitment::from_indices([0, 2]);
/// assert!(c.contains(2));
/// assert!(!c.contains(1));
/// assert_eq!(c.indices().collect::<Vec<_>>(), vec![0, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment(u64);

impl Commitment {
    pub const EMPTY: Self = Self(0);

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut c = Self::EMPTY;
        for i in indices {
            c.insert(i);
        }
        c
    }

    /// Every unit of a fleet with `n` members.
    pub fn all(n: usize) -> Self {
        if n >= MAX_UNITS {
            Self(u64::MAX)
        } else {
            Self((1u64 << n) - 1)
        }
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Marks fleet index `index` as committed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_UNITS`].
    pub fn insert(&mut self, index: usize) {
        assert!(index < MAX_UNITS, "unit index {index} exceeds commitment width {MAX_UNITS}");
        self.0 |= 1u64 << index;
    }

    pub fn contains(self, index: usize) -> bool {
        index < MAX_UNITS && self.0 & (1u64 << index) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Committed fleet indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let i = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(i)
        })
    }

    /// Whether every committed index exists in a fleet of `n` units.
    pub fn fits(self, n: usize) -> bool {
        self.0 & !Self::all(n).0 == 0
    }

    /// `(Σ p_min, Σ p_max)` of the committed units.
    pub fn bound_sums(self, fleet: &Fleet) -> (f64, f64) {
        self.indices().fold((0.0, 0.0), |(lo, hi), i| {
            (lo + fleet[i].p_min, hi + fleet[i].p_max)
        })
    }

    /// Committed unit ids joined with `+`, e.g. `GT01+GT03`.
    pub fn label(self, fleet: &Fleet) -> String {
        self.indices()
            .map(|i| fleet[i].id.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Outcome of dispatching one committed set against one hour's demand.
///
/// `outputs_mw` is indexed by fleet position; uncommitted units hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// Units that were online.
    pub commitment: Commitment,
    /// Output per fleet index (MW).
    pub outputs_mw: Vec<f64>,
    /// Total hourly cost of the committed units at their outputs ($/h).
    pub total_cost: f64,
    /// System incremental cost at the solution ($/MWh).
    pub lambda: f64,
    /// Bisection steps spent; zero for boundary short-circuits.
    pub iterations: usize,
}

impl DispatchResult {
    /// Sum of all unit outputs (MW).
    pub fn total_output_mw(&self) -> f64 {
        self.outputs_mw.iter().sum()
    }

    /// Output of the unit with `id`, if it exists in `fleet`.
    pub fn output_of(&self, fleet: &Fleet, id: &str) -> Option<f64> {
        fleet.position(id).map(|i| self.outputs_mw[i])
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost={:.2} lambda={:.4} units={} output={:.2} MW",
            self.total_cost,
            self.lambda,
            self.commitment.len(),
            self.total_output_mw(),
        )
    }
}
