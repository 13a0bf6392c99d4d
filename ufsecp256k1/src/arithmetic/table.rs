//! Precomputed multiples of the generator.
//!
//! Window `i` holds `j * 16^i * G` for `j` in `0..16`, with entry 0 being the identity, so a
//! scalar multiplication of the generator needs one table entry per 4-bit window and no
//! doublings at all.

use super::{mul::MulTrace, AffinePoint, ProjectivePoint};
use elliptic_curve::subtle::{ConditionallySelectable, ConstantTimeEq};
use std::sync::OnceLock;

/// Number of 4-bit windows in a 256-bit scalar.
pub(crate) const WINDOWS: usize = 64;

/// Number of entries per window.
pub(crate) const WINDOW_SIZE: usize = 16;

static GENERATOR_TABLE: OnceLock<GeneratorTable> = OnceLock::new();

/// Returns `entries[index]` after touching every entry, recording each visit in `trace`.
///
/// An index past the end selects nothing and yields `T::default()`.
pub(crate) fn select<T>(entries: &[T], index: u8, trace: &mut MulTrace) -> T
where
    T: ConditionallySelectable + Default,
{
    let mut t = T::default();
    for (j, entry) in entries.iter().enumerate() {
        t.conditional_assign(entry, index.ct_eq(&(j as u8)));
        trace.entries_scanned += 1;
    }
    trace.lookups += 1;
    t
}

/// Sixteen affine multiples of one power of the generator.
pub(crate) struct LookupTable([AffinePoint; WINDOW_SIZE]);

impl LookupTable {
    /// Returns entry `index` in constant time.
    pub(crate) fn select(&self, index: u8, trace: &mut MulTrace) -> AffinePoint {
        select(&self.0, index, trace)
    }

    /// Returns entry `index` directly. Only for public indices.
    pub(crate) fn get_vartime(&self, index: u8) -> &AffinePoint {
        &self.0[usize::from(index) % WINDOW_SIZE]
    }
}

/// The full table of generator multiples, one [`LookupTable`] per window.
pub(crate) struct GeneratorTable {
    windows: Vec<LookupTable>,
}

impl GeneratorTable {
    fn build() -> Self {
        let mut windows = Vec::with_capacity(WINDOWS);
        // 16^i * G
        let mut base = ProjectivePoint::GENERATOR;

        for _ in 0..WINDOWS {
            let mut entries = [AffinePoint::IDENTITY; WINDOW_SIZE];
            let mut acc = ProjectivePoint::IDENTITY;
            for entry in entries.iter_mut().skip(1) {
                acc = acc.add(&base);
                *entry = acc.to_affine();
            }
            windows.push(LookupTable(entries));
            base = base.double().double().double().double();
        }

        Self { windows }
    }

    /// Returns the lookup table for window `i`.
    pub(crate) fn window(&self, i: usize) -> &LookupTable {
        &self.windows[i]
    }

    /// Iterates over the windows, least significant first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &LookupTable> {
        self.windows.iter()
    }
}

/// Returns the process-wide generator table, building it on first use.
///
/// Concurrent first callers block until the single build has finished; afterwards the table
/// is read-only and shared without locking.
pub(crate) fn generator_table() -> &'static GeneratorTable {
    GENERATOR_TABLE.get_or_init(|| {
        let table = GeneratorTable::build();
        tracing::debug!(
            windows = WINDOWS,
            entries = WINDOWS * WINDOW_SIZE,
            "built generator table"
        );
        table
    })
}

/// Has the generator table been built yet?
pub(crate) fn is_built() -> bool {
    GENERATOR_TABLE.get().is_some()
}
