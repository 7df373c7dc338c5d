//! Wheel of fortune: a discrete uniform draw over the environment list.
//!
//! Presentation spins and tweens; the semantic draw is just an index.

use rand::Rng;

use crate::catalog::{Catalog, Environment};

/// Random source for the wheel. Blanket-implemented for every [`rand::Rng`];
/// tests can implement it directly to pin the drawn index.
pub trait WheelRng {
    /// Pick a segment index in `0..segments`.
    fn pick_index(&mut self, segments: usize) -> usize;
}

impl<R: Rng + ?Sized> WheelRng for R {
    fn pick_index(&mut self, segments: usize) -> usize {
        self.gen_range(0..segments)
    }
}

/// Draw one environment uniformly at random, in catalog list order.
///
/// The catalog must be validated and therefore non-empty; drawing from an
/// empty environment list is a precondition violation.
pub fn spin<'a>(catalog: &'a Catalog, rng: &mut dyn WheelRng) -> &'a Environment {
    let environments = catalog.environments();
    debug_assert!(!environments.is_empty(), "catalog has no environments");
    let index = rng.pick_index(environments.len());
    &environments[index]
}
