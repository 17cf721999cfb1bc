//! Address-keyed memoization of effect script decodes.
//!
//! Table entries are absolute offsets into the buffer and several entries may alias the same
//! script. [`DecodeContext`] owns the cache that resolves every address at most once, including
//! when distinct addresses are resolved concurrently from the rayon pool.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, OnceLock,
};

use dashmap::DashMap;

use crate::{
    config::DecodeBudget,
    file::Buffer,
    script::effect::{decode_effect_script, EffectScript},
    Result,
};

/// A memoized decode outcome. Failures are cached too, so every alias observes the same error.
type Slot = Arc<OnceLock<Result<Arc<EffectScript>>>>;

/// Decode state shared by every pointer of one table.
///
/// The context borrows the buffer for the duration of the table decode and drops its cache with
/// it. It is `Sync`, so [`DecodeContext::resolve`] can be called from several threads.
pub struct DecodeContext<'a> {
    buffer: Buffer<'a>,
    budget: DecodeBudget,
    cache: DashMap<u32, Slot>,
    decodes: AtomicUsize,
}

impl<'a> DecodeContext<'a> {
    /// Create an empty context over `buffer`.
    #[must_use]
    pub fn new(buffer: Buffer<'a>, budget: DecodeBudget) -> Self {
        DecodeContext {
            buffer,
            budget,
            cache: DashMap::new(),
            decodes: AtomicUsize::new(0),
        }
    }

    /// The buffer scripts are decoded from
    #[must_use]
    pub fn buffer(&self) -> Buffer<'a> {
        self.buffer
    }

    /// Resolve the effect script at `address`, decoding it on first use.
    ///
    /// Concurrent callers asking for the same address block until the single decode finishes
    /// and then share its outcome.
    ///
    /// # Errors
    ///
    /// Returns the (cached) error of [`decode_effect_script`] for this address.
    pub fn resolve(&self, address: u32) -> Result<Arc<EffectScript>> {
        // The shard guard is released at the end of this statement, before any decoding.
        let slot = Arc::clone(
            self.cache
                .entry(address)
                .or_insert_with(|| Arc::new(OnceLock::new()))
                .value(),
        );

        if let Some(outcome) = slot.get() {
            log::trace!("effect script 0x{address:X} served from cache");
            return outcome.clone();
        }

        slot.get_or_init(|| {
            self.decodes.fetch_add(1, Ordering::Relaxed);
            decode_effect_script(self.buffer, address as usize, self.budget).map(Arc::new)
        })
        .clone()
    }

    /// How many times an effect script was actually decoded.
    #[must_use]
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::Relaxed)
    }

    /// Number of distinct addresses seen so far
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::*;
    use crate::{test::ScriptBuilder, Error};

    #[test]
    fn decodes_each_address_once() {
        let data = ScriptBuilder::new().raw(&[0x03, 0xFF]).build();
        let context = DecodeContext::new(Buffer::new(&data), DecodeBudget::default());

        let first = context.resolve(0).unwrap();
        let second = context.resolve(0).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(context.decode_count(), 1);
        assert_eq!(context.cached(), 1);
    }

    #[test]
    fn caches_failures() {
        let data = ScriptBuilder::new().raw(&[0x03]).build();
        let context = DecodeContext::new(Buffer::new(&data), DecodeBudget::default());

        assert_eq!(context.resolve(0), Err(Error::Truncated { offset: 0 }));
        assert_eq!(context.resolve(0), Err(Error::Truncated { offset: 0 }));
        assert_eq!(context.decode_count(), 1);
    }

    #[test]
    fn address_past_end() {
        let data = ScriptBuilder::new().end().build();
        let context = DecodeContext::new(Buffer::new(&data), DecodeBudget::default());

        assert_eq!(context.resolve(0x1000), Err(Error::OutOfBounds));
    }

    #[test]
    fn concurrent_resolution() {
        let data = ScriptBuilder::new().raw(&[0x01, 0x02, 0xFF]).build();
        let context = DecodeContext::new(Buffer::new(&data), DecodeBudget::default());

        let results: Vec<_> = (0..64)
            .into_par_iter()
            .map(|_| context.resolve(0).unwrap())
            .collect();

        assert_eq!(context.decode_count(), 1);
        assert!(results.iter().all(|script| Arc::ptr_eq(script, &results[0])));
    }
}
