//! Script table decoder.
//!
//! The root of an effect blob is a count-prefixed array of absolute pointers:
//!
//! ```text
//! +0x00      i32   count
//! +0x04      u32   pointer[0]
//! ...
//! +0x04+4n   u32   pointer[count - 1]
//! ```
//!
//! A zero pointer has no target. Every other pointer is the offset of an effect script header
//! within the same buffer. Decoded scripts are stored once in the [`ScriptTable`] arena and
//! entries refer to them by [`ScriptId`], so aliasing pointers share a single script.

use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    config::{DecoderConfig, TablePolicy},
    file::Buffer,
    script::{context::DecodeContext, effect::EffectScript},
    Error, Result,
};

/// A raw table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawPointer {
    /// Absolute offset of the target header, `0` for no target
    pub address: u32,
}

impl RawPointer {
    /// Returns `true` if the pointer has no target.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.address == 0
    }
}

/// Index of a decoded script within [`ScriptTable::scripts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptId(pub usize);

/// What a table entry resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// The pointer is zero
    Null,
    /// The pointer resolved to a decoded script
    Script(ScriptId),
    /// The target failed to decode. Only produced under [`TablePolicy::Lenient`].
    Failed(Error),
}

/// A decoded script table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptTable {
    count: i32,
    pointers: Vec<RawPointer>,
    targets: Vec<Target>,
    scripts: Vec<Arc<EffectScript>>,
}

impl ScriptTable {
    /// The entry count read from the buffer
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` if the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// The raw pointers, in table order
    #[must_use]
    pub fn entries(&self) -> &[RawPointer] {
        &self.pointers
    }

    /// What entry `index` resolved to
    #[must_use]
    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    /// The script entry `index` points to, if it resolved to one
    #[must_use]
    pub fn script(&self, index: usize) -> Option<&EffectScript> {
        match self.targets.get(index)? {
            Target::Script(id) => self.get(*id),
            Target::Null | Target::Failed(_) => None,
        }
    }

    /// Look up a script by its arena id
    #[must_use]
    pub fn get(&self, id: ScriptId) -> Option<&EffectScript> {
        self.scripts.get(id.0).map(Arc::as_ref)
    }

    /// The distinct decoded scripts, in order of first reference
    #[must_use]
    pub fn scripts(&self) -> &[Arc<EffectScript>] {
        &self.scripts
    }

    /// Iterate over `(pointer, target)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (RawPointer, &Target)> {
        self.pointers.iter().copied().zip(self.targets.iter())
    }

    /// The entries whose target failed to decode, with their index
    pub fn errors(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(index, target)| match target {
                Target::Failed(error) => Some((index, error)),
                Target::Null | Target::Script(_) => None,
            })
    }

    /// Returns `true` if no entry failed to decode
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Decode a script table with the default, strict configuration.
///
/// # Errors
///
/// See [`decode_table_with`].
///
/// # Examples
///
/// ```rust
/// use fxscope::decode_table;
///
/// // count = 2, both pointers null
/// let data = [0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0];
/// let table = decode_table(&data)?;
///
/// assert_eq!(table.len(), 2);
/// assert!(table.scripts().is_empty());
/// # Ok::<(), fxscope::Error>(())
/// ```
pub fn decode_table(data: &[u8]) -> Result<ScriptTable> {
    decode_table_with(data, DecoderConfig::default())
}

/// Decode a script table.
///
/// Every non-null pointer is resolved through one [`DecodeContext`], so each distinct address is
/// decoded once. With [`DecoderConfig::parallel`] the distinct addresses are decoded on the
/// rayon pool first. The table itself is always assembled in entry order, so the result does not
/// depend on scheduling.
///
/// # Errors
///
/// - [`crate::Error::Truncated`] if the count or pointer array does not fit in `data`
/// - [`crate::Error::Malformed`] if the count is negative
/// - under [`TablePolicy::Strict`], the error of the lowest failing entry
pub fn decode_table_with(data: &[u8], config: DecoderConfig) -> Result<ScriptTable> {
    let buffer = Buffer::new(data);
    let count = buffer
        .read_i32(0)
        .map_err(|_| Error::Truncated { offset: 0 })?;
    let Ok(entries) = usize::try_from(count) else {
        return Err(malformed_error!("Negative script table count - {}", count));
    };

    let pointers = read_pointers(buffer, entries)?;
    let context = DecodeContext::new(buffer, config.budget);

    log::debug!(
        "decoding script table: {} entries, {:?} policy, parallel: {}",
        pointers.len(),
        config.policy,
        config.parallel
    );

    if config.parallel {
        let mut addresses: Vec<u32> = pointers
            .iter()
            .filter(|pointer| !pointer.is_null())
            .map(|pointer| pointer.address)
            .collect();
        addresses.sort_unstable();
        addresses.dedup();

        // Outcomes land in the context cache, failures are picked up again below.
        addresses.par_iter().for_each(|&address| {
            let _ = context.resolve(address);
        });
    }

    let mut ids: HashMap<u32, ScriptId> = HashMap::new();
    let mut scripts = Vec::new();
    let mut targets = Vec::with_capacity(pointers.len());

    for (index, pointer) in pointers.iter().enumerate() {
        if pointer.is_null() {
            targets.push(Target::Null);
            continue;
        }

        match context.resolve(pointer.address) {
            Ok(script) => {
                let id = *ids.entry(pointer.address).or_insert_with(|| {
                    scripts.push(script);
                    ScriptId(scripts.len() - 1)
                });
                targets.push(Target::Script(id));
            }
            Err(error) => match config.policy {
                TablePolicy::Strict => return Err(error),
                TablePolicy::Lenient => {
                    log::warn!(
                        "script table entry {index} (0x{:X}) failed to decode: {error}",
                        pointer.address
                    );
                    targets.push(Target::Failed(error));
                }
            },
        }
    }

    log::debug!(
        "decoded script table: {} entries, {} unique scripts, {} decodes",
        targets.len(),
        scripts.len(),
        context.decode_count()
    );

    Ok(ScriptTable {
        count,
        pointers,
        targets,
        scripts,
    })
}

fn read_pointers(buffer: Buffer, count: usize) -> Result<Vec<RawPointer>> {
    let fits = count
        .checked_mul(4)
        .and_then(|size| size.checked_add(4))
        .is_some_and(|end| end <= buffer.len());
    if !fits {
        return Err(Error::Truncated { offset: 0 });
    }

    let mut parser = buffer.parser_at(0)?;
    parser.advance_by(4)?;

    let mut pointers = Vec::with_capacity(count);
    for _ in 0..count {
        pointers.push(RawPointer {
            address: parser.read_be::<u32>()?,
        });
    }

    Ok(pointers)
}
