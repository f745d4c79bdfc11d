use tracing::debug;

use super::DocumentAssembler;
use crate::error::SwaggenError;

/// Memo of the prepared document.
///
/// Generating the raw document is expensive, so it runs at most once per cache
/// lifetime; later consumers reuse the prepared assembler. A cache is owned by the
/// run that uses it: [`take`](Self::take) hands the assembler over for finalization and
/// [`reset`](Self::reset) starts an independent run.
///
/// ```rust
/// use swaggen_core::{AssemblerConfig, DocumentAssembler, DocumentCache, SchemaDocument};
///
/// # fn main() -> Result<(), swaggen_core::SwaggenError> {
/// let mut cache = DocumentCache::new();
/// for _ in 0..3 {
///     cache.get_or_try_init(|| {
///         let output = SchemaDocument::from_json(r#"{"paths": {}}"#)?;
///         DocumentAssembler::prepare(output, AssemblerConfig::default())
///     })?;
/// }
/// assert_eq!(cache.builds(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DocumentCache {
    slot: Option<DocumentAssembler>,
    builds: usize,
}

impl DocumentCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached assembler, building it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the error of `init`; the cache stays empty in that case.
    pub fn get_or_try_init<F>(&mut self, init: F) -> Result<&mut DocumentAssembler, SwaggenError>
    where
        F: FnOnce() -> Result<DocumentAssembler, SwaggenError>,
    {
        let assembler = match self.slot.take() {
            Some(assembler) => assembler,
            None => {
                let assembler = init()?;
                self.builds += 1;
                debug!(builds = self.builds, "document prepared");
                assembler
            }
        };
        Ok(self.slot.insert(assembler))
    }

    /// The cached assembler, if already built.
    pub fn get(&self) -> Option<&DocumentAssembler> {
        self.slot.as_ref()
    }

    /// The cached assembler, if already built.
    pub fn get_mut(&mut self) -> Option<&mut DocumentAssembler> {
        self.slot.as_mut()
    }

    /// Hands the cached assembler over, leaving the cache empty.
    pub fn take(&mut self) -> Option<DocumentAssembler> {
        self.slot.take()
    }

    /// Drops the cached assembler and the build count.
    pub fn reset(&mut self) {
        self.slot = None;
        self.builds = 0;
    }

    /// How many times the document was built since creation or last reset.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
