use crate::{Error, Result};
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counter identifying the most recent generation run.
///
/// Starting a run advances the counter and hands out an [`EpochToken`]. Any
/// older token observes the change on its next check and stops.
#[derive(Clone, Debug, Default)]
pub struct GenerationEpoch {
    current: Arc<AtomicU64>,
}

impl GenerationEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, invalidating every previously issued token.
    pub fn advance(&self) -> EpochToken {
        let epoch = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        EpochToken {
            epoch,
            current: Arc::clone(&self.current),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }
}

/// Cooperative cancellation handle owned by one generation run.
#[derive(Clone, Debug)]
pub struct EpochToken {
    epoch: u64,
    current: Arc<AtomicU64>,
}

impl EpochToken {
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.epoch
    }

    /// # Errors
    ///
    /// Returns [`Error::GenerationAborted`] once a newer run has started.
    pub fn ensure_current(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Error::GenerationAborted { epoch: self.epoch })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_invalidates_older_tokens() {
        let epoch = GenerationEpoch::new();
        let first = epoch.advance();
        assert!(first.is_current());
        assert_eq!(first.epoch(), 1);

        let second = epoch.advance();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(epoch.current(), 2);
        assert_eq!(
            first.ensure_current(),
            Err(Error::GenerationAborted { epoch: 1 })
        );
        assert_eq!(second.ensure_current(), Ok(()));
    }
}
