use crate::{Dataset, EpochToken, RecordGenerator, Result, TickProvider};
use core::time::Duration;

/// Drives a [`RecordGenerator`] in bounded chunks, yielding between them so a
/// million-row run never monopolises the executor.
///
/// Rows accumulate in a buffer local to one call of
/// [`generate`](Self::generate). A run that loses its [`EpochToken`] returns
/// [`Error::GenerationAborted`](crate::Error::GenerationAborted) and drops the
/// buffer, so a partial dataset is never observable.
pub struct ChunkedProducer<G> {
    generator: G,
    chunk_size: usize,
    frame: Duration,
}

impl<G> ChunkedProducer<G>
where
    G: RecordGenerator,
{
    pub const DEFAULT_CHUNK_SIZE: usize = 3_000;

    /// A `chunk_size` of zero is treated as one.
    pub fn new(generator: G, chunk_size: usize) -> Self {
        Self {
            generator,
            chunk_size: chunk_size.max(1),
            frame: Duration::ZERO,
        }
    }

    /// Frame length handed to the tick provider between chunks.
    #[must_use]
    pub const fn with_frame(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Produces exactly `target` rows.
    ///
    /// # Errors
    ///
    /// Returns `GenerationAborted` if `token` is superseded before the run
    /// completes.
    pub async fn generate<T>(&mut self, target: usize, token: &EpochToken) -> Result<Dataset>
    where
        T: TickProvider,
    {
        self.generate_with_progress::<T, _>(target, token, |_, _| {})
            .await
    }

    /// Like [`generate`](Self::generate), calling `progress(rows_so_far,
    /// target)` after every chunk.
    ///
    /// # Errors
    ///
    /// Returns `GenerationAborted` if `token` is superseded before the run
    /// completes.
    pub async fn generate_with_progress<T, F>(
        &mut self,
        target: usize,
        token: &EpochToken,
        mut progress: F,
    ) -> Result<Dataset>
    where
        T: TickProvider,
        F: FnMut(usize, usize),
    {
        let mut rows = Vec::with_capacity(target);

        while rows.len() < target {
            token.ensure_current()?;

            let chunk = self.chunk_size.min(target - rows.len());
            self.generator.fill(chunk, &mut rows);
            progress(rows.len(), target);

            if rows.len() < target {
                T::tick(self.frame).await;
            }
        }

        if let Err(e) = token.ensure_current() {
            #[cfg(feature = "tracing")]
            tracing::debug!(epoch = token.epoch(), "generation superseded after last chunk");
            return Err(e);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(epoch = token.epoch(), rows = rows.len(), "generation complete");

        Ok(Dataset::new(self.generator.schema(), rows))
    }
}
