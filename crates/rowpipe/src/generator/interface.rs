use crate::{Record, Row, Schema};
use std::sync::Arc;

/// A source of records, one at a time.
///
/// Implementations should be deterministic for a given seed so that tests can
/// swap in fixed sequences.
pub trait RecordGenerator {
    /// The layout every produced record follows.
    fn schema(&self) -> Arc<Schema>;

    fn next_record(&mut self) -> Record;

    /// Appends `count` fresh rows to `out`.
    fn fill(&mut self, count: usize, out: &mut Vec<Row>) {
        out.reserve(count);
        for _ in 0..count {
            out.push(Arc::new(self.next_record()));
        }
    }
}

/// Creates a fresh generator for each generation run.
///
/// Concurrent runs never share a generator, so a superseded run can keep
/// ticking without touching the records of the run that replaced it. The
/// `epoch` of the run is passed in so seeded factories can derive distinct
/// but reproducible streams.
pub trait GeneratorFactory: Send + Sync + 'static {
    type Generator: RecordGenerator + Send + 'static;

    fn create(&self, epoch: u64) -> Self::Generator;
}

impl<F, G> GeneratorFactory for F
where
    F: Fn(u64) -> G + Send + Sync + 'static,
    G: RecordGenerator + Send + 'static,
{
    type Generator = G;

    fn create(&self, epoch: u64) -> G {
        self(epoch)
    }
}
