//! Request coordination between user intents, generation runs and the
//! DataWorker pool.
//!
//! A single task owns the dataset and the [`ViewState`]. It reacts to two
//! inputs: intents from any number of [`TableHandle`]s and completions from
//! the tasks it spawned (generation runs, worker calls, debounce timers).
//! Nothing it owns is shared, so no locks guard view state.
//!
//! ## Staleness
//!
//! Every worker request is stamped by the [`RequestLedger`] on one of three
//! lanes. A reply is applied only when it answers the latest request of its
//! lane and was computed against the current dataset version; anything else
//! is dropped with a trace event. Superseded work still runs to completion
//! on the worker.
//!
//! ## Sort chain
//!
//! A sort replaces the stored dataset (and commits the sort spec) only when
//! its reply is applied, then re-filters the sorted dataset with the current
//! query and facet. Issuing a newer sort, or a Generate, while that filter is
//! outstanding supersedes it.

mod debounce;
mod intent;
mod ledger;


pub use debounce::Debouncer;
pub use intent::Intent;
pub use ledger::{Lane, RequestLedger, Resolution};

use crate::{
    pool::{WorkerChannel, call},
    view::{Notice, ViewSnapshot, ViewState},
};
use core::time::Duration;
use intent::{Command, Completion};
use rowpipe::{
    ChunkedProducer, DEFAULT_PAGE_SIZE, Dataset, Error, FIELD_VEHICLE, GenerationEpoch,
    GeneratorFactory, RecordGenerator, Result, SortSpec, TokioSleep, TokioYield,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Tunables for one [`Coordinator`].
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Rows produced by every Generate.
    pub target_rows: usize,
    /// Rows per generation tick.
    pub chunk_rows: usize,
    pub page_size: usize,
    /// Quiet window before a query edit is applied.
    pub debounce: Duration,
    /// Column used for facet filtering and facet options.
    pub facet_field: String,
    /// Tick length between generation chunks; zero yields instead of
    /// sleeping.
    pub frame: Duration,
    /// Intents that may queue before handles wait.
    pub intent_buffer: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            target_rows: 1_000_000,
            chunk_rows: 3_000,
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(600),
            facet_field: FIELD_VEHICLE.to_string(),
            frame: Duration::ZERO,
            intent_buffer: 64,
        }
    }
}

/// Cloneable front-end side of a running [`Coordinator`].
///
/// Intent methods resolve once the coordinator has applied the intent and
/// published the resulting snapshot, not when the work it triggered is done.
/// Use [`settled`](Self::settled) to wait for that.
#[derive(Clone, Debug)]
pub struct TableHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<ViewSnapshot>,
}

impl TableHandle {
    pub async fn search(&self, query: impl Into<String>) -> Result<()> {
        self.send(Intent::Search(query.into())).await
    }

    pub async fn sort_by(&self, field: impl Into<String>) -> Result<()> {
        self.send(Intent::SortBy(field.into())).await
    }

    pub async fn select_facet(&self, value: Option<String>) -> Result<()> {
        self.send(Intent::SelectFacet(value)).await
    }

    pub async fn change_page(&self, page: usize) -> Result<()> {
        self.send(Intent::ChangePage(page)).await
    }

    pub async fn next_page(&self) -> Result<()> {
        self.send(Intent::NextPage).await
    }

    pub async fn prev_page(&self) -> Result<()> {
        self.send(Intent::PrevPage).await
    }

    pub async fn change_page_size(&self, page_size: usize) -> Result<()> {
        self.send(Intent::ChangePageSize(page_size)).await
    }

    pub async fn generate(&self) -> Result<()> {
        self.send(Intent::Generate).await
    }

    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once the coordinator has stopped.
    pub async fn send(&self, intent: Intent) -> Result<()> {
        let (ack, applied) = oneshot::channel();
        self.commands
            .send(Command::Intent { intent, ack })
            .await
            .map_err(|_| Error::ServiceShutdown)?;
        applied.await.map_err(|_| Error::ServiceShutdown)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until no generation, worker request or debounced query is
    /// outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] if the coordinator stops first.
    pub async fn settled(&self) -> Result<ViewSnapshot> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(ViewSnapshot::is_settled)
            .await
            .map_err(|_| Error::ServiceShutdown)?;
        Ok(snapshot.clone())
    }

    /// Stops the coordinator and shuts its worker channel down. Dropping every
    /// handle has the same effect.
    pub async fn shutdown(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { ack })
            .await
            .map_err(|_| Error::ServiceShutdown)?;
        done.await.map_err(|_| Error::ServiceShutdown)
    }
}

/// Owner of the dataset and view state. See the module docs.
pub struct Coordinator<C, F> {
    config: CoordinatorConfig,
    channel: Arc<C>,
    factory: F,
    epoch: GenerationEpoch,
    generating: bool,
    ledger: RequestLedger,
    debounce: Debouncer,
    view: ViewState,
    dataset: Dataset,
    /// Bumped whenever `dataset` is replaced (generation or applied sort).
    dataset_version: u64,
    /// Base for header-click toggling: the most recently requested spec.
    pending_sort: SortSpec,
    /// A sort superseded an outstanding filter; re-issue it if the sort fails.
    refilter_on_sort_failure: bool,
    completions: mpsc::UnboundedSender<Completion>,
    snapshots: watch::Sender<ViewSnapshot>,
}

impl<C, F> Coordinator<C, F>
where
    C: WorkerChannel,
    F: GeneratorFactory,
{
    /// Starts the coordinator task on the current Tokio runtime.
    ///
    /// The view starts empty; send [`Intent::Generate`] to produce data.
    pub fn spawn(config: CoordinatorConfig, channel: C, factory: F) -> TableHandle {
        // Epoch 0 is never handed to a generation run.
        let schema = factory.create(0).schema();
        let view = ViewState::new(
            Arc::clone(&schema),
            &config.facet_field,
            config.page_size,
            config.target_rows,
        );

        let (snapshots, snapshot_rx) = watch::channel(view.snapshot(false, false));
        let (commands_tx, commands) = mpsc::channel(config.intent_buffer.max(1));
        let (completions, completions_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            channel: Arc::new(channel),
            factory,
            epoch: GenerationEpoch::new(),
            generating: false,
            ledger: RequestLedger::new(),
            debounce: Debouncer::new(config.debounce),
            view,
            dataset: Dataset::empty(schema),
            dataset_version: 0,
            pending_sort: SortSpec::unsorted(),
            refilter_on_sort_failure: false,
            completions,
            snapshots,
            config,
        };
        tokio::spawn(coordinator.run(commands, completions_rx));

        TableHandle {
            commands: commands_tx,
            snapshots: snapshot_rx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Coordinator started");

        loop {
            tokio::select! {
                biased;
                Some(completion) = completions.recv() => self.on_completion(completion),
                command = commands.recv() => match command {
                    Some(Command::Intent { intent, ack }) => {
                        self.on_intent(intent);
                        self.publish();
                        let _ = ack.send(());
                        continue;
                    }
                    Some(Command::Shutdown { ack }) => {
                        self.shutdown().await;
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        self.shutdown().await;
                        break;
                    }
                },
            }
            self.publish();
        }
    }

    fn is_busy(&self) -> bool {
        self.generating || self.ledger.any_outstanding()
    }

    fn publish(&self) {
        let snapshot = self
            .view
            .snapshot(self.is_busy(), self.debounce.is_pending());
        self.snapshots.send_replace(snapshot);
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    fn on_intent(&mut self, intent: Intent) {
        self.view.clear_notice();
        match intent {
            Intent::Search(query) => self.search(query),
            Intent::SortBy(field) => self.sort_by(&field),
            Intent::SelectFacet(value) => self.select_facet(value),
            Intent::ChangePage(page) => {
                self.view.go_to_page(page);
            }
            Intent::NextPage => {
                self.view.next_page();
            }
            Intent::PrevPage => {
                self.view.prev_page();
            }
            Intent::ChangePageSize(page_size) => {
                self.view.set_page_size(page_size);
            }
            Intent::Generate => self.generate(),
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Progress { epoch, rows } => {
                if epoch == self.epoch.current() {
                    self.view.set_generated_rows(rows);
                }
            }
            Completion::Generated { epoch, result } => self.on_generated(epoch, result),
            Completion::Sorted {
                seq,
                version,
                spec,
                result,
            } => self.on_sorted(seq, version, spec, result),
            Completion::Filtered {
                seq,
                version,
                result,
            } => self.on_filtered(seq, version, result),
            Completion::FacetValues { seq, result } => self.on_facet_values(seq, result),
            Completion::QueryQuiet { ticket } => {
                if self.debounce.fire(ticket) {
                    self.issue_filter();
                }
            }
        }
    }

    fn search(&mut self, query: String) {
        if query == self.view.query() && !self.debounce.is_pending() {
            return;
        }
        self.view.set_query(query);

        let completions = self.completions.clone();
        self.debounce.schedule(move |ticket| {
            let _ = completions.send(Completion::QueryQuiet { ticket });
        });
    }

    fn select_facet(&mut self, value: Option<String>) {
        // The facet filter already carries the latest query text.
        self.debounce.cancel();
        self.view.set_facet_value(value);
        self.issue_filter();
    }

    fn sort_by(&mut self, field: &str) {
        let spec = self.pending_sort.toggle_on(field);
        self.pending_sort = spec.clone();

        // The placeholder is never sorted; `on_generated` issues this spec.
        if self.generating {
            return;
        }
        self.issue_sort(spec);
    }

    fn issue_sort(&mut self, spec: SortSpec) {
        if self.ledger.is_outstanding(Lane::Filter) {
            self.ledger.supersede(Lane::Filter);
            self.refilter_on_sort_failure = true;
        }

        let seq = self.ledger.issue(Lane::Sort);
        let version = self.dataset_version;
        let dataset = self.dataset.clone();
        let channel = Arc::clone(&self.channel);

        self.spawn_call(Lane::Sort, seq, async move {
            let result = call::sort(&*channel, dataset, spec.clone()).await;
            Completion::Sorted {
                seq,
                version,
                spec,
                result,
            }
        });
    }

    fn generate(&mut self) {
        let token = self.epoch.advance();
        let epoch = token.epoch();

        self.ledger.supersede_all();
        self.debounce.cancel();
        self.pending_sort = SortSpec::unsorted();
        self.refilter_on_sort_failure = false;
        self.dataset = Dataset::empty(Arc::clone(self.dataset.schema()));
        self.dataset_version += 1;
        self.view.reset_for_generation(self.config.target_rows);
        self.generating = true;

        let generator = self.factory.create(epoch);
        let target = self.config.target_rows;
        let chunk_rows = self.config.chunk_rows;
        let frame = self.config.frame;
        let completions = self.completions.clone();

        let task = async move {
            let mut producer = ChunkedProducer::new(generator, chunk_rows).with_frame(frame);
            let progress_tx = completions.clone();
            let progress = move |rows: usize, _target: usize| {
                let _ = progress_tx.send(Completion::Progress { epoch, rows });
            };

            let result = if frame.is_zero() {
                producer
                    .generate_with_progress::<TokioYield, _>(target, &token, progress)
                    .await
            } else {
                producer
                    .generate_with_progress::<TokioSleep, _>(target, &token, progress)
                    .await
            };
            let _ = completions.send(Completion::Generated { epoch, result });
        };

        #[cfg(feature = "tracing")]
        let task = tracing::Instrument::instrument(
            task,
            tracing::info_span!("generate", epoch, target),
        );
        tokio::spawn(task);
    }

    fn on_generated(&mut self, epoch: u64, result: Result<Dataset>) {
        if epoch != self.epoch.current() {
            #[cfg(feature = "tracing")]
            tracing::debug!(epoch, "Discarding superseded generation");
            return;
        }
        self.generating = false;

        match result {
            Ok(dataset) => {
                #[cfg(feature = "tracing")]
                tracing::info!(epoch, rows = dataset.len(), "Dataset generated");

                self.dataset = dataset;
                self.dataset_version += 1;
                // Anything issued while generating ran against the empty
                // placeholder.
                self.ledger.supersede_all();
                self.refilter_on_sort_failure = false;
                self.view.set_dataset(&self.dataset);

                if !self.view.filter_spec().is_identity() {
                    self.issue_filter();
                }
                // A sort requested while generating starts its chain now and
                // supersedes the filter above until it is applied.
                if !self.pending_sort.is_unsorted() {
                    self.issue_sort(self.pending_sort.clone());
                }
                self.issue_facet_values();
            }
            Err(e) => {
                self.pending_sort = self.view.sort_spec().clone();
                self.report(e);
            }
        }
    }

    fn on_sorted(&mut self, seq: u64, version: u64, spec: SortSpec, result: Result<Dataset>) {
        if !self.accept(Lane::Sort, seq, Some(version)) {
            return;
        }

        match result {
            Ok(sorted) => {
                self.dataset = sorted;
                self.dataset_version += 1;
                self.view.set_sort_spec(spec);
                self.refilter_on_sort_failure = false;
                self.issue_filter();
            }
            Err(e) => {
                self.pending_sort = self.view.sort_spec().clone();
                self.report(e);
                if core::mem::take(&mut self.refilter_on_sort_failure) {
                    self.issue_filter();
                }
            }
        }
    }

    fn on_filtered(&mut self, seq: u64, version: u64, result: Result<Dataset>) {
        if !self.accept(Lane::Filter, seq, Some(version)) {
            return;
        }

        match result {
            Ok(filtered) => self.view.set_filtered(filtered),
            Err(e) => self.report(e),
        }
    }

    fn on_facet_values(&mut self, seq: u64, result: Result<Vec<String>>) {
        // Facet options do not depend on row order, so a sort applied in the
        // meantime does not invalidate them.
        if !self.accept(Lane::FacetValues, seq, None) {
            return;
        }

        match result {
            Ok(options) => self.view.set_facet_options(options),
            Err(e) => self.report(e),
        }
    }

    /// Filters the stored dataset with the current query and facet. The
    /// identity filter is applied in place without a worker round trip.
    fn issue_filter(&mut self) {
        let spec = self.view.filter_spec();
        if spec.is_identity() {
            self.ledger.supersede(Lane::Filter);
            self.view.set_filtered(self.dataset.clone());
            return;
        }
        // The finished generation filters its own dataset.
        if self.generating {
            self.ledger.supersede(Lane::Filter);
            return;
        }

        let seq = self.ledger.issue(Lane::Filter);
        let version = self.dataset_version;
        let dataset = self.dataset.clone();
        let channel = Arc::clone(&self.channel);

        self.spawn_call(Lane::Filter, seq, async move {
            let result = call::filter(&*channel, dataset, spec).await;
            Completion::Filtered {
                seq,
                version,
                result,
            }
        });
    }

    fn issue_facet_values(&mut self) {
        let seq = self.ledger.issue(Lane::FacetValues);
        let field = self.config.facet_field.clone();
        let dataset = self.dataset.clone();
        let channel = Arc::clone(&self.channel);

        self.spawn_call(Lane::FacetValues, seq, async move {
            let result = call::distinct_values(&*channel, dataset, field).await;
            Completion::FacetValues { seq, result }
        });
    }

    fn accept(&mut self, lane: Lane, seq: u64, version: Option<u64>) -> bool {
        let fresh = self.ledger.resolve(lane, seq) == Resolution::Fresh;
        if fresh && version.is_none_or(|v| v == self.dataset_version) {
            return true;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(?lane, seq, "StaleResponseDiscarded");
        false
    }

    fn report(&mut self, error: Error) {
        if error.is_silent() {
            #[cfg(feature = "tracing")]
            tracing::debug!(%error, "Ignoring superseded work");
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(%error, "Request failed");
        self.view.set_notice(Notice::from_error(&error));
    }

    fn spawn_call<Fut>(&self, _lane: Lane, _seq: u64, call: Fut)
    where
        Fut: Future<Output = Completion> + Send + 'static,
    {
        let completions = self.completions.clone();
        let task = async move {
            let completion = call.await;
            if completions.send(completion).is_err() {
                #[cfg(feature = "tracing")]
                tracing::trace!("Coordinator stopped before the reply arrived");
            }
        };

        #[cfg(feature = "tracing")]
        let task = tracing::Instrument::instrument(
            task,
            tracing::debug_span!("worker_call", lane = ?_lane, seq = _seq),
        );
        tokio::spawn(task);
    }

    async fn shutdown(&mut self) {
        self.debounce.cancel();
        // Stops a running generation at its next chunk boundary.
        let _ = self.epoch.advance();
        self.ledger.supersede_all();
        self.generating = false;

        if let Err(_e) = self.channel.shutdown().await {
            #[cfg(feature = "tracing")]
            tracing::error!("Error during worker shutdown: {_e}");
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Coordinator stopped");
    }
}
