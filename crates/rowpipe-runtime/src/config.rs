use crate::coordinator::CoordinatorConfig;
use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `rowpipe` binary.
///
/// Every value can come from a CLI flag or an environment variable (a `.env`
/// file is loaded first). Defaults match an interactive session over a
/// million generated users.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rowpipe",
    version,
    about = "Browse, search and sort a million generated rows from the console"
)]
pub struct CliArgs {
    /// Rows produced by every `generate` command.
    ///
    /// Environment variable: `MAX_ROWS`
    #[arg(long, env = "MAX_ROWS", default_value_t = 1_000_000)]
    pub max_rows: usize,

    /// Rows generated per tick before yielding back to the scheduler.
    ///
    /// Smaller chunks keep the console responsive while generating; larger
    /// chunks finish sooner.
    ///
    /// Environment variable: `CHUNK_ROWS`
    #[arg(long, env = "CHUNK_ROWS", default_value_t = 3_000)]
    pub chunk_rows: usize,

    /// Initial page size. Must be one of `PAGE_SIZES`.
    ///
    /// Environment variable: `PAGE_SIZE`
    #[arg(long, env = "PAGE_SIZE", default_value_t = 15)]
    pub page_size: usize,

    /// Page sizes accepted by the `size` command.
    ///
    /// Environment variable: `PAGE_SIZES`
    #[arg(
        long,
        env = "PAGE_SIZES",
        value_delimiter = ',',
        default_values_t = [15, 30, 50, 100]
    )]
    pub page_sizes: Vec<usize>,

    /// Quiet window in milliseconds before a search is applied.
    ///
    /// Environment variable: `DEBOUNCE_MS`
    #[arg(long, env = "DEBOUNCE_MS", default_value_t = 600)]
    pub debounce_ms: u64,

    /// Number of DataWorker tasks. More than one lets replies arrive out of
    /// order; the coordinator discards superseded ones.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 1)]
    pub num_workers: usize,

    /// Column used for facet filtering.
    ///
    /// Environment variable: `FACET_FIELD`
    #[arg(long, env = "FACET_FIELD", default_value_t = String::from(rowpipe::FIELD_VEHICLE))]
    pub facet_field: String,

    /// Seed for reproducible datasets. Random when unset.
    ///
    /// Environment variable: `SEED`
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Milliseconds to sleep between generation chunks. `0` yields instead.
    ///
    /// Environment variable: `FRAME_MS`
    #[arg(long, env = "FRAME_MS", default_value_t = 0)]
    pub frame_ms: u64,

    /// Seconds to wait for each worker to acknowledge shutdown.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,

    /// Print snapshots as JSON lines instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_rows: usize,
    pub chunk_rows: usize,
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    pub debounce: Duration,
    pub num_workers: usize,
    pub facet_field: String,
    pub seed: Option<u64>,
    pub frame: Duration,
    pub shutdown_timeout: Duration,
    pub json: bool,
}

impl TryFrom<CliArgs> for RuntimeConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.chunk_rows == 0 {
            bail!("CHUNK_ROWS must be greater than 0");
        }

        if args.page_sizes.is_empty() || args.page_sizes.contains(&0) {
            bail!("PAGE_SIZES must list page sizes greater than 0");
        }

        if !args.page_sizes.contains(&args.page_size) {
            bail!(
                "PAGE_SIZE ({}) must be one of PAGE_SIZES ({:?})",
                args.page_size,
                args.page_sizes
            );
        }

        if !rowpipe::user_schema()
            .fields()
            .iter()
            .any(|f| f.name == args.facet_field)
        {
            bail!("FACET_FIELD ({}) is not a user column", args.facet_field);
        }

        Ok(Self {
            max_rows: args.max_rows,
            chunk_rows: args.chunk_rows,
            page_size: args.page_size,
            page_sizes: args.page_sizes,
            debounce: Duration::from_millis(args.debounce_ms),
            num_workers: args.num_workers,
            facet_field: args.facet_field,
            seed: args.seed,
            frame: Duration::from_millis(args.frame_ms),
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
            json: args.json,
        })
    }
}

impl From<&RuntimeConfig> for CoordinatorConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            target_rows: config.max_rows,
            chunk_rows: config.chunk_rows,
            page_size: config.page_size,
            debounce: config.debounce,
            facet_field: config.facet_field.clone(),
            frame: config.frame,
            ..Self::default()
        }
    }
}
