use clap::Parser;
use rowpipe::UserRecordGenerator;
use rowpipe_runtime::{
    Coordinator, CoordinatorConfig, WorkerPool,
    config::{CliArgs, RuntimeConfig},
    driver::{Command, Driver},
    pool::DEFAULT_QUEUE_DEPTH,
    telemetry::init_telemetry,
};
use tokio::{
    io::{AsyncWriteExt, BufReader},
    signal,
};

// Using mimalloc for better performance when millions of small rows are
// allocated and dropped between generations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RuntimeConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let pool = WorkerPool::spawn(
        config.num_workers,
        DEFAULT_QUEUE_DEPTH,
        config.shutdown_timeout,
    );
    let seed = config.seed;
    let handle = Coordinator::spawn(CoordinatorConfig::from(&config), pool, move |epoch| {
        UserRecordGenerator::for_run(seed, epoch)
    });
    let driver = Driver::new(handle.clone(), config.page_sizes.clone(), config.json);

    let mut stdout = tokio::io::stdout();
    let session = async {
        // The table is populated once on start, like a freshly mounted view.
        driver.apply(Command::Generate, &mut stdout).await?;
        stdout.flush().await?;
        driver
            .run(BufReader::new(tokio::io::stdin()), &mut stdout)
            .await
    };

    tokio::select! {
        result = session => result?,
        () = shutdown_signal() => {}
    }

    if let Err(_e) = handle.shutdown().await {
        #[cfg(feature = "tracing")]
        tracing::error!("Error during coordinator shutdown: {:?}", _e);
    }

    #[cfg(feature = "tracing")]
    tracing::info!("rowpipe shut down");
    Ok(())
}

fn log_startup_info(_config: &RuntimeConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting rowpipe with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting rowpipe: {} rows, {} workers",
            _config.max_rows,
            _config.num_workers
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
