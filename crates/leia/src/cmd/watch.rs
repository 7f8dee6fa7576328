use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use leia_models::SchemaDetails;
use leia_refresher::{BoxError, DataProvider, RefresherConfig, TimeBasedDataProvider};

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{refresh_error, CliError, CliResult, SUCCESS};
use crate::output::{print_snapshot, OutputFormat};

const POLL: Duration = Duration::from_millis(20);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let config = RefresherConfig::new(format!("leia-watch:{}", args.schemas.display()), interval);
    let path = args.schemas.clone();
    // Only publish when the file content actually changed.
    let provider = TimeBasedDataProvider::with_predicate(
        config,
        move || load_schemas(&path),
        |current: Option<&Vec<SchemaDetails>>, next: &Vec<SchemaDetails>| current != Some(next),
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    provider
        .start()
        .map_err(|err| refresh_error("refresher start failed", err))?;

    let mut seen: Option<Arc<Vec<SchemaDetails>>> = None;
    let mut published = 0usize;
    while running.load(Ordering::SeqCst) {
        if let Some(current) = provider.data() {
            let fresh = seen.as_ref().is_none_or(|prev| !Arc::ptr_eq(prev, &current));
            if fresh {
                print_snapshot(
                    provider.name(),
                    current.len(),
                    provider.last_successfully_updated(),
                    format,
                );
                seen = Some(current);
                published = published.saturating_add(1);

                if args.count.is_some_and(|count| published >= count) {
                    break;
                }
            }
        }
        thread::sleep(POLL);
    }

    provider.stop();
    Ok(SUCCESS)
}

fn load_schemas(path: &Path) -> Result<Option<Vec<SchemaDetails>>, BoxError> {
    let raw = std::fs::read(path)?;
    Ok(Some(serde_json::from_slice(&raw)?))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
