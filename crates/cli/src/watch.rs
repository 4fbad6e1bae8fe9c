use crate::output::RootRow;
use crate::{Settings, parse_root};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Print every root once, then again each time its resolved name changes.
pub async fn run(
    settings: &Settings,
    args: &[String],
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let roots = args
        .iter()
        .map(|arg| parse_root(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let (runtime, watcher) = modscope_runtime::build_watching_resolver(settings.layout.as_ref())?;
    let cancel_token = CancellationToken::new();
    let pump = watcher.spawn_pump(runtime.hub.clone(), cancel_token.clone());

    let mut last: HashMap<String, Option<String>> = HashMap::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));
    info!("Watching {} roots. Press Ctrl+C to stop.", roots.len());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                for root in &roots {
                    let row =
                        RootRow::resolve(&runtime.names, root, settings.allow_source_fallback);
                    if last.get(&row.root) == Some(&row.module) {
                        continue;
                    }
                    if settings.json {
                        println!("{}", serde_json::to_string(&row)?);
                    } else {
                        println!("{} -> {}", row.root, row.shown);
                    }
                    last.insert(row.root.clone(), row.module);
                }
            }
        }
    }

    cancel_token.cancel();
    pump.await?;
    let store = runtime.names.store();
    let stats = store.stats();
    info!(
        "Watcher stopped with {} cached roots ({} live)",
        stats.total_entries,
        stats.live_entries()
    );
    for root in store.keys() {
        debug!("Cached root: {}", root);
    }
    Ok(())
}
