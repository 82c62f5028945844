use super::config::WaitConfig;
use super::registry::MappingRegistry;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

/// Outcome of waiting for structure mappings to become available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every file had at least one mapping before the deadline.
    Loaded,
    /// The deadline passed; `unloaded` is the last file found without mappings.
    TimedOut { unloaded: String },
    /// The caller signalled cancellation before loading completed.
    Cancelled,
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded)
    }
}

/// Waits until the registry holds a non-empty mapping list for every file in `file_ids`.
///
/// The allowed time is [`WaitConfig::deadline_for`] the number of files. The registry is
/// polled every [`WaitConfig::poll_interval`]; a registry error counts as "not loaded yet"
/// and is never returned. Setting the `cancel` channel to `true` ends the wait early with
/// [`LoadStatus::Cancelled`]. If the sending half is dropped the wait simply runs to
/// completion or deadline.
#[instrument(skip_all, fields(files = file_ids.len()))]
pub async fn wait_for_load<R: MappingRegistry + ?Sized>(
    registry: &R,
    file_ids: &[String],
    config: &WaitConfig,
    cancel: Option<watch::Receiver<bool>>,
) -> LoadStatus {
    let mut cancel = cancel;
    let deadline = Instant::now() + config.deadline_for(file_ids.len());

    loop {
        let Some(unloaded) = last_unloaded_file(registry, file_ids) else {
            info!("All structure files have mappings.");
            return LoadStatus::Loaded;
        };

        let now = Instant::now();
        if now >= deadline {
            warn!(file = unloaded, "Timed out waiting for structure file to load.");
            return LoadStatus::TimedOut {
                unloaded: unloaded.to_string(),
            };
        }

        let wake = (now + config.poll_interval).min(deadline);
        tokio::select! {
            _ = sleep_until(wake) => {}
            _ = cancellation(&mut cancel) => {
                info!("Wait for structure load cancelled.");
                return LoadStatus::Cancelled;
            }
        }
    }
}

fn last_unloaded_file<'a, R: MappingRegistry + ?Sized>(
    registry: &R,
    file_ids: &'a [String],
) -> Option<&'a str> {
    let mut unloaded = None;
    for file_id in file_ids {
        match registry.mappings(file_id) {
            Ok(mappings) if !mappings.is_empty() => {}
            Ok(_) => unloaded = Some(file_id.as_str()),
            Err(e) => {
                debug!(file = %file_id, error = %e, "Registry not ready; still waiting.");
                unloaded = Some(file_id.as_str());
            }
        }
    }
    unloaded
}

/// Resolves once the cancellation flag reads `true`; never resolves without a sender.
async fn cancellation(cancel: &mut Option<watch::Receiver<bool>>) {
    loop {
        let Some(receiver) = cancel.as_mut() else {
            return std::future::pending().await;
        };
        if *receiver.borrow_and_update() {
            return;
        }
        if receiver.changed().await.is_err() {
            *cancel = None;
        }
    }
}
