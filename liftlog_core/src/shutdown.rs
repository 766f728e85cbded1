//! Signal-driven shutdown flush.
//!
//! The service persists the user store per write, but a final save on
//! SIGINT/SIGTERM guarantees nothing acknowledged as "saved" is lost when
//! the process is terminated abruptly.

use crate::{Result, UserStore};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Install a handler that saves the store once on SIGINT or SIGTERM, then
/// re-raises the default handler so the process actually exits.
///
/// `UserStore::save` copies the map under the read lock, so the flush
/// waits for any in-flight write-lock holder to finish before snapshotting.
pub fn flush_on_signal(store: Arc<UserStore>, snapshot_path: PathBuf) -> Result<JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    let handle = std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            tracing::info!("Received signal {}, flushing snapshot", signal);
            match store.save(&snapshot_path) {
                Ok(()) => tracing::info!("Final snapshot saved to {:?}", snapshot_path),
                Err(e) => tracing::error!("Final snapshot save failed: {}", e),
            }
            if let Err(e) = signal_hook::low_level::emulate_default_handler(signal) {
                tracing::error!("Failed to re-raise signal {}: {}", signal, e);
                std::process::exit(1);
            }
        }
    });

    Ok(handle)
}
