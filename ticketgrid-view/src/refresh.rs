//! Live invalidation listener
//!
//! Subscribes to the server's change channel and keeps a view's base record
//! set fresh: any signal schedules a full re-fetch, bursts within a short
//! window coalesce into one request, and results apply in completion order so
//! the last fetch to resolve wins. The listener is an owned resource; cancel
//! it (or drop it) and the channel closes, with any in-flight fetch result
//! discarded instead of applied.
//!
//! # Example
//!
//! ```ignore
//! let client = TicketClient::builder().url("http://localhost:8080").build()?;
//! let listener = InvalidationListener::spawn(client, RefreshConfig::default());
//! let mut data = listener.subscribe();
//!
//! while data.changed().await.is_ok() {
//!     let latest = data.borrow().clone();
//!     view.replace_records(latest.records);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use log::debug;
use log::warn;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use ticketgrid_lib::TicketClient;
use ticketgrid_lib::error::Error;
use ticketgrid_lib::error::StreamError;
use ticketgrid_lib::model::Record;
use ticketgrid_lib::stream::ChangeSignal;
use ticketgrid_lib::stream::ChannelState;

/// Where the listener gets records and change signals from.
///
/// [`TicketClient`] is the production implementation; tests substitute a
/// scripted source.
#[async_trait]
pub trait RecordSource: Send + Sync + 'static {
    /// Fetches the full base record set.
    async fn list(&self) -> Result<Vec<Record>, Error>;

    /// Opens the change channel.
    fn changes(&self) -> BoxStream<'static, Result<ChangeSignal, StreamError>>;
}

#[async_trait]
impl RecordSource for TicketClient {
    async fn list(&self) -> Result<Vec<Record>, Error> {
        TicketClient::list(self).await
    }

    fn changes(&self) -> BoxStream<'static, Result<ChangeSignal, StreamError>> {
        Box::pin(self.subscribe_changes())
    }
}

/// What to do when the change channel drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Leave the channel closed; the view keeps its last data.
    Never,
    /// Resubscribe after the given delay.
    AfterDelay(Duration),
}

/// Configuration for the invalidation listener.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ticketgrid_view::refresh::{ReconnectPolicy, RefreshConfig};
///
/// let config = RefreshConfig::default()
///     .with_coalesce_window(Duration::from_millis(500))
///     .with_reconnect(ReconnectPolicy::AfterDelay(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Signals arriving within this window of the first one collapse into a
    /// single re-fetch.
    ///
    /// Default: 250 ms. Zero disables coalescing.
    pub coalesce_window: Duration,

    /// Behavior after the change channel drops.
    ///
    /// Default: [`ReconnectPolicy::Never`].
    pub reconnect: ReconnectPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            coalesce_window: Duration::from_millis(250),
            reconnect: ReconnectPolicy::Never,
        }
    }
}

impl RefreshConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coalescing window.
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    /// Sets the reconnect policy.
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

/// The published view of the base record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    /// The records of the last fetch to complete.
    pub records: Vec<Record>,
    /// Non-fatal status text, set when the last fetch failed.
    pub status: Option<String>,
}

/// A running listener bound to one mounted view.
///
/// Owns the change-channel subscription for its whole lifetime. Dropping the
/// listener cancels the driver task, which closes the channel and discards
/// any fetch still in flight.
pub struct InvalidationListener {
    data: watch::Receiver<TableData>,
    state: watch::Receiver<ChannelState>,
    trigger: mpsc::Sender<()>,
    cancel: CancellationToken,
    driver: JoinHandle<()>,
}

impl InvalidationListener {
    /// Spawns the listener on the current tokio runtime.
    ///
    /// An initial fetch is issued immediately, before any signal arrives.
    pub fn spawn<S: RecordSource>(source: S, config: RefreshConfig) -> Self {
        let (data_tx, data_rx) = watch::channel(TableData::default());
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let driver = tokio::spawn(drive(
            Arc::new(source),
            config,
            data_tx,
            state_tx,
            trigger_rx,
            cancel.clone(),
        ));
        Self {
            data: data_rx,
            state: state_rx,
            trigger: trigger_tx,
            cancel,
            driver,
        }
    }

    /// Subscribes to the published record set.
    pub fn subscribe(&self) -> watch::Receiver<TableData> {
        self.data.clone()
    }

    /// The current lifecycle state of the change channel.
    pub fn channel_state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Subscribes to change-channel lifecycle transitions.
    pub fn channel_states(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Requests a re-fetch outside the signal path (manual refresh).
    ///
    /// Requests are dropped if one is already queued; the in-flight fetch
    /// covers them.
    pub fn request_refresh(&self) {
        let _ = self.trigger.try_send(());
    }

    /// Tears the listener down: closes the channel and stops the driver.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Waits for the driver task to finish after a shutdown.
    pub async fn join(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.driver).await;
    }
}

impl Drop for InvalidationListener {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_fetch<S: RecordSource>(source: &Arc<S>, results: &mpsc::Sender<Result<Vec<Record>, Error>>) {
    let source = Arc::clone(source);
    let results = results.clone();
    tokio::spawn(async move {
        let outcome = source.list().await;
        // The receiver is gone once the listener is torn down; the stale
        // result is dropped here rather than applied.
        let _ = results.send(outcome).await;
    });
}

fn apply(data: &watch::Sender<TableData>, outcome: Result<Vec<Record>, Error>) {
    match outcome {
        Ok(records) => {
            debug!("applying {} records", records.len());
            data.send_replace(TableData {
                records,
                status: None,
            });
        }
        Err(e) => {
            warn!("base record fetch failed: {e}");
            data.send_replace(TableData {
                records: Vec::new(),
                status: Some(format!("Failed to load tickets: {e}")),
            });
        }
    }
}

async fn drive<S: RecordSource>(
    source: Arc<S>,
    config: RefreshConfig,
    data: watch::Sender<TableData>,
    state: watch::Sender<ChannelState>,
    mut trigger: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    let (results_tx, mut results) = mpsc::channel::<Result<Vec<Record>, Error>>(8);

    // Initial population happens regardless of the channel's fate.
    spawn_fetch(&source, &results_tx);

    'channel: loop {
        transition(&state, ChannelState::Connecting);
        let mut changes = source.changes().fuse();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    transition(&state, ChannelState::Closed);
                    return;
                }
                Some(outcome) = results.recv() => apply(&data, outcome),
                Some(()) = trigger.recv() => spawn_fetch(&source, &results_tx),
                event = changes.next() => match event {
                    Some(Ok(signal)) => {
                        transition(&state, ChannelState::Connected);
                        debug!("invalidation signal: {}", signal.data);
                        match coalesce(&mut changes, config.coalesce_window, &cancel).await {
                            Coalesce::Cancelled => {
                                transition(&state, ChannelState::Closed);
                                return;
                            }
                            Coalesce::Elapsed => spawn_fetch(&source, &results_tx),
                            Coalesce::Ended(error) => {
                                // The signal that opened the window still
                                // counts; re-fetch before closing the channel.
                                spawn_fetch(&source, &results_tx);
                                if let Some(e) = error {
                                    warn!("change channel error: {e}");
                                }
                                transition(&state, ChannelState::Closed);
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!("change channel error: {e}");
                        transition(&state, ChannelState::Closed);
                        break;
                    }
                    None => {
                        transition(&state, ChannelState::Closed);
                        break;
                    }
                },
            }
        }

        match config.reconnect {
            ReconnectPolicy::Never => break 'channel,
            ReconnectPolicy::AfterDelay(delay) => {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    // Channel closed for good: keep serving manual refreshes and applying
    // whatever is still in flight until the view unmounts.
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            Some(outcome) = results.recv() => apply(&data, outcome),
            Some(()) = trigger.recv() => spawn_fetch(&source, &results_tx),
        }
    }
}

/// How a coalescing window ended.
enum Coalesce {
    /// The window elapsed with the channel still open.
    Elapsed,
    /// The channel ended during the window, cleanly or with an error.
    Ended(Option<StreamError>),
    /// The listener was torn down.
    Cancelled,
}

/// Absorbs further signals for one window.
async fn coalesce<St>(changes: &mut St, window: Duration, cancel: &CancellationToken) -> Coalesce
where
    St: futures::Stream<Item = Result<ChangeSignal, StreamError>> + Unpin,
{
    if window.is_zero() {
        return Coalesce::Elapsed;
    }
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);
    let mut absorbed = 0u32;
    let outcome = loop {
        tokio::select! {
            _ = cancel.cancelled() => return Coalesce::Cancelled,
            _ = &mut deadline => break Coalesce::Elapsed,
            event = changes.next() => match event {
                Some(Ok(_)) => absorbed += 1,
                Some(Err(e)) => break Coalesce::Ended(Some(e)),
                None => break Coalesce::Ended(None),
            },
        }
    };
    if absorbed > 0 {
        debug!("coalesced {absorbed} extra signals into one re-fetch");
    }
    outcome
}

fn transition(state: &watch::Sender<ChannelState>, next: ChannelState) {
    let previous = *state.borrow();
    if previous != next {
        debug!("change channel {previous} -> {next}");
        state.send_replace(next);
    }
}
