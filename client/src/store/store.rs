use std::sync::RwLock;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::logs::UploadFile;
use crate::api::models::{Channel, Guild, Log};
use crate::api::{ApiClient, ApiError, channels, guilds, logs};

use super::state::{AppState, SubscriberId};

/// The application state store: the single owner of UI-observable state.
///
/// Operations call the resource API, then mutate the state snapshot and
/// notify subscribers. Mutations go through [`StateStore::update`], which
/// applies them to the live state under the lock, so an operation that
/// suspended on the network never appends to a stale copy of a container.
///
/// Independent concurrent operations are not serialized against each
/// other; the last write to the snapshot wins. The lock is never held
/// across an await point.
pub struct StateStore {
    api: ApiClient,
    state: RwLock<AppState>,
    subscribers: DashMap<SubscriberId, mpsc::UnboundedSender<AppState>>,
}

/// Clears the loading flag when dropped, so the flag is released on every
/// exit path of an operation, success or failure.
struct LoadingGuard<'a> {
    store: &'a StateStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.update(|s| s.loading = false);
    }
}

impl StateStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(AppState::default()),
            subscribers: DashMap::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Clone of the current snapshot.
    pub fn state(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// Register a subscriber. The receiver gets a cloned snapshot after
    /// every state change.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<AppState>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!(subscriber_id = %id, "subscriber attached");
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.remove(&id);
        debug!(subscriber_id = %id, "subscriber detached");
    }

    /// Apply a mutation to the live state, then fan the resulting
    /// snapshot out to subscribers. Subscribers whose receiver is gone
    /// are pruned here.
    fn update(&self, mutate: impl FnOnce(&mut AppState)) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            mutate(&mut state);
            state.clone()
        };
        self.subscribers
            .retain(|_, tx| tx.send(snapshot.clone()).is_ok());
    }

    /// Start a mutating operation: loading on, previous error cleared.
    fn begin(&self) -> LoadingGuard<'_> {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { store: self }
    }

    /// Start an operation that tracks loading but keeps the error slot.
    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.update(|s| s.loading = true);
        LoadingGuard { store: self }
    }

    /// Record a failure into the shared error slot.
    fn fail(&self, what: &str, err: &ApiError) {
        error!(error = %err, status = err.status, "{what} failed");
        self.update(|s| s.error = Some(err.to_string()));
    }

    // ── Loading cascades ────────────────────────────────────────────

    /// Fetch all guilds; when any exist, select the first and cascade
    /// into loading its channels (and from there the first channel's
    /// logs).
    pub async fn load_initial_data(&self) -> Result<(), ApiError> {
        let _guard = self.begin();

        let guild_list = match guilds::list(&self.api).await {
            Ok(list) => list,
            Err(e) => {
                self.fail("initial load", &e);
                return Err(e);
            }
        };

        let first = guild_list.first().cloned();
        self.update(|s| s.guilds = guild_list);

        if let Some(guild) = first {
            self.update(|s| s.current_guild = Some(guild.clone()));
            // Failure is recorded downstream; don't re-record here.
            self.load_guild_channels(guild.id).await?;
        }
        Ok(())
    }

    /// Fetch a guild's channels; select the first and cascade into its
    /// logs, or clear the dependent containers when the guild is empty.
    pub async fn load_guild_channels(&self, guild_id: i64) -> Result<(), ApiError> {
        let _guard = self.begin();

        let channel_list = match channels::list_for_guild(&self.api, guild_id).await {
            Ok(list) => list,
            Err(e) => {
                self.fail("loading channels", &e);
                return Err(e);
            }
        };

        let first = channel_list.first().cloned();
        self.update(|s| s.channels = channel_list);

        match first {
            Some(channel) => {
                self.update(|s| s.current_channel = Some(channel.clone()));
                self.load_channel_logs(channel.id).await?;
            }
            None => {
                // Empty guild: clear dependents rather than leaving the
                // previous channel's logs on screen.
                self.update(|s| {
                    s.logs.clear();
                    s.current_channel = None;
                });
            }
        }
        Ok(())
    }

    /// Fetch a channel's logs and replace the logs container. The service
    /// returns newest-first; the container holds oldest-first.
    pub async fn load_channel_logs(&self, channel_id: i64) -> Result<(), ApiError> {
        self.update(|s| s.error = None);

        match logs::list_for_channel(&self.api, channel_id).await {
            Ok(mut log_list) => {
                log_list.reverse();
                self.update(|s| s.logs = log_list);
                Ok(())
            }
            Err(e) => {
                self.fail("loading logs", &e);
                // Reset instead of leaving stale logs from another channel.
                self.update(|s| s.logs = Vec::new());
                Err(e)
            }
        }
    }

    // ── Selection ───────────────────────────────────────────────────

    pub async fn set_active_guild(&self, guild: Guild) -> Result<(), ApiError> {
        let guild_id = guild.id;
        self.update(|s| s.current_guild = Some(guild));
        self.load_guild_channels(guild_id).await
    }

    pub async fn set_active_channel(&self, channel: Channel) -> Result<(), ApiError> {
        let channel_id = channel.id;
        let _guard = self.begin_loading();
        self.update(|s| s.current_channel = Some(channel));
        self.load_channel_logs(channel_id).await
    }

    // ── Guild mutations ─────────────────────────────────────────────

    pub async fn create_guild(&self, name: &str) -> Result<Guild, ApiError> {
        let _guard = self.begin();
        match guilds::create(&self.api, name).await {
            Ok(guild) => {
                info!(guild_id = guild.id, name = %guild.name, "guild created");
                self.update(|s| s.guilds.push(guild.clone()));
                Ok(guild)
            }
            Err(e) => {
                self.fail("creating guild", &e);
                Err(e)
            }
        }
    }

    /// Delete a guild. When the deleted guild was the active one, hand
    /// the selection to the next remaining guild (reloading its
    /// channels), or clear the selection and all dependent containers
    /// when none are left.
    pub async fn delete_guild(&self, guild_id: i64) -> Result<(), ApiError> {
        let next = {
            let _guard = self.begin();
            if let Err(e) = guilds::delete(&self.api, guild_id).await {
                self.fail("deleting guild", &e);
                return Err(e);
            }

            let mut was_active = false;
            let mut next = None;
            self.update(|s| {
                s.guilds.retain(|g| g.id != guild_id);
                was_active = s.current_guild.as_ref().is_some_and(|g| g.id == guild_id);
                if was_active {
                    next = s.guilds.first().cloned();
                }
            });
            info!(guild_id, was_active, "guild deleted");

            if !was_active {
                return Ok(());
            }
            next
        };

        match next {
            Some(guild) => self.set_active_guild(guild).await,
            None => {
                self.update(|s| {
                    s.current_guild = None;
                    s.channels.clear();
                    s.logs.clear();
                    s.current_channel = None;
                });
                Ok(())
            }
        }
    }

    // ── Channel mutations ───────────────────────────────────────────

    pub async fn create_channel(&self, guild_id: i64, name: &str) -> Result<Channel, ApiError> {
        let _guard = self.begin();
        match channels::create(&self.api, guild_id, name).await {
            Ok(channel) => {
                info!(channel_id = channel.id, name = %channel.name, "channel created");
                self.update(|s| s.channels.push(channel.clone()));
                Ok(channel)
            }
            Err(e) => {
                self.fail("creating channel", &e);
                Err(e)
            }
        }
    }

    /// Delete a channel, reassigning or clearing the selection when the
    /// deleted channel was the active one.
    pub async fn delete_channel(&self, channel_id: i64) -> Result<(), ApiError> {
        let next = {
            let _guard = self.begin();
            if let Err(e) = channels::delete(&self.api, channel_id).await {
                self.fail("deleting channel", &e);
                return Err(e);
            }

            let mut was_active = false;
            let mut next = None;
            self.update(|s| {
                s.channels.retain(|c| c.id != channel_id);
                was_active = s
                    .current_channel
                    .as_ref()
                    .is_some_and(|c| c.id == channel_id);
                if was_active {
                    next = s.channels.first().cloned();
                }
            });
            info!(channel_id, was_active, "channel deleted");

            if !was_active {
                return Ok(());
            }
            next
        };

        match next {
            Some(channel) => self.set_active_channel(channel).await,
            None => {
                self.update(|s| {
                    s.logs.clear();
                    s.current_channel = None;
                });
                Ok(())
            }
        }
    }

    // ── Log mutations ───────────────────────────────────────────────

    /// Create a log, then best-effort attach files to it.
    ///
    /// The upload is a second phase keyed by the new log's id; its
    /// failure never fails the creation. The log just ends up with no
    /// attachments.
    pub async fn create_log(
        &self,
        channel_id: i64,
        content: &str,
        files: Vec<UploadFile>,
    ) -> Result<Log, ApiError> {
        let _guard = self.begin();

        let mut log = match logs::create(&self.api, channel_id, content).await {
            Ok(log) => log,
            Err(e) => {
                self.fail("creating log", &e);
                return Err(e);
            }
        };

        if files.is_empty() {
            log.files = Vec::new();
        } else {
            match logs::upload_files(&self.api, log.id, files).await {
                Ok(metas) => log.files = metas,
                Err(e) => {
                    warn!(log_id = log.id, error = %e, "file upload failed, keeping log without attachments");
                    log.files = Vec::new();
                }
            }
        }

        // Appends to whatever the container holds now, not a snapshot
        // captured before the awaits above.
        self.update(|s| s.logs.push(log.clone()));
        Ok(log)
    }

    pub async fn delete_log(&self, log_id: i64) -> Result<(), ApiError> {
        let _guard = self.begin();
        match logs::delete(&self.api, log_id).await {
            Ok(()) => {
                self.update(|s| s.logs.retain(|l| l.id != log_id));
                Ok(())
            }
            Err(e) => {
                self.fail("deleting log", &e);
                Err(e)
            }
        }
    }

    // ── UI flags ────────────────────────────────────────────────────

    pub fn toggle_sidebar(&self) {
        self.update(|s| s.sidebar_open = !s.sidebar_open);
    }

    pub fn close_sidebar(&self) {
        self.update(|s| s.sidebar_open = false);
    }

    /// Record the search query. The store does not filter the logs
    /// container; filtering happens at presentation time.
    pub fn search_logs(&self, query: &str) {
        self.update(|s| s.search_query = query.to_string());
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }
}
