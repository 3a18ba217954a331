use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use super::document::{Document, GuildRecord, LocalLog, generate_log_id};

/// File-backed store for the offline document.
///
/// Every operation reads the whole document, mutates it, and writes it
/// back; the document is small and the store is the only writer.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty document.
    pub fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(doc).context("failed to serialize document")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    // ── Guilds ──────────────────────────────────────────────────────

    /// Names of all stored guilds.
    pub fn guild_names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.guilds.keys().cloned().collect())
    }

    /// Load a guild record, or a fresh empty one if it doesn't exist yet.
    pub fn load_guild(&self, name: &str) -> Result<GuildRecord> {
        Ok(self
            .load()?
            .guilds
            .get(name)
            .cloned()
            .unwrap_or_else(|| GuildRecord::new(name)))
    }

    /// Store a guild record under the given name, replacing any existing one.
    pub fn save_guild(&self, name: &str, record: GuildRecord) -> Result<()> {
        let mut doc = self.load()?;
        doc.guilds.insert(name.to_string(), record);
        self.save(&doc)
    }

    /// Create an empty guild.
    pub fn create_guild(&self, name: &str) -> Result<GuildRecord> {
        let record = GuildRecord::new(name);
        self.save_guild(name, record.clone())?;
        Ok(record)
    }

    /// Delete a guild and everything in it.
    pub fn delete_guild(&self, name: &str) -> Result<()> {
        let mut doc = self.load()?;
        doc.guilds.remove(name);
        self.save(&doc)
    }

    // ── Channels ────────────────────────────────────────────────────

    /// Names of all channels in a guild.
    pub fn channel_names(&self, guild: &str) -> Result<Vec<String>> {
        Ok(self.load_guild(guild)?.channels.keys().cloned().collect())
    }

    /// Create an empty channel in a guild.
    pub fn create_channel(&self, guild: &str, channel: &str) -> Result<()> {
        let mut record = self.load_guild(guild)?;
        record.channels.entry(channel.to_string()).or_default();
        self.save_guild(guild, record)
    }

    /// Delete a channel and its logs.
    pub fn delete_channel(&self, guild: &str, channel: &str) -> Result<()> {
        let mut record = self.load_guild(guild)?;
        record.channels.remove(channel);
        self.save_guild(guild, record)
    }

    // ── Logs ────────────────────────────────────────────────────────

    /// All logs in a channel, oldest-first. Unknown channels are empty.
    pub fn logs(&self, guild: &str, channel: &str) -> Result<Vec<LocalLog>> {
        Ok(self
            .load_guild(guild)?
            .channels
            .get(channel)
            .cloned()
            .unwrap_or_default())
    }

    /// Append a log to a channel, creating the channel if needed.
    pub fn append_log(&self, guild: &str, channel: &str, content: &str) -> Result<LocalLog> {
        let mut record = self.load_guild(guild)?;
        let log = LocalLog {
            id: generate_log_id(),
            timestamp: Utc::now(),
            content: content.to_string(),
        };
        record
            .channels
            .entry(channel.to_string())
            .or_default()
            .push(log.clone());
        self.save_guild(guild, record)?;
        Ok(log)
    }

    /// Delete a log from a channel by id.
    pub fn delete_log(&self, guild: &str, channel: &str, log_id: &str) -> Result<()> {
        let mut record = self.load_guild(guild)?;
        if let Some(logs) = record.channels.get_mut(channel) {
            logs.retain(|log| log.id != log_id);
            self.save_guild(guild, record)?;
        }
        Ok(())
    }

    // ── Export / import ─────────────────────────────────────────────

    /// Write the whole document to `dest` as pretty-printed JSON.
    pub fn export_to(&self, dest: &Path) -> Result<()> {
        let doc = self.load()?;
        let contents =
            serde_json::to_string_pretty(&doc).context("failed to serialize document")?;
        fs::write(dest, contents)
            .with_context(|| format!("failed to write {}", dest.display()))?;
        info!(dest = %dest.display(), "exported offline data");
        Ok(())
    }

    /// Replace the whole document with the contents of `src`.
    ///
    /// The file is parsed before anything is written, so an invalid file
    /// rejects the import and leaves stored data untouched.
    pub fn import_from(&self, src: &Path) -> Result<Document> {
        let contents = fs::read_to_string(src)
            .with_context(|| format!("failed to read {}", src.display()))?;
        let doc: Document = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a valid data file", src.display()))?;
        self.save(&doc)?;
        info!(src = %src.display(), guilds = doc.guilds.len(), "imported offline data");
        Ok(doc)
    }

    // ── Seeding ─────────────────────────────────────────────────────

    /// Seed two starter guilds when the store is empty. Returns whether
    /// anything was written.
    pub fn seed_defaults(&self) -> Result<bool> {
        let mut doc = self.load()?;
        if !doc.guilds.is_empty() {
            return Ok(false);
        }

        let mut work = GuildRecord::new("Work");
        for channel in ["Coding", "Ideas", "Meetings"] {
            work.channels.insert(channel.to_string(), Vec::new());
        }

        let mut personal = GuildRecord::new("Personal");
        for channel in ["Thoughts", "Ideas", "Journal"] {
            personal.channels.insert(channel.to_string(), Vec::new());
        }

        doc.guilds.insert("Work".to_string(), work);
        doc.guilds.insert("Personal".to_string(), personal);
        self.save(&doc)?;
        info!("seeded default guilds");
        Ok(true)
    }
}
