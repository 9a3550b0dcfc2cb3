use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::solver::Placement;
use crate::render::fingerprint::MemeId;
use crate::text::style::TextStyle;

/// Number of recent images kept when nothing else is configured.
pub const DEFAULT_HISTORY_CAP: usize = 10;
/// Number of meme versions kept when nothing else is configured.
pub const DEFAULT_VERSION_CAP: usize = 50;
/// Number of edit actions kept when nothing else is configured.
pub const DEFAULT_EDIT_LOG_CAP: usize = 200;

/// Library settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LibraryOpts {
    /// Maximum entries in the recent-image and random-meme rings.
    pub history_cap: usize,
    /// Maximum entries in the version history.
    pub version_cap: usize,
    /// Maximum entries in the edit log.
    pub edit_log_cap: usize,
}

impl Default for LibraryOpts {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            version_cap: DEFAULT_VERSION_CAP,
            edit_log_cap: DEFAULT_EDIT_LOG_CAP,
        }
    }
}

/// A meme written to disk.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedMeme {
    /// Content id of the exported pixels.
    pub id: MemeId,
    /// Where it was written.
    pub path: PathBuf,
    /// Source image.
    pub source: PathBuf,
    /// Top band caption, possibly empty.
    #[serde(default)]
    pub top_text: String,
    /// Bottom band caption, possibly empty.
    #[serde(default)]
    pub bottom_text: String,
    /// Filter name, see [`crate::FilterKind::name`].
    #[serde(default)]
    pub filter: String,
    /// Export time.
    pub created_at: DateTime<Utc>,
}

/// A generated random meme.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomMemeRecord {
    /// Source image.
    pub image: PathBuf,
    /// Top caption, possibly empty.
    pub top_text: String,
    /// Bottom caption, possibly empty.
    pub bottom_text: String,
    /// Filter name.
    pub filter: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

/// What a meme looked like at one point of its editing history.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VersionContent {
    /// Source image.
    pub image: PathBuf,
    /// Top caption, possibly empty.
    #[serde(default)]
    pub top_text: String,
    /// Bottom caption, possibly empty.
    #[serde(default)]
    pub bottom_text: String,
    /// Font, size, fill and outline of the captions.
    #[serde(default)]
    pub style: TextStyle,
    /// Filter name.
    #[serde(default)]
    pub filter: String,
}

/// One entry of the version history. `parent` links to the version it was edited from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MemeVersion {
    /// Library-wide sequence number, never reused.
    pub id: u64,
    /// Version this one was derived from.
    pub parent: Option<u64>,
    /// Snapshot.
    pub content: VersionContent,
    /// Recording time.
    pub created_at: DateTime<Utc>,
}

/// One logged editing step on a version.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditAction {
    /// Version the action applies to.
    pub version: u64,
    /// Short action name such as `caption` or `filter`.
    pub action: String,
    /// Free-form details.
    pub details: Option<String>,
    /// Logging time.
    pub edited_at: DateTime<Utc>,
}

/// Per-meme counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemeUsage {
    /// Times shown.
    pub views: u64,
    /// Times exported or copied.
    pub downloads: u64,
    /// Times liked.
    pub likes: u64,
}

/// Kind of usage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageEvent {
    /// Shown.
    View,
    /// Exported or copied.
    Download,
    /// Liked.
    Like,
}

/// Last caption style used per band.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StylePrefs {
    /// Top band.
    pub top: Option<TextStyle>,
    /// Bottom band.
    pub bottom: Option<TextStyle>,
}

/// Aggregate numbers for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LibraryStats {
    /// Memes produced since the library was created.
    pub memes_created: u64,
    /// Entries in the saved list.
    pub saved_memes: usize,
    /// Entries in the recent-image ring.
    pub recent_images: usize,
    /// Retained entries of the version history.
    pub versions: usize,
    /// Sum of views.
    pub total_views: u64,
    /// Sum of downloads.
    pub total_downloads: u64,
    /// Sum of likes.
    pub total_likes: u64,
}

/// Everything the generator remembers between runs, stored as one JSON file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemeLibrary {
    /// Recently opened images, newest first.
    pub recent_images: VecDeque<PathBuf>,
    /// Exported memes in export order.
    pub saved_memes: Vec<SavedMeme>,
    /// Recently generated random memes, newest first.
    pub random_memes: VecDeque<RandomMemeRecord>,
    /// Last style per band.
    pub styles: StylePrefs,
    /// Memes produced since the library was created.
    pub memes_created: u64,
    /// Counters keyed by meme id.
    pub usage: BTreeMap<MemeId, MemeUsage>,
    /// Version history, newest first.
    pub versions: VecDeque<MemeVersion>,
    /// Id handed to the next recorded version.
    pub next_version: u64,
    /// Edit log, newest first.
    pub edits: VecDeque<EditAction>,
}

impl MemeLibrary {
    /// Read a library file.
    pub fn load(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read library '{}'", path.display()))?;
        serde_json::from_str(&s).map_err(|err| {
            MemeError::serde(format!("parse library '{}': {err}", path.display()))
        })
    }

    /// Read a library file, or start empty when it does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no library yet, starting empty");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the library next to `path` and move it into place.
    pub fn save(&self, path: impl AsRef<Path>) -> MemeResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("replace library '{}'", path.display()))?;
        Ok(())
    }

    /// Put `path` at the front of the recent-image ring, dropping the oldest entries
    /// beyond the cap. A path already in the ring moves to the front.
    pub fn add_recent_image(&mut self, path: impl Into<PathBuf>, opts: &LibraryOpts) {
        let path = path.into();
        self.recent_images.retain(|p| p != &path);
        self.recent_images.push_front(path);
        self.recent_images.truncate(opts.history_cap);
    }

    /// Record a random meme, newest first, bounded like the image ring.
    pub fn add_random_meme(&mut self, record: RandomMemeRecord, opts: &LibraryOpts) {
        self.random_memes.push_front(record);
        self.random_memes.truncate(opts.history_cap);
    }

    /// Up to `limit` random memes, newest first.
    pub fn random_history(&self, limit: usize) -> impl Iterator<Item = &RandomMemeRecord> {
        self.random_memes.iter().take(limit)
    }

    /// Snapshot `content` as a new version derived from `parent` and return its id.
    ///
    /// The oldest versions are dropped beyond `opts.version_cap`. A parent that was never
    /// issued is rejected; one that has since been dropped is still accepted.
    pub fn record_version(
        &mut self,
        content: VersionContent,
        parent: Option<u64>,
        opts: &LibraryOpts,
    ) -> MemeResult<u64> {
        if let Some(parent) = parent {
            self.check_version(parent)?;
        }
        let id = self.next_version;
        self.next_version += 1;
        self.versions.push_front(MemeVersion {
            id,
            parent,
            content,
            created_at: Utc::now(),
        });
        self.versions.truncate(opts.version_cap);
        tracing::debug!(id, ?parent, "recorded meme version");
        Ok(id)
    }

    /// Up to `limit` versions, newest first.
    pub fn versions(&self, limit: usize) -> impl Iterator<Item = &MemeVersion> {
        self.versions.iter().take(limit)
    }

    /// Retained version with `id`.
    pub fn version(&self, id: u64) -> Option<&MemeVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// `id` followed by its retained ancestors, nearest first. Stops at the first
    /// ancestor no longer in the history.
    pub fn lineage(&self, id: u64) -> Vec<&MemeVersion> {
        let mut chain = Vec::new();
        let mut next = self.version(id);
        while let Some(v) = next {
            chain.push(v);
            // Parents always have smaller ids, so the walk terminates.
            next = v.parent.and_then(|p| self.version(p));
        }
        chain
    }

    /// Append an editing step for `version`, dropping the oldest beyond `opts.edit_log_cap`.
    pub fn log_edit(
        &mut self,
        version: u64,
        action: impl Into<String>,
        details: Option<String>,
        opts: &LibraryOpts,
    ) -> MemeResult<()> {
        self.check_version(version)?;
        let action = action.into();
        if action.trim().is_empty() {
            return Err(MemeError::invalid_input("edit action must be non-empty"));
        }
        self.edits.push_front(EditAction {
            version,
            action,
            details,
            edited_at: Utc::now(),
        });
        self.edits.truncate(opts.edit_log_cap);
        Ok(())
    }

    /// Up to `limit` edit actions, newest first.
    pub fn edits(&self, limit: usize) -> impl Iterator<Item = &EditAction> {
        self.edits.iter().take(limit)
    }

    /// Retained edit actions of one version, newest first.
    pub fn edits_of(&self, version: u64) -> impl Iterator<Item = &EditAction> {
        self.edits.iter().filter(move |e| e.version == version)
    }

    fn check_version(&self, id: u64) -> MemeResult<()> {
        if id >= self.next_version {
            return Err(MemeError::invalid_input(format!("unknown meme version {id}")));
        }
        Ok(())
    }

    /// Record an export and bump the created counter and the meme's downloads.
    pub fn record_saved(&mut self, meme: SavedMeme) {
        self.memes_created += 1;
        self.record_usage(meme.id, UsageEvent::Download);
        self.saved_memes.push(meme);
    }

    /// Bump one counter of `id`.
    pub fn record_usage(&mut self, id: MemeId, event: UsageEvent) -> MemeUsage {
        let usage = self.usage.entry(id).or_default();
        match event {
            UsageEvent::View => usage.views += 1,
            UsageEvent::Download => usage.downloads += 1,
            UsageEvent::Like => usage.likes += 1,
        }
        *usage
    }

    /// Counters of `id`; zero when never seen.
    pub fn usage_of(&self, id: MemeId) -> MemeUsage {
        self.usage.get(&id).copied().unwrap_or_default()
    }

    /// Remember `style` as the last one used for `placement`.
    pub fn remember_style(&mut self, placement: Placement, style: TextStyle) {
        match placement {
            Placement::Top => self.styles.top = Some(style),
            Placement::Bottom => self.styles.bottom = Some(style),
        }
    }

    /// Last style used for `placement`.
    pub fn last_style(&self, placement: Placement) -> Option<&TextStyle> {
        match placement {
            Placement::Top => self.styles.top.as_ref(),
            Placement::Bottom => self.styles.bottom.as_ref(),
        }
    }

    /// Aggregates over the whole library.
    pub fn stats(&self) -> LibraryStats {
        let mut stats = LibraryStats {
            memes_created: self.memes_created,
            saved_memes: self.saved_memes.len(),
            recent_images: self.recent_images.len(),
            versions: self.versions.len(),
            ..LibraryStats::default()
        };
        for u in self.usage.values() {
            stats.total_views += u.views;
            stats.total_downloads += u.downloads;
            stats.total_likes += u.likes;
        }
        stats
    }

    /// Per-meme report as CSV, one row per counted meme:
    /// `meme_id,top_text,bottom_text,created_at,views,downloads,likes`.
    ///
    /// Captions and date come from the first save of the meme and are empty when it was
    /// never saved. Fields holding commas, quotes or line breaks are quoted.
    pub fn usage_csv(&self) -> String {
        let mut out =
            String::from("meme_id,top_text,bottom_text,created_at,views,downloads,likes\n");
        for (id, u) in &self.usage {
            let saved = self.saved_memes.iter().find(|m| m.id == *id);
            let (top, bottom, date) = match saved {
                Some(m) => (
                    m.top_text.as_str(),
                    m.bottom_text.as_str(),
                    m.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                None => ("", "", String::new()),
            };
            out.push_str(&format!(
                "{id},{},{},{date},{},{},{}\n",
                csv_field(top),
                csv_field(bottom),
                u.views,
                u.downloads,
                u.likes
            ));
        }
        out
    }
}

fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/store.rs"]
mod tests;
