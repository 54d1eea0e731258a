use std::cmp::Ordering;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScoreFileError;

pub const MAX_SCORES: usize = 10;
pub const MAX_NAME_LEN: usize = 12;
const FILE_NAME: &str = "galaga.scores";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
}

impl ScoreEntry {
    pub fn new(name: &str, score: u32, level: u32) -> Self {
        Self {
            name: name.to_string(),
            score,
            level,
        }
    }
}

/// Ways the table can be listed. The stored table is always kept in
/// [`SortOrder::ScoreNameLevel`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    ScoreNameLevel,
    NameScoreLevel,
    LevelScoreName,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::ScoreNameLevel,
            SortOrder::NameScoreLevel,
            SortOrder::LevelScoreName,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            SortOrder::ScoreNameLevel => "Score / Name / Level",
            SortOrder::NameScoreLevel => "Name / Score / Level",
            SortOrder::LevelScoreName => "Level / Score / Name",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|o| *o == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn compare(&self, a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
        match self {
            SortOrder::ScoreNameLevel => b
                .score
                .cmp(&a.score)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| b.level.cmp(&a.level)),
            SortOrder::NameScoreLevel => a
                .name
                .cmp(&b.name)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| b.level.cmp(&a.level)),
            SortOrder::LevelScoreName => b
                .level
                .cmp(&a.level)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// Trims a typed name and caps its length. `None` for a blank name.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// The top-ten table, mirrored to a JSON Lines file.
#[derive(Clone, Debug)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
    path: PathBuf,
}

impl HighScores {
    /// Loads the table at `path`. A missing or unreadable file is an empty
    /// table; corrupted lines are skipped.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read high scores, starting empty");
                Vec::new()
            }
        };
        let mut hs = HighScores { entries, path };
        hs.sort_and_truncate();
        hs
    }

    pub fn default_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(FILE_NAME);
            }
        }
        PathBuf::from(FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Vec<ScoreEntry>, ScoreFileError> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ScoreEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = lineno + 1, error = %e, "skipping corrupted high-score line"),
            }
        }
        Ok(entries)
    }

    pub fn save(&self) -> Result<(), ScoreFileError> {
        let mut buf = Vec::new();
        for entry in &self.entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.write_all(b"\n")?;
        }
        fs::write(&self.path, &buf)?;
        Ok(())
    }

    fn sort_and_truncate(&mut self) {
        self.entries
            .sort_by(|a, b| SortOrder::ScoreNameLevel.compare(a, b));
        self.entries.truncate(MAX_SCORES);
    }

    /// Whether `score` could earn a place in the table. A tie with the
    /// lowest entry qualifies; the name then decides who stays.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_SCORES
            || self.entries.last().is_some_and(|lowest| score >= lowest.score)
    }

    /// Inserts a score and persists the table. Returns whether the entry
    /// made the top ten. Blank names are refused.
    pub fn add_new_score(&mut self, name: &str, score: u32, level: u32) -> bool {
        let Some(name) = normalize_name(name) else { return false };
        let entry = ScoreEntry::new(&name, score, level);
        self.entries.push(entry.clone());
        self.sort_and_truncate();

        let kept = self.entries.contains(&entry);
        match self.save() {
            Ok(()) => info!(%name, score, level, "high score saved"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "could not save high scores"),
        }
        kept
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn sorted_by(&self, order: SortOrder) -> Vec<ScoreEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| order.compare(a, b));
        entries
    }
}
