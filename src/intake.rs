//! File intake: turning dropped, pasted or typed input into accepted files.
//!
//! # Overview
//!
//! Terminals have no drop target. Dragging a file onto most terminal emulators
//! pastes its path instead, in one of several shapes:
//! - plain paths: `/home/me/scan.jpg`
//! - quoted paths: `'/home/me/my scan.jpg'` or `"C:\scans\a.png"`
//! - backslash-escaped spaces: `/home/me/my\ scan.jpg`
//! - URIs: `file:///home/me/my%20scan.jpg`
//!
//! [`parse_dropped_paths`] handles all of them. [`accept`] then applies the
//! intake policy: a single file, image types only. Anything else is not an
//! error; it is simply not accepted.

use std::path::{Path, PathBuf};

/// File extensions accepted for intake (lower-case).
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "dcm",
];

/// Where the bytes of an intake file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeSource {
    /// Read from the filesystem on acquisition.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Vec<u8>),
}

/// A file handed to the scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeFile {
    /// Display name (final path component).
    pub name: String,
    /// Byte source.
    pub source: IntakeSource,
}

impl IntakeFile {
    /// Intake file backed by a path. Returns `None` when the path has no file name.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            source: IntakeSource::Path(path),
        })
    }

    /// Intake file backed by in-memory bytes.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: IntakeSource::Bytes(bytes),
        }
    }

    /// Whether this file can be handed to a session (non-empty name).
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Whether `path` has an accepted image extension.
#[must_use]
pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Apply the intake policy: first path with an accepted extension wins.
#[must_use]
pub fn accept<I>(paths: I) -> Option<IntakeFile>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut rejected = 0usize;
    for path in paths {
        if has_accepted_extension(&path) {
            if rejected > 0 {
                log::debug!("Skipped {} unaccepted dropped path(s)", rejected);
            }
            return IntakeFile::from_path(path);
        }
        log::debug!("Not accepted for intake: {}", path.display());
        rejected += 1;
    }
    None
}

/// Split pasted or typed text into candidate paths.
#[must_use]
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for token in split_tokens(line) {
            if let Some(path) = token_to_path(&token) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Tokenize one line, honoring quotes and backslash-escaped spaces.
fn split_tokens(line: &str) -> Vec<String> {
    // A single unquoted token that exists as-is (e.g. a Windows path with
    // backslashes) must not be unescaped.
    if !line.starts_with(['\'', '"']) && Path::new(line).exists() {
        return vec![line.to_string()];
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => match chars.peek() {
                Some(&next) if next == ' ' || next == '\'' || next == '"' || next == '\\' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn token_to_path(token: &str) -> Option<PathBuf> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match token.strip_prefix("file://") {
        Some(rest) => {
            // file://host/path is not supported; only local absolute URIs.
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            Some(PathBuf::from(percent_decode(rest)))
        }
        None => Some(PathBuf::from(token)),
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
