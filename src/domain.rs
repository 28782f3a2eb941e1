use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum LeadsError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    MissingColumn(String),
    InvalidId(String),
    DuplicateId(u32),
    UnknownStatus(String),
    InvalidConfig(String),
}

impl fmt::Display for LeadsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadsError::IoError(e) => write!(f, "io error: {e}"),
            LeadsError::PolarsError(e) => write!(f, "could not read records: {e}"),
            LeadsError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            LeadsError::FileNotFound => write!(f, "file not found"),
            LeadsError::PermissionDenied => write!(f, "permission denied"),
            LeadsError::UnknownFileType => write!(f, "unknown file type"),
            LeadsError::MissingColumn(name) => write!(f, "missing column \"{name}\""),
            LeadsError::InvalidId(id) => write!(f, "invalid lead id \"{id}\""),
            LeadsError::DuplicateId(id) => write!(f, "duplicate lead id {id}"),
            LeadsError::UnknownStatus(s) => write!(f, "unknown lead status \"{s}\""),
            LeadsError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for LeadsError {}

impl From<Error> for LeadsError {
    fn from(err: Error) -> Self {
        LeadsError::IoError(err)
    }
}

impl From<PolarsError> for LeadsError {
    fn from(err: PolarsError) -> Self {
        LeadsError::PolarsError(err)
    }
}

#[derive(Debug, Clone)]
pub struct LeadsConfig {
    pub event_poll_time: u64,
    pub data_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            data_path: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    Enter,
    NextPage,
    PrevPage,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    MoveLeft,
    MoveRight,
    Search,
    CycleOwner,
    CycleOrigin,
    CycleStatus,
    CyclePeriod,
    ToggleRow,
    ToggleAll,
    RowMenu,
    CopyEmail,
    CopyPhone,
    Resize(u16, u16),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  Tab / Shift-Tab   next / previous page
  q                 quit
  ?                 this help, Esc closes

Leads
  j / k             move cursor down / up
  PgDn / PgUp       move by a page
  g / G             first / last lead
  h / l             previous / next status tab
  /                 search name or e-mail, Enter keeps, Esc clears
  o / s / S / p     cycle owner / origin / status / period filter
  Space             select lead under cursor
  a                 select all visible leads / clear selection
  Enter             open lead details
  m                 row menu, Enter picks an item
  y / Y             copy e-mail / phone to clipboard

Campaigns
  h / l             previous / next wizard step
";
