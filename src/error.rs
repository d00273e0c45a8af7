// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Mistakes in the static configuration. Raised before the terminal is
/// touched and always fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("expected {expected} panels, got {got}")]
    PanelCount { expected: usize, got: usize },

    #[error("panel id at position {0} is empty")]
    EmptyPanelId(usize),

    #[error("duplicate panel id: {0}")]
    DuplicatePanel(String),

    #[error("default panel {0} is not one of the registered panels")]
    UnknownDefaultPanel(String),

    #[error("expected {expected} navigation bindings, got {got}")]
    BindingCount { expected: usize, got: usize },

    #[error("duplicate trigger id: {0}")]
    DuplicateTrigger(String),

    #[error("panel {0} is bound to more than one trigger")]
    PanelBoundTwice(String),

    #[error("trigger {trigger} is bound to unregistered panel {panel}")]
    UnregisteredPanel { trigger: String, panel: String },

    #[error("content given for unregistered panel {0}")]
    UnknownContentPanel(String),

    #[error("invalid color: {0} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("failed to apply {name} {value} (must be within {min} and {max})")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("unsupported charset: {0} (see --list-charsets)")]
    UnknownCharset(String),

    #[error("invalid --chars: {0}")]
    InvalidChars(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install logger: {0}")]
    Logging(String),
}
