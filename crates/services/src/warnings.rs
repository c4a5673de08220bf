use std::fmt;

/// Which persisted blob a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSet {
    Questions,
    Statistics,
    History,
}

impl DataSet {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DataSet::Questions => "questions",
            DataSet::Statistics => "statistics",
            DataSet::History => "history",
        }
    }
}

/// A persistence problem that was recovered from by falling back to defaults.
///
/// The run continues; the presentation layer should show these as non-fatal
/// notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub data_set: DataSet,
    pub message: String,
}

impl LoadWarning {
    pub(crate) fn new(data_set: DataSet, err: impl fmt::Display) -> Self {
        let warning = Self {
            data_set,
            message: err.to_string(),
        };
        tracing::warn!(data_set = data_set.as_str(), error = %warning.message, "using defaults");
        warning
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} could not be loaded, using defaults: {}",
            self.data_set.as_str(),
            self.message
        )
    }
}
