mod achievement;
mod ids;
mod question;
mod session;
mod stats;

pub use achievement::{Achievement, AchievementCatalog, AchievementId};
pub use ids::{HistoryEntryId, ParseIdError, QuestionId, RunId};
pub use question::{
    Points, Question, QuestionDraft, QuestionError, ValidatedQuestion, next_step, renumber,
};
pub use session::{CapturedImage, CompletedSession, CompletedSessionError, RunTally};
pub use stats::{HISTORY_LIMIT, History, HistoryEntry, Statistics};
