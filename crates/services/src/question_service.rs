use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use qrlearn_core::model::{Question, QuestionDraft, QuestionId, next_step, renumber};
use storage::Gateway;

use crate::Clock;
use crate::error::QuestionServiceError;
use crate::warnings::{DataSet, LoadWarning};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 5;

/// Owns the ordered challenge list and persists it after every change.
///
/// Mutations are all-or-nothing: the new list is built on the side, saved,
/// and only then swapped in. A failed save leaves the in-memory list as it was.
pub struct QuestionService {
    clock: Clock,
    gateway: Arc<Gateway>,
    seed: Vec<Question>,
    questions: Vec<Question>,
}

impl QuestionService {
    /// Create a service with an empty list. Call [`load`](Self::load) before use.
    #[must_use]
    pub fn new(clock: Clock, gateway: Arc<Gateway>, seed: Vec<Question>) -> Self {
        Self {
            clock,
            gateway,
            seed,
            questions: Vec::new(),
        }
    }

    /// Load the stored list, seeding it on first run.
    ///
    /// Never fails: a missing list is replaced by the seed and persisted; an
    /// unreadable list or a failed seed write falls back to the seed in memory
    /// and returns a warning.
    pub async fn load(&mut self) -> Option<LoadWarning> {
        match self.gateway.load_questions().await {
            Ok(Some(mut stored)) => {
                renumber(&mut stored);
                tracing::info!(count = stored.len(), "questions loaded");
                self.questions = stored;
                None
            }
            Ok(None) => {
                self.questions = self.seed_list();
                match self.gateway.save_questions(&self.questions).await {
                    Ok(()) => {
                        tracing::info!(count = self.questions.len(), "seeded default questions");
                        None
                    }
                    Err(err) => Some(LoadWarning::new(DataSet::Questions, err)),
                }
            }
            Err(err) => {
                self.questions = self.seed_list();
                Some(LoadWarning::new(DataSet::Questions, err))
            }
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Validate a draft and append it as the last step.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Question` for validation failures.
    /// Returns `QuestionServiceError::Storage` if persistence fails.
    pub async fn add(&mut self, draft: QuestionDraft) -> Result<Question, QuestionServiceError> {
        let content = draft.validate()?;
        let id = self.fresh_id(self.clock.now());
        let question = content.assign(id, next_step(self.questions.len()));

        let mut next = self.questions.clone();
        next.push(question.clone());
        self.commit(next).await?;

        tracing::info!(id = %question.id(), step = question.step(), "question added");
        Ok(question)
    }

    /// Replace the content of an existing question, keeping its id and step.
    ///
    /// Returns `Ok(false)` when no question has the given id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Question` for validation failures.
    /// Returns `QuestionServiceError::Storage` if persistence fails.
    pub async fn update(
        &mut self,
        id: &QuestionId,
        draft: QuestionDraft,
    ) -> Result<bool, QuestionServiceError> {
        let content = draft.validate()?;
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.questions.clone();
        let existing = next.remove(index);
        next.insert(index, existing.with_content(content));
        self.commit(next).await?;

        tracing::info!(%id, "question updated");
        Ok(true)
    }

    /// Remove a question and close the gap in step numbers.
    ///
    /// Returns `Ok(false)` when no question has the given id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Storage` if persistence fails.
    pub async fn delete(&mut self, id: &QuestionId) -> Result<bool, QuestionServiceError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.questions.clone();
        next.remove(index);
        renumber(&mut next);
        self.commit(next).await?;

        tracing::info!(%id, remaining = self.questions.len(), "question deleted");
        Ok(true)
    }

    /// Replace the whole list with the built-in seed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Storage` if persistence fails.
    pub async fn reset_to_default(&mut self) -> Result<(), QuestionServiceError> {
        self.commit(self.seed_list()).await?;
        tracing::info!(count = self.questions.len(), "questions reset to default");
        Ok(())
    }

    async fn commit(&mut self, next: Vec<Question>) -> Result<(), QuestionServiceError> {
        self.gateway.save_questions(&next).await?;
        self.questions = next;
        Ok(())
    }

    fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    fn seed_list(&self) -> Vec<Question> {
        let mut seed = self.seed.clone();
        renumber(&mut seed);
        seed
    }

    /// `q<epoch millis><5 base36 chars>`, retried until unused.
    fn fresh_id(&self, now: DateTime<Utc>) -> QuestionId {
        let mut rng = rand::rng();
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
                .collect();
            let id = QuestionId::new(format!("q{}{suffix}", now.timestamp_millis()));
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}
