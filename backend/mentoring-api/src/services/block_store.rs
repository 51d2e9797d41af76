use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::error::StoreError;
use crate::models::question::Question;
use crate::models::submission::StudentState;

/// Field persistence for authored blocks (shared scope) and student state (per-student scope).
#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn get_question(&self, block_id: &str) -> Result<Question, StoreError>;

    /// Stores a new block, refusing to overwrite an existing id.
    async fn insert_question(&self, question: Question) -> Result<(), StoreError>;

    /// Replaces an existing block.
    async fn save_question(&self, question: Question) -> Result<(), StoreError>;

    async fn count_questions(&self) -> usize;

    /// Finds the block owning a tip, used to resolve a tip's parent.
    async fn find_tip_parent(&self, tip_id: &str) -> Option<Question>;

    async fn get_student_state(
        &self,
        student_id: &str,
        block_id: &str,
    ) -> Result<Option<StudentState>, StoreError>;

    /// Overwrites the student's latest choice, no history is kept.
    async fn set_student_choice(
        &self,
        student_id: &str,
        block_id: &str,
        choice: &str,
    ) -> Result<StudentState, StoreError>;
}

#[derive(Default)]
pub struct InMemoryBlockStore {
    questions: RwLock<HashMap<String, Question>>,
    student_state: RwLock<HashMap<(String, String), StudentState>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn get_question(&self, block_id: &str) -> Result<Question, StoreError> {
        self.questions
            .read()
            .await
            .get(block_id)
            .cloned()
            .ok_or_else(|| StoreError::BlockNotFound(block_id.to_string()))
    }

    async fn insert_question(&self, question: Question) -> Result<(), StoreError> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(StoreError::BlockExists(question.id));
        }
        tracing::debug!("Inserting block {} ({})", question.id, question.kind.as_str());
        questions.insert(question.id.clone(), question);
        Ok(())
    }

    async fn save_question(&self, question: Question) -> Result<(), StoreError> {
        let mut questions = self.questions.write().await;
        match questions.get_mut(&question.id) {
            Some(slot) => {
                *slot = question;
                Ok(())
            }
            None => Err(StoreError::BlockNotFound(question.id)),
        }
    }

    async fn count_questions(&self) -> usize {
        self.questions.read().await.len()
    }

    async fn find_tip_parent(&self, tip_id: &str) -> Option<Question> {
        self.questions
            .read()
            .await
            .values()
            .find(|question| question.find_tip(tip_id).is_some())
            .cloned()
    }

    async fn get_student_state(
        &self,
        student_id: &str,
        block_id: &str,
    ) -> Result<Option<StudentState>, StoreError> {
        if !self.questions.read().await.contains_key(block_id) {
            return Err(StoreError::BlockNotFound(block_id.to_string()));
        }
        let key = (student_id.to_string(), block_id.to_string());
        Ok(self.student_state.read().await.get(&key).cloned())
    }

    async fn set_student_choice(
        &self,
        student_id: &str,
        block_id: &str,
        choice: &str,
    ) -> Result<StudentState, StoreError> {
        let state = StudentState {
            student_id: student_id.to_string(),
            block_id: block_id.to_string(),
            student_choice: choice.to_string(),
            updated_at: Utc::now(),
        };
        self.student_state
            .write()
            .await
            .insert((student_id.to_string(), block_id.to_string()), state.clone());
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tip::Tip;

    #[tokio::test]
    async fn insert_refuses_duplicate_ids() {
        let store = InMemoryBlockStore::new();
        store.insert_question(Question::mcq("q1", "")).await.unwrap();

        let err = store
            .insert_question(Question::mcq("q1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BlockExists(id) if id == "q1"));
    }

    #[tokio::test]
    async fn save_requires_existing_block() {
        let store = InMemoryBlockStore::new();
        let err = store
            .save_question(Question::mcq("missing", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BlockNotFound(_)));
    }

    #[tokio::test]
    async fn student_choice_is_overwritten() {
        let store = InMemoryBlockStore::new();
        store.insert_question(Question::mcq("q1", "")).await.unwrap();

        store.set_student_choice("s1", "q1", "a").await.unwrap();
        store.set_student_choice("s1", "q1", "b").await.unwrap();

        let state = store.get_student_state("s1", "q1").await.unwrap().unwrap();
        assert_eq!(state.student_choice, "b");
        assert!(store.get_student_state("s2", "q1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_tip_parent_resolves_owner() {
        let store = InMemoryBlockStore::new();
        let tip = Tip::new("hello", ["a"]);
        let tip_id = tip.id.clone();
        store
            .insert_question(Question::mcq("q1", "").with_tip(tip))
            .await
            .unwrap();

        let parent = store.find_tip_parent(&tip_id).await.unwrap();
        assert_eq!(parent.id, "q1");
        assert!(store.find_tip_parent("orphan").await.is_none());
    }
}
