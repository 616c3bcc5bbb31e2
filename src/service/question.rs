use crate::error::Error;
use crate::store::QuestionRepository;
use crate::types::{
    question::{
        FieldChange, NewQuestion, Question, QuestionId, QuestionUpdate, QuestionWrapper,
    },
    response::Response,
};

/// Whether a listing reflects the store or stands in for a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Complete,
    Degraded,
}

/// Result of a read-path query.
///
/// Read paths never propagate store failures: they log the failure and
/// answer with an empty, `Degraded` listing. Write paths propagate.
#[derive(Debug, Clone)]
pub struct Listing {
    pub questions: Vec<Question>,
    pub status: ListingStatus,
}

impl Listing {
    fn from_store(result: Result<Vec<Question>, Error>, query: &str) -> Self {
        match result {
            Ok(questions) => Listing {
                questions,
                status: ListingStatus::Complete,
            },
            Err(e) => {
                log::error!("{} failed, answering with an empty list: {}", query, e);
                Listing {
                    questions: Vec::new(),
                    status: ListingStatus::Degraded,
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct QuestionService<R> {
    store: R,
}

impl<R: QuestionRepository> QuestionService<R> {
    pub fn new(store: R) -> Self {
        QuestionService { store }
    }

    pub async fn list_all(&self) -> Listing {
        Listing::from_store(self.store.all().await, "listing all questions")
    }

    pub async fn list_by_category(&self, category: &str) -> Listing {
        Listing::from_store(
            self.store.by_category(category).await,
            "listing questions by category",
        )
    }

    pub async fn list_by_difficulty(&self, level: &str) -> Listing {
        Listing::from_store(
            self.store.by_difficulty(level).await,
            "listing questions by difficulty",
        )
    }

    pub async fn list_by_category_and_difficulty(&self, category: &str, level: &str) -> Listing {
        Listing::from_store(
            self.store.by_category_and_difficulty(category, level).await,
            "listing questions by category and difficulty",
        )
    }

    /// Rejects a missing text the same way as a duplicate one.
    ///
    /// The existence check and the insert are two separate store calls, so
    /// two concurrent adds of the same text can both pass the check.
    pub async fn add(&self, mut request: NewQuestion) -> Result<Question, Error> {
        let text = match request.question.take() {
            Some(text) => text,
            None => return Err(Error::DuplicateQuestion),
        };
        if self.store.exists_by_text(&text).await? {
            return Err(Error::DuplicateQuestion);
        }
        let question = self.store.insert(text, request).await?;
        log::info!("added question {}", question.id.0);
        Ok(question)
    }

    pub async fn delete(&self, id: QuestionId) -> Result<(), Error> {
        if !self.store.exists(id).await? {
            return Err(Error::QuestionNotFound(id));
        }
        self.store.delete(id).await?;
        log::info!("deleted question {}", id.0);
        Ok(())
    }

    /// Writes every supplied field that differs from the stored value.
    ///
    /// Fails with `NoChanges` when nothing differs, in which case the store
    /// is not written at all. A new text already used by another question is
    /// a `DuplicateQuestion`, the same check `add` makes.
    pub async fn update(&self, id: QuestionId, patch: QuestionUpdate) -> Result<Question, Error> {
        let mut question = self
            .store
            .get(id)
            .await?
            .ok_or(Error::QuestionNotFound(id))?;

        let changes = patch.diff(&question);
        if changes.is_empty() {
            return Err(Error::NoChanges);
        }
        for change in &changes {
            if let FieldChange::Question(text) = change {
                if self.store.exists_by_text(text).await? {
                    return Err(Error::DuplicateQuestion);
                }
            }
        }
        log::debug!("question {}: {} field(s) changed", id.0, changes.len());
        question.apply(changes);
        self.store.save(question.clone()).await?;
        Ok(question)
    }

    pub async fn random_sample(&self, category: &str, count: u32) -> Result<Vec<QuestionId>, Error> {
        self.store.random_ids(category, count as usize).await
    }

    /// Keeps input order and duplicates. One unknown id fails the batch.
    pub async fn resolve(&self, ids: &[QuestionId]) -> Result<Vec<QuestionWrapper>, Error> {
        let mut wrappers = Vec::with_capacity(ids.len());
        for id in ids {
            let question = self
                .store
                .get(*id)
                .await?
                .ok_or(Error::DanglingQuestion(*id))?;
            wrappers.push(QuestionWrapper::from(question));
        }
        Ok(wrappers)
    }

    /// Number of responses whose chosen option equals the stored answer.
    pub async fn score(&self, responses: &[Response]) -> Result<u32, Error> {
        let mut right = 0;
        for response in responses {
            let question = self
                .store
                .get(response.id)
                .await?
                .ok_or(Error::DanglingQuestion(response.id))?;
            if response.response_status == question.correct_answer {
                right += 1;
            }
        }
        Ok(right)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::Store;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn question(id: i32, text: &str, category: &str, answer: &str) -> Question {
        Question {
            id: QuestionId(id),
            question: text.to_string(),
            option1: "Paris".to_string(),
            option2: "Berlin".to_string(),
            option3: "Rome".to_string(),
            option4: "Madrid".to_string(),
            difficulty_level: "Easy".to_string(),
            category: category.to_string(),
            correct_answer: answer.to_string(),
        }
    }

    fn request(text: Option<&str>) -> NewQuestion {
        NewQuestion {
            question: text.map(str::to_string),
            option1: "1".to_string(),
            option2: "2".to_string(),
            option3: "3".to_string(),
            option4: "4".to_string(),
            difficulty_level: "Medium".to_string(),
            category: "Math".to_string(),
            correct_answer: "2".to_string(),
        }
    }

    fn service() -> QuestionService<Store> {
        QuestionService::new(Store::with_questions(vec![
            question(1, "Capital of France?", "Geography", "Paris"),
            question(2, "Capital of Germany?", "Geography", "Berlin"),
        ]))
    }

    /// Counts saves and can be told to fail reads, writes, or both.
    #[derive(Clone)]
    pub(crate) struct Recording {
        inner: Store,
        saves: Arc<AtomicUsize>,
        broken_reads: bool,
        broken_writes: bool,
    }

    impl Recording {
        pub(crate) fn new(broken_reads: bool, broken_writes: bool) -> Self {
            Recording {
                inner: Store::with_questions(vec![question(
                    1,
                    "Capital of France?",
                    "Geography",
                    "Paris",
                )]),
                saves: Arc::new(AtomicUsize::new(0)),
                broken_reads,
                broken_writes,
            }
        }

        fn check(broken: bool) -> Result<(), Error> {
            if broken {
                Err(Error::StoreFailure("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl QuestionRepository for Recording {
        async fn all(&self) -> Result<Vec<Question>, Error> {
            Recording::check(self.broken_reads)?;
            self.inner.all().await
        }
        async fn by_category(&self, category: &str) -> Result<Vec<Question>, Error> {
            Recording::check(self.broken_reads)?;
            self.inner.by_category(category).await
        }
        async fn by_difficulty(&self, level: &str) -> Result<Vec<Question>, Error> {
            Recording::check(self.broken_reads)?;
            self.inner.by_difficulty(level).await
        }
        async fn by_category_and_difficulty(
            &self,
            category: &str,
            level: &str,
        ) -> Result<Vec<Question>, Error> {
            Recording::check(self.broken_reads)?;
            self.inner.by_category_and_difficulty(category, level).await
        }
        async fn exists(&self, id: QuestionId) -> Result<bool, Error> {
            self.inner.exists(id).await
        }
        async fn exists_by_text(&self, text: &str) -> Result<bool, Error> {
            self.inner.exists_by_text(text).await
        }
        async fn get(&self, id: QuestionId) -> Result<Option<Question>, Error> {
            self.inner.get(id).await
        }
        async fn insert(&self, text: String, question: NewQuestion) -> Result<Question, Error> {
            Recording::check(self.broken_writes)?;
            self.inner.insert(text, question).await
        }
        async fn save(&self, question: Question) -> Result<(), Error> {
            Recording::check(self.broken_writes)?;
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(question).await
        }
        async fn delete(&self, id: QuestionId) -> Result<(), Error> {
            Recording::check(self.broken_writes)?;
            self.inner.delete(id).await
        }
        async fn random_ids(&self, category: &str, count: usize) -> Result<Vec<QuestionId>, Error> {
            self.inner.random_ids(category, count).await
        }
    }

    fn recording(broken_reads: bool) -> (QuestionService<Recording>, Arc<AtomicUsize>) {
        let store = Recording::new(broken_reads, false);
        let saves = store.saves.clone();
        (QuestionService::new(store), saves)
    }

    #[tokio::test]
    async fn add_then_duplicate_add_fails() {
        let service = service();
        let added = service.add(request(Some("2 + 2?"))).await.unwrap();
        assert_eq!(added.id, QuestionId(3));

        let err = service.add(request(Some("2 + 2?"))).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateQuestion));
    }

    #[tokio::test]
    async fn add_without_text_is_rejected_as_duplicate() {
        let err = service().add(request(None)).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateQuestion));
    }

    #[tokio::test]
    async fn duplicate_check_is_case_sensitive() {
        assert!(service().add(request(Some("capital of france?"))).await.is_ok());
    }

    #[tokio::test]
    async fn delete_and_update_of_unknown_id_are_not_found() {
        let service = service();
        assert!(matches!(
            service.delete(QuestionId(99)).await,
            Err(Error::QuestionNotFound(QuestionId(99)))
        ));
        assert!(matches!(
            service.update(QuestionId(99), QuestionUpdate::default()).await,
            Err(Error::QuestionNotFound(QuestionId(99)))
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_question() {
        let service = service();
        service.delete(QuestionId(1)).await.unwrap();
        let remaining = service.list_all().await.questions;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, QuestionId(2));
    }

    #[tokio::test]
    async fn update_with_identical_values_fails_without_writing() {
        let (service, saves) = recording(false);
        let patch = QuestionUpdate {
            question: Some("Capital of France?".to_string()),
            option1: Some("Paris".to_string()),
            option2: Some("Berlin".to_string()),
            option3: Some("Rome".to_string()),
            option4: Some("Madrid".to_string()),
            difficulty_level: Some("Easy".to_string()),
            category: Some("Geography".to_string()),
            correct_answer: Some("Paris".to_string()),
        };
        assert!(matches!(
            service.update(QuestionId(1), patch).await,
            Err(Error::NoChanges)
        ));
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_changes_only_the_differing_field() {
        let (service, saves) = recording(false);
        let patch = QuestionUpdate {
            category: Some("Geography".to_string()),
            option4: Some("Lisbon".to_string()),
            ..Default::default()
        };
        let updated = service.update(QuestionId(1), patch).await.unwrap();

        let mut expected = question(1, "Capital of France?", "Geography", "Paris");
        expected.option4 = "Lisbon".to_string();
        assert_eq!(updated, expected);
        assert_eq!(service.store.get(QuestionId(1)).await.unwrap(), Some(expected));
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn read_failures_degrade_to_an_empty_listing() {
        let (service, _) = recording(true);
        let listing = service.list_by_category("Geography").await;
        assert!(listing.questions.is_empty());
        assert_eq!(listing.status, ListingStatus::Degraded);

        let (service, _) = recording(false);
        let listing = service.list_by_category("Geography").await;
        assert_eq!(listing.questions.len(), 1);
        assert_eq!(listing.status, ListingStatus::Complete);
    }

    #[tokio::test]
    async fn filters_by_difficulty_and_category() {
        let service = service();
        service.add(request(Some("2 + 2?"))).await.unwrap();
        assert_eq!(service.list_by_difficulty("Medium").await.questions.len(), 1);
        assert_eq!(service.list_by_category("Geography").await.questions.len(), 2);
        assert_eq!(
            service
                .list_by_category_and_difficulty("Geography", "Medium")
                .await
                .questions
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn random_sample_of_a_small_category_returns_all_ids() {
        let mut ids = service().random_sample("Geography", 10).await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![QuestionId(1), QuestionId(2)]);
    }

    #[tokio::test]
    async fn resolve_keeps_order_and_duplicates() {
        let wrappers = service()
            .resolve(&[QuestionId(2), QuestionId(1), QuestionId(2)])
            .await
            .unwrap();
        let ids: Vec<_> = wrappers.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![QuestionId(2), QuestionId(1), QuestionId(2)]);
    }

    #[tokio::test]
    async fn resolve_with_an_unknown_id_fails_entirely() {
        let err = service()
            .resolve(&[QuestionId(1), QuestionId(42)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DanglingQuestion(QuestionId(42))));
    }

    #[tokio::test]
    async fn score_counts_exact_matches() {
        let service = service();
        let answer = |id, status: &str| Response {
            id: QuestionId(id),
            response_status: status.to_string(),
        };
        assert_eq!(service.score(&[answer(1, "Paris")]).await.unwrap(), 1);
        assert_eq!(service.score(&[answer(1, "paris")]).await.unwrap(), 0);
        assert_eq!(
            service
                .score(&[answer(1, "Paris"), answer(1, "Paris"), answer(2, "Paris")])
                .await
                .unwrap(),
            2
        );
        assert!(matches!(
            service.score(&[answer(1, "Paris"), answer(9, "x")]).await,
            Err(Error::DanglingQuestion(QuestionId(9)))
        ));
    }

    #[tokio::test]
    async fn write_failures_propagate() {
        let service = QuestionService::new(Recording::new(false, true));
        assert!(matches!(
            service.add(request(Some("2 + 2?"))).await,
            Err(Error::StoreFailure(_))
        ));
        let patch = QuestionUpdate {
            option4: Some("Lisbon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(QuestionId(1), patch).await,
            Err(Error::StoreFailure(_))
        ));
        assert!(matches!(
            service.delete(QuestionId(1)).await,
            Err(Error::StoreFailure(_))
        ));
        // reads are unaffected by a failing write path
        assert_eq!(service.list_all().await.status, ListingStatus::Complete);
    }

    #[tokio::test]
    async fn update_cannot_take_another_questions_text() {
        let service = service();
        let patch = QuestionUpdate {
            question: Some("Capital of Germany?".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(QuestionId(1), patch).await,
            Err(Error::DuplicateQuestion)
        ));
        let texts: Vec<String> = service
            .list_all()
            .await
            .questions
            .into_iter()
            .map(|q| q.question)
            .collect();
        assert_eq!(texts, vec!["Capital of France?", "Capital of Germany?"]);
    }

    #[tokio::test]
    async fn update_may_rename_to_an_unused_text() {
        let service = service();
        let patch = QuestionUpdate {
            question: Some("Capital city of France?".to_string()),
            ..Default::default()
        };
        let updated = service.update(QuestionId(1), patch).await.unwrap();
        assert_eq!(updated.question, "Capital city of France?");
    }
}
