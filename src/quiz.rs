//! Quiz bootstrapping
//!
//! The question set is seeded into the store once, during the v1 schema
//! migration, and read back at quiz start. Scores are appended as the user
//! finishes rounds.

use crate::error::QuizzifyResult;
use crate::records::{Difficulty, QuestionRecord};
use crate::store::QuestionStore;

/// The sample question set installed at store creation
pub fn sample_questions() -> Vec<QuestionRecord> {
    vec![
        QuestionRecord {
            id: None,
            question: "What does HTML stand for?".to_string(),
            options: vec![
                "Hyper Text Markup Language".to_string(),
                "Home Tool Markup Language".to_string(),
                "Hyperlinks and Text Markup Language".to_string(),
                "None of the above".to_string(),
            ],
            answer: 0,
            difficulty: Difficulty::Easy,
        },
        QuestionRecord {
            id: None,
            question: "Which language runs in a web browser?".to_string(),
            options: vec![
                "Java".to_string(),
                "C".to_string(),
                "Python".to_string(),
                "JavaScript".to_string(),
            ],
            answer: 3,
            difficulty: Difficulty::Easy,
        },
        QuestionRecord {
            id: None,
            question: "Which HTTP status code means 'Not Found'?".to_string(),
            options: vec![
                "200".to_string(),
                "301".to_string(),
                "404".to_string(),
                "500".to_string(),
            ],
            answer: 2,
            difficulty: Difficulty::Medium,
        },
        QuestionRecord {
            id: None,
            question: "What is the time complexity of binary search?".to_string(),
            options: vec![
                "O(n)".to_string(),
                "O(log n)".to_string(),
                "O(n log n)".to_string(),
                "O(1)".to_string(),
            ],
            answer: 1,
            difficulty: Difficulty::Hard,
        },
    ]
}

/// Load the question set for a quiz round, optionally filtered by difficulty
pub async fn load_questions(
    store: &dyn QuestionStore,
    difficulty: Option<Difficulty>,
) -> QuizzifyResult<Vec<QuestionRecord>> {
    match difficulty {
        Some(level) => store.get_questions_by_difficulty(level).await,
        None => store.get_all_questions().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ScoreStore, SqliteStore};

    #[test]
    fn test_sample_questions_are_well_formed() {
        for q in sample_questions() {
            assert_eq!(q.options.len(), 4);
            assert!(q.answer < q.options.len());
        }
    }

    #[tokio::test]
    async fn test_load_all_questions() {
        let store = SqliteStore::open_in_memory().unwrap();
        let questions = load_questions(&store, None).await.unwrap();
        assert_eq!(questions.len(), sample_questions().len());
    }

    #[tokio::test]
    async fn test_load_by_difficulty() {
        let store = SqliteStore::open_in_memory().unwrap();
        let easy = load_questions(&store, Some(Difficulty::Easy)).await.unwrap();
        assert_eq!(easy.len(), 2);

        let hard = load_questions(&store, Some(Difficulty::Hard)).await.unwrap();
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].options[hard[0].answer], "O(log n)");
    }

    #[tokio::test]
    async fn test_score_dates_are_rfc3339() {
        let store = SqliteStore::open_in_memory().unwrap();
        let score = store.save_score(5).await.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&score.date).is_ok());
    }
}
