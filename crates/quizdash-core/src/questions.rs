use std::collections::BTreeSet;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A checkpoint question. The JSON shape decides the variant:
/// `{question, options, correctIndex}` or `{question, answer}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Question {
    MultipleChoice {
        question: String,
        options: Vec<String>,
        #[serde(rename = "correctIndex")]
        correct_index: usize,
    },
    FreeText {
        question: String,
        answer: String,
    },
}

/// A player's response to a question prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Text(String),
    Choice(usize),
    /// Prompt closed without an answer.
    Dismissed,
}

impl Question {
    pub fn prompt(&self) -> &str {
        match self {
            Question::MultipleChoice { question, .. } | Question::FreeText { question, .. } => {
                question
            },
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            Question::MultipleChoice { options, .. } => options,
            Question::FreeText { .. } => &[],
        }
    }

    /// Free text matches case-insensitively and exactly; multiple choice
    /// matches the option index, or the option text case-insensitively.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (Question::FreeText { answer: expected, .. }, Answer::Text(given)) => {
                given.to_lowercase() == expected.to_lowercase()
            },
            (Question::MultipleChoice { correct_index, .. }, Answer::Choice(i)) => {
                i == correct_index
            },
            (
                Question::MultipleChoice {
                    options,
                    correct_index,
                    ..
                },
                Answer::Text(given),
            ) => options
                .get(*correct_index)
                .is_some_and(|o| o.to_lowercase() == given.to_lowercase()),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum QuestionBankError {
    Io(std::io::Error),
    Parse(String),
    InvalidQuestion { index: usize, reason: String },
}

impl std::fmt::Display for QuestionBankError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read question bank: {e}"),
            Self::Parse(e) => write!(f, "failed to parse question bank: {e}"),
            Self::InvalidQuestion { index, reason } => {
                write!(f, "question {index} is invalid: {reason}")
            },
        }
    }
}

impl std::error::Error for QuestionBankError {}

/// The question pool, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        for (index, q) in questions.iter().enumerate() {
            if let Question::MultipleChoice {
                options,
                correct_index,
                ..
            } = q
                && *correct_index >= options.len()
            {
                return Err(QuestionBankError::InvalidQuestion {
                    index,
                    reason: format!(
                        "correctIndex {correct_index} out of range for {} options",
                        options.len()
                    ),
                });
            }
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let questions: Vec<Question> =
            serde_json::from_str(json).map_err(|e| QuestionBankError::Parse(e.to_string()))?;
        Self::new(questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let content = std::fs::read_to_string(path).map_err(QuestionBankError::Io)?;
        Self::from_json(&content)
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw a random question not in `used` and mark it used.
    /// Returns `None` once the pool is exhausted.
    pub fn draw(&self, used: &mut BTreeSet<usize>, rng: &mut impl Rng) -> Option<usize> {
        let unused: Vec<usize> = (0..self.questions.len())
            .filter(|i| !used.contains(i))
            .collect();
        if unused.is_empty() {
            return None;
        }
        let pick = unused[rng.random_range(0..unused.len())];
        used.insert(pick);
        Some(pick)
    }
}
