use std::collections::{BTreeMap, HashMap};

use crate::models::Question;

/// Passing share of correct answers, in percent.
pub const PASS_PERCENT: usize = 80;

/// Chosen option per question index. Unanswered questions are simply absent.
pub type Answers = BTreeMap<usize, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    /// An empty quiz never passes.
    pub fn passed(&self) -> bool {
        self.total > 0 && self.score * 100 >= self.total * PASS_PERCENT
    }

    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.score * 100 + self.total / 2) / self.total
    }
}

pub fn evaluate(questions: &[Question], answers: &Answers) -> QuizResult {
    let score = questions
        .iter()
        .enumerate()
        .filter(|(idx, q)| answers.get(idx) == Some(&q.correct_index))
        .count();

    QuizResult {
        score,
        total: questions.len(),
    }
}

/// Collect `q<index>=<option>` form fields. Anything else is ignored.
pub fn answers_from_form(fields: &HashMap<String, String>) -> Answers {
    fields
        .iter()
        .filter_map(|(key, value)| {
            let question = key.strip_prefix('q')?.parse::<usize>().ok()?;
            let option = value.trim().parse::<usize>().ok()?;
            Some((question, option))
        })
        .collect()
}
