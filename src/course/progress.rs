use crate::models::{Bundle, Policy};

use super::quiz::{evaluate, Answers, QuizResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Quiz,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CourseError {
    #[error("this course is already complete")]
    Complete,
    #[error("no quiz is in progress")]
    NotInQuiz,
    #[error("answers are locked until the quiz is retried")]
    Locked,
    #[error("the current policy is no longer available")]
    MissingPolicy,
    #[error("that answer is not part of this quiz")]
    InvalidAnswer,
}

/// What a quiz submission did to the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Advanced { index: usize },
    Completed,
    Failed(QuizResult),
}

/// One learner's pass through a bundle.
///
/// Policies are visited strictly in the bundle's authored order. The answer
/// mapping belongs to the current index: it survives switching back to
/// reading, and is cleared whenever the learner moves on.
#[derive(Debug, Clone)]
pub struct CourseState {
    bundle_id: String,
    policy_ids: Vec<String>,
    index: usize,
    mode: Mode,
    answers: Answers,
    result: Option<QuizResult>,
}

impl CourseState {
    pub fn start(bundle: &Bundle) -> Self {
        Self {
            bundle_id: bundle.id.clone(),
            policy_ids: bundle.policy_ids.clone(),
            index: 0,
            mode: Mode::Read,
            answers: Answers::new(),
            result: None,
        }
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.policy_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy_ids.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Result of the last failed submission at this index, if any.
    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    pub fn current_policy_id(&self) -> Option<&str> {
        self.policy_ids.get(self.index).map(String::as_str)
    }

    /// `None` when the bundle points at a policy that no longer exists.
    pub fn current_policy<'a>(&self, policies: &'a [Policy]) -> Option<&'a Policy> {
        let id = self.current_policy_id()?;
        policies.iter().find(|p| p.id == id)
    }

    pub fn take_quiz(&mut self) -> Result<(), CourseError> {
        match self.mode {
            Mode::Summary => Err(CourseError::Complete),
            Mode::Read | Mode::Quiz => {
                self.mode = Mode::Quiz;
                Ok(())
            }
        }
    }

    /// Back to the policy text. Unsubmitted answers are kept; a failed
    /// attempt is discarded.
    pub fn show_reading(&mut self) -> Result<(), CourseError> {
        match self.mode {
            Mode::Summary => Err(CourseError::Complete),
            Mode::Read => Ok(()),
            Mode::Quiz => {
                if self.result.take().is_some() {
                    self.answers.clear();
                }
                self.mode = Mode::Read;
                Ok(())
            }
        }
    }

    /// Record `option` for `question`; both must exist in the current policy's quiz.
    pub fn select_answer(
        &mut self,
        policies: &[Policy],
        question: usize,
        option: usize,
    ) -> Result<(), CourseError> {
        self.ensure_open_quiz()?;
        let policy = self
            .current_policy(policies)
            .ok_or(CourseError::MissingPolicy)?;
        let in_range = policy
            .questions
            .get(question)
            .is_some_and(|q| option < q.options.len());
        if !in_range {
            return Err(CourseError::InvalidAnswer);
        }
        self.answers.insert(question, option);
        Ok(())
    }

    pub fn submit(&mut self, policies: &[Policy]) -> Result<Submission, CourseError> {
        self.ensure_open_quiz()?;
        let policy = self
            .current_policy(policies)
            .ok_or(CourseError::MissingPolicy)?;

        let result = evaluate(&policy.questions, &self.answers);
        if !result.passed() {
            self.result = Some(result);
            return Ok(Submission::Failed(result));
        }

        self.answers.clear();
        self.result = None;

        if self.index + 1 < self.policy_ids.len() {
            self.index += 1;
            self.mode = Mode::Read;
            Ok(Submission::Advanced { index: self.index })
        } else {
            self.mode = Mode::Summary;
            Ok(Submission::Completed)
        }
    }

    /// Start the current quiz over after a failed submission.
    pub fn retry(&mut self) -> Result<(), CourseError> {
        match self.mode {
            Mode::Summary => Err(CourseError::Complete),
            Mode::Read => Err(CourseError::NotInQuiz),
            Mode::Quiz => {
                self.answers.clear();
                self.result = None;
                Ok(())
            }
        }
    }

    fn ensure_open_quiz(&self) -> Result<(), CourseError> {
        match self.mode {
            Mode::Summary => Err(CourseError::Complete),
            Mode::Read => Err(CourseError::NotInQuiz),
            Mode::Quiz if self.result.is_some() => Err(CourseError::Locked),
            Mode::Quiz => Ok(()),
        }
    }
}
