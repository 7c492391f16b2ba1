use maud::{html, Markup};
use rust_i18n::t;

use crate::{
    course::{Answers, QuizResult},
    models::{Policy, Question},
    names,
    views::components::{nav_link, policy_content},
};

pub fn detail(policy: &Policy) -> Markup {
    html! {
        (nav_link(names::HOME_URL, html! { "← " (t!("policy.back")) }))
        article {
            header {
                @if let Some(code) = &policy.code {
                    span.policy-code { (code) } " "
                }
                span.badge { (policy.category_label()) }
                h1 { (policy.title) }
            }
            (policy_content(&policy.content))
            footer {
                (nav_link(&names::policy_quiz_url(&policy.id), html! { (t!("policy.take_quiz")) }))
            }
        }
    }
}

/// CSS class for one option. Before submission only the choice is
/// highlighted; afterwards the correct option and a wrong choice are marked.
pub(crate) fn option_class(question: &Question, option: usize, chosen: Option<usize>, revealed: bool) -> &'static str {
    if revealed {
        if option == question.correct_index {
            "option-correct"
        } else if chosen == Some(option) {
            "option-incorrect"
        } else {
            "option-neutral"
        }
    } else if chosen == Some(option) {
        "option-selected"
    } else {
        "option-neutral"
    }
}

pub(crate) fn result_banner(result: QuizResult) -> Markup {
    html! {
        @if result.passed() {
            div."alert alert-info" role="status" {
                strong { (t!("quiz.passed")) } " "
                (t!("quiz.score", score = result.score, total = result.total, percent = result.percent()))
            }
        } @else {
            div."alert alert-error" role="alert" {
                strong { (t!("quiz.failed")) } " "
                (t!("quiz.score", score = result.score, total = result.total, percent = result.percent()))
            }
        }
    }
}

/// Standalone competency quiz: one form, every question answered at once.
pub fn quiz(policy: &Policy, answers: &Answers, result: Option<QuizResult>) -> Markup {
    let revealed = result.is_some();

    html! {
        (nav_link(&names::policy_url(&policy.id), html! { "← " (t!("quiz.back_to_policy")) }))
        h1 { (t!("quiz.title", title = &policy.title)) }
        @if let Some(result) = result {
            (result_banner(result))
        }
        @if policy.questions.is_empty() {
            p { em { (t!("quiz.no_questions")) } }
        } @else {
            form hx-post=(names::policy_quiz_url(&policy.id))
                 hx-target="main"
                 hx-swap="innerHTML" {
                @for (idx, question) in policy.questions.iter().enumerate() {
                    @let chosen = answers.get(&idx).copied();
                    fieldset disabled[revealed] {
                        legend { strong { (idx + 1) ". " (question.text) } }
                        @for (option_idx, option) in question.options.iter().enumerate() {
                            label class=(option_class(question, option_idx, chosen, revealed)) {
                                input type="radio"
                                      name=(format!("q{idx}"))
                                      value=(option_idx)
                                      checked[chosen == Some(option_idx)];
                                (option)
                            }
                        }
                    }
                }
                @if revealed {
                    button type="button"
                           hx-get=(names::policy_quiz_url(&policy.id))
                           hx-target="main" {
                        (t!("quiz.try_again"))
                    }
                } @else {
                    input type="submit" value=(t!("quiz.submit"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            text: "Q".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_index: 1,
        }
    }

    #[test]
    fn option_class_marks_correct_and_wrong_choice_after_submission() {
        let q = question();
        assert_eq!(option_class(&q, 1, Some(0), true), "option-correct");
        assert_eq!(option_class(&q, 0, Some(0), true), "option-incorrect");
        assert_eq!(option_class(&q, 2, Some(0), true), "option-neutral");
    }

    #[test]
    fn option_class_only_highlights_choice_before_submission() {
        let q = question();
        assert_eq!(option_class(&q, 0, Some(0), false), "option-selected");
        assert_eq!(option_class(&q, 1, Some(0), false), "option-neutral");
    }
}
