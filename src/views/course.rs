use maud::{html, Markup, PreEscaped};
use rust_i18n::t;

use crate::{
    course::{CourseState, Mode},
    models::{Bundle, Policy},
    names,
    views::{
        components::{notice, policy_content, Notice},
        policy::{option_class, result_banner},
    },
};

pub struct PlayerData<'a> {
    pub bundle_title: &'a str,
    pub state: &'a CourseState,
    pub policy: Option<&'a Policy>,
    pub notice: Option<&'a Notice>,
}

pub fn player(data: PlayerData<'_>) -> Markup {
    let state = data.state;

    html! {
        (notice(data.notice))
        @match (state.mode(), data.policy) {
            (Mode::Summary, _) => (summary(data.bundle_title, state.len())),
            (_, None) => (missing_module(data.bundle_title, state)),
            (mode, Some(policy)) => {
                hgroup {
                    p { mark { (data.bundle_title) } }
                    h2 { (policy.title) }
                    p { (t!("course.module_of", current = state.index() + 1, total = state.len())) }
                }
                progress value=(state.index()) max=(state.len()) {}
                nav.no-print {
                    ul {
                        li {
                            button class=(if mode == Mode::Read { "" } else { "outline" })
                                   hx-post=(names::COURSE_READ_URL)
                                   hx-target="main" {
                                (t!("course.read"))
                            }
                        }
                        li {
                            button class=(if mode == Mode::Quiz { "" } else { "outline" })
                                   hx-post=(names::COURSE_QUIZ_URL)
                                   hx-target="main" {
                                (t!("course.take_quiz"))
                            }
                        }
                    }
                    ul {
                        li { (exit_link()) }
                    }
                }
                @if mode == Mode::Read {
                    article {
                        (policy_content(&policy.content))
                        footer {
                            button hx-post=(names::COURSE_QUIZ_URL) hx-target="main" {
                                (t!("course.take_quiz"))
                            }
                        }
                    }
                } @else {
                    (course_quiz(state, policy))
                }
                (exit_dialog())
            },
        }
    }
}

fn course_quiz(state: &CourseState, policy: &Policy) -> Markup {
    let result = state.result();
    let revealed = result.is_some();

    html! {
        article {
            @if let Some(result) = result {
                (result_banner(result))
            }
            @if policy.questions.is_empty() {
                p { em { (t!("quiz.no_questions")) } }
            }
            @for (idx, question) in policy.questions.iter().enumerate() {
                @let chosen = state.answers().get(&idx).copied();
                div {
                    p { strong { (idx + 1) ". " (question.text) } }
                    @for (option_idx, option) in question.options.iter().enumerate() {
                        button type="button"
                               class=(format!("quiz-option outline {}", option_class(question, option_idx, chosen, revealed)))
                               disabled[revealed]
                               hx-post=(names::COURSE_ANSWER_URL)
                               hx-vals=(format!(r#"{{"question":"{idx}","option":"{option_idx}"}}"#))
                               hx-target="main" {
                            (option)
                        }
                    }
                }
            }
            footer {
                @if revealed {
                    button hx-post=(names::COURSE_RETRY_URL) hx-target="main" {
                        (t!("course.retry"))
                    }
                } @else if !policy.questions.is_empty() {
                    button hx-post=(names::COURSE_SUBMIT_URL) hx-target="main" {
                        (t!("quiz.submit"))
                    }
                }
            }
        }
    }
}

fn summary(bundle_title: &str, modules: usize) -> Markup {
    html! {
        article {
            header { h2 { "\u{1F393} " (t!("course.complete_title")) } }
            p { (t!("course.complete_body", title = bundle_title, count = modules)) }
            footer.no-print {
                button.secondary onclick="window.print()" { (t!("course.print_certificate")) }
                " "
                button hx-post=(names::COURSE_EXIT_URL)
                       hx-target="main"
                       hx-push-url=(names::HOME_URL) {
                    (t!("course.back_to_library"))
                }
            }
        }
    }
}

fn missing_module(bundle_title: &str, state: &CourseState) -> Markup {
    html! {
        article {
            header {
                p { mark { (bundle_title) } }
                p { (t!("course.module_of", current = state.index() + 1, total = state.len())) }
            }
            p { (t!("course.missing_module")) }
            footer {
                button hx-post=(names::COURSE_EXIT_URL)
                       hx-target="main"
                       hx-push-url=(names::HOME_URL) {
                    (t!("course.exit"))
                }
            }
        }
    }
}

fn exit_link() -> Markup {
    html! {
        a onclick="document.getElementById('exit-dialog').showModal()"
          style="cursor: pointer;" {
            (t!("course.exit"))
        }
    }
}

fn exit_dialog() -> Markup {
    html! {
        dialog id="exit-dialog" {
            article {
                p { (t!("course.exit_confirm")) }
                footer {
                    button onclick="document.getElementById('exit-dialog').close()"
                           class="secondary" {
                        (t!("course.exit_cancel"))
                    }
                    " "
                    button hx-post=(names::COURSE_EXIT_URL)
                           hx-target="main"
                           hx-push-url=(names::HOME_URL) {
                        (t!("course.exit"))
                    }
                }
            }
        }
    }
}

/// Printable walk-through of a bundle with the answer key. Ids that no
/// longer resolve to a policy are left out.
pub fn instructor_guide(bundle: &Bundle, policies: &[Option<&Policy>]) -> Markup {
    html! {
        p.no-print {
            button onclick="window.print()" { (t!("guide.print")) }
            " "
            a href=(names::HOME_URL) { (t!("guide.close")) }
        }
        hgroup {
            h1 { (bundle.title) }
            p { (t!("guide.subtitle")) }
        }
        p { (bundle.description) }
        @for (idx, policy) in policies.iter().flatten().enumerate() {
            article {
                header {
                    h2 {
                        (idx + 1) ". " (policy.title)
                        @if let Some(code) = &policy.code {
                            " " small.policy-code { "(" (code) ")" }
                        }
                    }
                }
                (policy_content(&policy.content))
                @if !policy.questions.is_empty() {
                    h3 { (t!("guide.answer_key")) }
                    ol {
                        @for question in &policy.questions {
                            li {
                                (question.text)
                                ul {
                                    @for (option_idx, option) in question.options.iter().enumerate() {
                                        @if option_idx == question.correct_index {
                                            li.answer-key { (option) " " (PreEscaped("&#10003;")) }
                                        } @else {
                                            li { (option) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
