use maud::{html, Markup};
use rust_i18n::t;

use crate::{
    models::{filter_policies, Bundle, Policy},
    names,
    views::components::nav_link,
};

pub fn home(policies: &[Policy], bundles: &[Bundle], term: &str) -> Markup {
    html! {
        hgroup {
            h1 { (t!("home.title")) }
            p { (t!("home.subtitle")) }
        }
        input type="search"
              name="q"
              value=(term)
              placeholder=(t!("home.search_placeholder"))
              aria-label=(t!("home.search_placeholder"))
              hx-get=(names::SEARCH_URL)
              hx-trigger="input changed delay:300ms, search"
              hx-target="#catalog"
              hx-swap="innerHTML";
        div id="catalog" {
            (catalog(policies, bundles, term))
        }
        footer {
            small { (t!("home.footer")) }
        }
    }
}

/// Bundles are only offered while the learner is not searching.
pub fn catalog(policies: &[Policy], bundles: &[Bundle], term: &str) -> Markup {
    let filtered = filter_policies(policies, term);
    let searching = !term.trim().is_empty();

    html! {
        @if !bundles.is_empty() && !searching {
            section {
                h2 { (t!("home.bundles")) }
                div.card-grid {
                    @for bundle in bundles {
                        (bundle_card(bundle))
                    }
                }
            }
        }
        section {
            h2 {
                (t!("home.policies")) " "
                small.badge { (t!("home.records", count = filtered.len())) }
            }
            @if filtered.is_empty() {
                p { em { (t!("home.no_results")) } }
            } @else {
                div.card-grid {
                    @for policy in filtered {
                        (policy_card(policy))
                    }
                }
            }
        }
    }
}

fn bundle_card(bundle: &Bundle) -> Markup {
    html! {
        article {
            header {
                h3 { (bundle.title) }
                small.badge { (t!("home.modules", count = bundle.policy_ids.len())) }
            }
            p { (bundle.description) }
            footer {
                button hx-post=(names::start_course_url(&bundle.id))
                       hx-target="main"
                       hx-push-url=(names::COURSE_URL) {
                    (t!("home.start_course"))
                }
                " "
                a href=(names::instructor_guide_url(&bundle.id)) target="_blank" {
                    (t!("home.instructor_guide"))
                }
            }
        }
    }
}

fn policy_card(policy: &Policy) -> Markup {
    html! {
        article {
            header {
                @if let Some(code) = &policy.code {
                    span.policy-code { (code) } " "
                }
                span.badge { (policy.category_label()) }
            }
            h3 { (nav_link(&names::policy_url(&policy.id), html! { (policy.title) })) }
            footer {
                (nav_link(&names::policy_url(&policy.id), html! { (t!("home.read")) }))
                " · "
                (nav_link(&names::policy_quiz_url(&policy.id), html! { (t!("home.take_quiz")) }))
            }
        }
    }
}
