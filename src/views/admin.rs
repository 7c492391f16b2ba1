use maud::{html, Markup};
use rust_i18n::t;

use crate::{
    models::{Bundle, Category, Metadata, Policy},
    names,
    views::components::{notice, Notice},
};

pub fn login(enabled: bool, notice_msg: Option<&Notice>) -> Markup {
    html! {
        article {
            header { h2 { (t!("login.title")) } }
            p { small { (t!("login.requirement")) } }
            (notice(notice_msg))
            @if !enabled {
                div."alert alert-info" role="status" { (t!("login.disabled")) }
            }
            form hx-post=(names::LOGIN_URL) hx-target="main" {
                input type="email"
                      name="email"
                      placeholder=(t!("login.email"))
                      aria-label=(t!("login.email"))
                      autocomplete="username"
                      required;
                input type="password"
                      name="password"
                      placeholder=(t!("login.password"))
                      aria-label=(t!("login.password"))
                      autocomplete="current-password"
                      required;
                input type="submit" value=(t!("login.submit"));
            }
            a href=(names::HOME_URL) { (t!("login.cancel")) }
        }
    }
}

pub struct DashboardData<'a> {
    pub policies: &'a [Policy],
    pub bundles: &'a [Bundle],
    pub metadata: &'a Metadata,
    pub notice: Option<&'a Notice>,
}

pub fn dashboard(data: DashboardData<'_>) -> Markup {
    html! {
        nav {
            ul { li { h1 { (t!("admin.title")) } } }
            ul {
                li {
                    button.secondary hx-post=(names::LOGOUT_URL) {
                        (t!("admin.logout"))
                    }
                }
            }
        }
        (notice(data.notice))
        div.card-grid {
            (policy_form())
            (generate_form())
        }
        (upload_form())
        (policy_table(data.policies, data.metadata))
        (bundle_builder(data.policies, data.bundles))
    }
}

fn category_options(selected: Option<Category>) -> Markup {
    html! {
        @for category in Category::ALL {
            option value=(category.label()) selected[selected == Some(category)] {
                (category.label())
            }
        }
    }
}

fn policy_form() -> Markup {
    html! {
        article {
            header { h3 { (t!("admin.create_policy")) } }
            form hx-post=(names::ADMIN_POLICIES_URL) hx-target="main" {
                input type="text" name="title" placeholder=(t!("admin.policy_title")) required;
                input type="text" name="code" placeholder=(t!("admin.policy_code"));
                select name="category" aria-label=(t!("admin.category")) {
                    (category_options(Some(Category::ALL[0])))
                }
                label {
                    (t!("admin.content"))
                    textarea name="content" rows="6" { (names::DEFAULT_POLICY_CONTENT) }
                }
                label {
                    (t!("admin.questions"))
                    textarea name="questions" rows="4" { (names::DEFAULT_QUESTIONS_JSON) }
                    small { (t!("admin.questions_hint")) }
                }
                input type="submit" value=(t!("admin.save_policy"));
            }
        }
    }
}

fn generate_form() -> Markup {
    html! {
        article {
            header { h3 { (t!("admin.ai_assist")) } }
            p { small { (t!("admin.ai_note")) } }
            form hx-post=(names::ADMIN_GENERATE_URL)
                 hx-target="main"
                 hx-disabled-elt="find input[type='submit']" {
                input type="text" name="topic" placeholder=(t!("admin.topic")) required;
                input type="submit" value=(t!("admin.generate"));
            }
        }
    }
}

fn upload_form() -> Markup {
    html! {
        article {
            header { h3 { (t!("admin.upload")) } }
            p { small { (t!("admin.upload_note")) } }
            form hx-post=(names::ADMIN_UPLOAD_URL)
                 hx-encoding="multipart/form-data"
                 hx-target="main" {
                input type="file" name="files" multiple accept=".doc,.docx";
                input.outline type="submit" value=(t!("admin.process_files"));
            }
        }
    }
}

fn policy_table(policies: &[Policy], metadata: &Metadata) -> Markup {
    html! {
        article {
            header {
                h3 { (t!("admin.policies")) }
                small { (t!("admin.last_updated", when = &metadata.last_updated)) }
            }
            table {
                thead { tr {
                    th { (t!("admin.policy_title")) }
                    th { (t!("admin.policy_code")) }
                    th { (t!("admin.category")) }
                    th {}
                } }
                tbody {
                    @for policy in policies {
                        tr {
                            td { (policy.title) }
                            td { @if let Some(code) = &policy.code { span.policy-code { (code) } } }
                            td {
                                select name="category"
                                       aria-label=(t!("admin.category"))
                                       hx-patch=(names::admin_policy_category_url(&policy.id))
                                       hx-trigger="change"
                                       hx-target="main" {
                                    (category_options(Some(policy.category.unwrap_or_default())))
                                }
                            }
                            td {
                                button.outline.secondary
                                       hx-delete=(names::admin_policy_url(&policy.id))
                                       hx-confirm=(t!("admin.confirm_delete_policy", title = &policy.title))
                                       hx-target="main" {
                                    (t!("admin.delete"))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn bundle_builder(policies: &[Policy], bundles: &[Bundle]) -> Markup {
    html! {
        article {
            header { h3 { (t!("admin.bundle_builder")) } }
            div.card-grid {
                form hx-post=(names::ADMIN_BUNDLES_URL) hx-target="main" {
                    input type="text" name="title" placeholder=(t!("admin.bundle_title")) required;
                    textarea name="description" rows="2" placeholder=(t!("admin.bundle_description")) {}
                    fieldset {
                        legend { small { (t!("admin.select_policies")) } }
                        @for policy in policies {
                            label {
                                input type="checkbox" name="policy_ids" value=(policy.id);
                                (policy.title)
                            }
                        }
                    }
                    input type="submit" value=(t!("admin.save_bundle"));
                }
                div {
                    h4 { (t!("admin.existing_bundles")) }
                    @if bundles.is_empty() {
                        p { em { (t!("admin.no_bundles")) } }
                    }
                    @for bundle in bundles {
                        article {
                            strong { (bundle.title) } " "
                            small.badge { (t!("home.modules", count = bundle.policy_ids.len())) }
                            " "
                            button.outline.secondary
                                   hx-delete=(names::admin_bundle_url(&bundle.id))
                                   hx-confirm=(t!("admin.confirm_delete_bundle", title = &bundle.title))
                                   hx-target="main" {
                                (t!("admin.delete"))
                            }
                        }
                    }
                }
            }
        }
    }
}
