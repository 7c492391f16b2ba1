use maud::{html, Markup, PreEscaped};

/// htmx navigation link with href fallback + hx-get for in-page swap.
pub fn nav_link(href: &str, body: Markup) -> Markup {
    html! {
        a href=(href)
          hx-get=(href)
          hx-target="main"
          hx-push-url="true"
          hx-swap="innerHTML" {
            (body)
        }
    }
}

/// A message rendered at the top of a page after an action.
pub enum Notice {
    Info(String),
    Error(String),
}

pub fn notice(notice: Option<&Notice>) -> Markup {
    html! {
        @match notice {
            Some(Notice::Info(msg)) => div."alert alert-info" role="status" { (msg) },
            Some(Notice::Error(msg)) => div."alert alert-error" role="alert" { (msg) },
            None => {},
        }
    }
}

/// Policy bodies are authored HTML from admins or the AI backend; strip
/// anything that is not plain document markup before it reaches the page.
pub fn policy_content(raw: &str) -> Markup {
    PreEscaped(ammonia::clean(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_content_strips_scripts() {
        let out = policy_content("<h1>Title</h1><script>alert(1)</script><p onclick=\"x()\">ok</p>")
            .into_string();
        assert!(out.contains("<h1>Title</h1>"));
        assert!(!out.contains("script"));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn notice_renders_by_kind() {
        let err = notice(Some(&Notice::Error("boom".to_string()))).into_string();
        assert!(err.contains("alert-error"));
        assert!(err.contains("boom"));
        assert!(notice(None).into_string().is_empty());
    }
}
