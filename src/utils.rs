use std::time::Duration;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lifetime of session cookies; server-side session entries expire with them.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(3600);

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure = if secure { " Secure;" } else { "" };
    let max_age = SESSION_MAX_AGE.as_secs();
    format!("{name}={value}; HttpOnly; Max-Age={max_age};{secure} Path=/; SameSite=Strict")
}

pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Max-Age=0; Path=/; SameSite=Strict")
}
