//! Small HTML fragments served directly by the handlers.

pub const GO_BACK: &str = "<a href='/'>Go Back</a>";

pub const SUCCESS: &str = concat!(
    "<h2>Thanks! Your info has been saved.</h2>",
    "<p><a href=\"/home_loggedin\">Go to Home (logged in)</a></p>",
    "<p><a href=\"/\">Go Back to Form</a></p>",
    "<script>setTimeout(()=>{ window.location.href=\"/home_loggedin\"; }, 2000);</script>",
);

pub const LOGIN_FORM: &str = concat!(
    "<h2>Login (fallback)</h2>",
    "<form method=\"post\">",
    "<input name=\"username\" placeholder=\"username\">",
    "<button type=\"submit\">Login</button>",
    "</form>",
);

/// Escapes text for use inside HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
