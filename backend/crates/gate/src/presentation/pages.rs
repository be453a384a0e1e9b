//! Server-rendered challenge pages
//!
//! Minimal hand-assembled markup, no templating engine. Two parts of it
//! are contract, not cosmetics: the `Wrong PIN` marker appears exactly
//! when a submission was rejected, and a carried token travels as a
//! hidden `token` input on a single line - automated clients scrape both.

use crate::domain::value_objects::{Level, Token};

/// Marker shown on the entry page after a failed attempt
pub const WRONG_PIN_MARKER: &str = "Wrong PIN";

/// Entry page for a level, optionally flagged invalid and carrying the
/// token the caller must echo back
pub fn entry_page(level: Level, invalid_pin: bool, token: Option<&Token>) -> String {
    let method = match level {
        Level::Zero => "get",
        _ => "post",
    };

    let mut html = String::with_capacity(512);
    html.push_str("<!DOCTYPE html>\n<html>\n<head><title>PIN Gauntlet</title></head>\n<body>\n");
    html.push_str(&format!("<h1>Level {}</h1>\n", level.number()));
    html.push_str("<p>Enter the PIN to advance.</p>\n");
    if invalid_pin {
        html.push_str(&format!("<p class=\"error\">{WRONG_PIN_MARKER}</p>\n"));
    }
    html.push_str(&format!(
        "<form action=\"{}\" method=\"{}\">\n",
        level.path(),
        method
    ));
    html.push_str("<label>PIN: <input type=\"text\" name=\"pin\" autocomplete=\"off\"></label>\n");
    if let Some(token) = token {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"token\" value=\"{token}\">\n"
        ));
    }
    html.push_str("<button type=\"submit\">Submit</button>\n</form>\n</body>\n</html>\n");
    html
}

/// Success page for a cleared level, pointing at the next one
pub fn success_page(level: Level) -> String {
    let mut html = String::with_capacity(256);
    html.push_str("<!DOCTYPE html>\n<html>\n<head><title>PIN Gauntlet</title></head>\n<body>\n");
    html.push_str(&format!("<h1>Level {} cleared</h1>\n", level.number()));
    match level.next() {
        Some(next) => {
            html.push_str(&format!(
                "<p>Next: <a href=\"{}\">level{}</a></p>\n",
                next.path(),
                next.number()
            ));
        }
        None => {
            html.push_str("<p>All levels cleared.</p>\n");
        }
    }
    html.push_str("</body>\n</html>\n");
    html
}
