//! View rendering collaborator.
//!
//! Templating is deliberately a thin interface: handlers produce a view name
//! and a data bag, and whatever implements [`Renderer`] turns that into HTML.
//! The built-in renderer emits a minimal page with the escaped data bag, which
//! is enough for the browser flows and keeps tests able to assert on content.

use serde_json::Value;

pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, data: &Value) -> String;
}

/// Minimal built-in renderer: page title from the view name, data bag as
/// escaped pretty-printed JSON.
pub struct HtmlShell;

impl Renderer for HtmlShell {
    fn render(&self, view: &str, data: &Value) -> String {
        let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".into());
        format!(
            "<!doctype html>\n<html>\n<head><title>{title}</title></head>\n\
             <body>\n<main data-view=\"{title}\">\n<pre>{body}</pre>\n</main>\n</body>\n</html>\n",
            title = escape(view),
            body = escape(&body),
        )
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
