//! HTML for the single page.

use pitchlab_core::ALL;
use std::fmt::Write;

/// What the form showed when it was submitted.
#[derive(Debug, Clone)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub count_filter: String,
    /// Situational bucket names in table order.
    pub bucket_names: Vec<String>,
}

/// A rendered chart ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub pitcher: String,
    /// Active count filter after a submission; `None` on first load or for `All`.
    pub selected_count: Option<String>,
    pub image_src: String,
    pub pitches: usize,
}

/// Every explicit count from 0-0 to 3-2.
fn explicit_counts() -> impl Iterator<Item = String> {
    (0..=3).flat_map(|b| (0..=2).map(move |s| format!("{b}-{s}")))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn filter_options(form: &FormState) -> String {
    let mut names = vec![ALL.to_string()];
    names.extend(form.bucket_names.iter().cloned());
    names.extend(explicit_counts());

    let mut html = String::new();
    for name in names {
        let selected = if name == form.count_filter { " selected" } else { "" };
        let name = escape(&name);
        let _ = writeln!(html, r#"        <option value="{name}"{selected}>{name}</option>"#);
    }
    html
}

fn layout(form: &FormState, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Pitcher Profile</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    form {{ margin-bottom: 1.5em; }}
    label {{ margin-right: 1em; }}
    img {{ max-width: 100%; }}
    .error {{ color: #a00; }}
  </style>
</head>
<body>
  <h1>Pitcher Profile</h1>
  <form method="post" action="/">
    <label>First name <input name="first_name" value="{first}" required></label>
    <label>Last name <input name="last_name" value="{last}" required></label>
    <label>Counts
      <select name="count_filter">
{options}      </select>
    </label>
    <button type="submit">Show</button>
  </form>
{body}</body>
</html>
"#,
        first = escape(&form.first_name),
        last = escape(&form.last_name),
        options = filter_options(form),
    )
}

pub fn render(form: &FormState, view: &ChartView) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "  <h2>{}</h2>", escape(&view.pitcher));
    if let Some(selected) = &view.selected_count {
        let _ = writeln!(body, "  <p>Showing: {} counts</p>", escape(selected));
    }
    if view.pitches == 0 {
        let _ = writeln!(body, "  <p>No pitches match.</p>");
    }
    let _ = writeln!(
        body,
        r#"  <img src="{}" alt="Pitch distribution for {}">"#,
        escape(&view.image_src),
        escape(&view.pitcher)
    );
    layout(form, &body)
}

pub fn render_error(form: &FormState, message: &str) -> String {
    let body = format!("  <p class=\"error\">{}</p>\n", escape(message));
    layout(form, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(filter: &str) -> FormState {
        FormState {
            first_name: "Shohei".into(),
            last_name: "Ohtani".into(),
            count_filter: filter.into(),
            bucket_names: vec!["Ahead".into(), "Behind".into(), "Even".into()],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"O'Neil" & co</b>"#), "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn explicit_counts_cover_every_state() {
        let counts: Vec<String> = explicit_counts().collect();
        assert_eq!(counts.len(), 12);
        assert_eq!(counts.first().map(String::as_str), Some("0-0"));
        assert_eq!(counts.last().map(String::as_str), Some("3-2"));
    }

    #[test]
    fn submitted_filter_is_selected() {
        let html = filter_options(&form("Behind"));
        assert!(html.contains(r#"<option value="Behind" selected>"#));
        assert!(html.contains(r#"<option value="All">"#));
        assert!(html.contains(r#"<option value="2-1">"#));
    }

    #[test]
    fn page_shows_chart_and_active_filter() {
        let view = ChartView {
            pitcher: "Shohei Ohtani".into(),
            selected_count: Some("Ahead".into()),
            image_src: "/static/images/pitch_dist.png".into(),
            pitches: 12,
        };
        let html = render(&form("Ahead"), &view);
        assert!(html.contains(r#"<img src="/static/images/pitch_dist.png""#));
        assert!(html.contains("Showing: Ahead counts"));
        assert!(!html.contains("No pitches match"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error(&form(ALL), "no player found named 'A <B>'");
        assert!(html.contains("no player found named &#39;A &lt;B&gt;&#39;"));
        assert!(html.contains(r#"value="Ohtani""#));
    }
}
