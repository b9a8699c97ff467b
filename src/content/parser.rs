//! Marker-line parser for free-text model output.
//!
//! The model is asked for a `Title:` line followed by a `Content:` line, but
//! its output is untrusted: anything that doesn't follow the shape falls back
//! to the configured title with the whole response as the body.

use crate::content::types::ContentDraft;

const TITLE_MARKERS: &[&str] = &["Title:", "제목:"];
const CONTENT_MARKERS: &[&str] = &["Content:", "내용:"];

pub fn parse_response(raw: &str, fallback_title: &str) -> ContentDraft {
    let mut title = fallback_title.to_string();
    let mut body = raw.to_string();

    let lines: Vec<&str> = raw.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let marker_line = strip_decoration(line);

        if let Some(rest) = strip_marker(marker_line, TITLE_MARKERS) {
            title = rest.trim_matches(|c: char| c == '*' || c.is_whitespace()).to_string();
        } else if let Some(rest) = strip_marker(marker_line, CONTENT_MARKERS) {
            let rest = rest.trim_matches(|c: char| c == '*' || c.is_whitespace());
            let mut body_lines: Vec<&str> = Vec::with_capacity(lines.len() - i);
            if !rest.is_empty() {
                body_lines.push(rest);
            }
            body_lines.extend_from_slice(&lines[i + 1..]);
            body = strip_code_fence(&body_lines.join("\n"));
            break;
        }
    }

    ContentDraft { title, body }
}

/// Markdown emphasis or heading characters the model sometimes wraps markers in
fn strip_decoration(line: &str) -> &str {
    line.trim().trim_start_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
}

fn strip_marker<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|m| line.strip_prefix(m))
}

fn strip_code_fence(body: &str) -> String {
    let trimmed = body.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return body.to_string();
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return body.to_string();
    };

    // Drop the language tag on the opening fence line
    match inner.split_once('\n') {
        Some((_, rest)) => rest.trim_end_matches('\n').to_string(),
        None => inner.to_string(),
    }
}
