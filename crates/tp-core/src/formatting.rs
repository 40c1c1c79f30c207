//! Formatting utilities for Telegram HTML bodies and button labels.

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cut `text` to at most `max_chars` code points, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

/// `@handle`, or the given placeholder when the member has none.
pub fn handle_or(handle: Option<&str>, placeholder: &str) -> String {
    match handle {
        Some(h) if !h.trim().is_empty() => format!("@{}", h.trim_start_matches('@')),
        _ => placeholder.to_string(),
    }
}

/// Split a body into chunks of at most `limit` code points, breaking only at
/// newlines. Markup in the bodies built here never spans a line, so chunks stay
/// well-formed. A single line longer than `limit` is truncated.
pub fn split_lines(text: &str, limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0usize;

    for line in text.split('\n') {
        let line = truncate_chars(line, limit);
        let line_len = line.chars().count();
        // +1 for the newline joining it to the chunk.
        if !chunk.is_empty() && chunk_len + 1 + line_len > limit {
            out.push(std::mem::take(&mut chunk));
            chunk_len = 0;
        }
        if !chunk.is_empty() {
            chunk.push('\n');
            chunk_len += 1;
        }
        chunk.push_str(&line);
        chunk_len += line_len;
    }
    if !chunk.trim().is_empty() {
        out.push(chunk);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        assert_eq!(escape_html("<b>&\"x\"</b>"), "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;");
    }

    #[test]
    fn truncates_by_code_points() {
        assert_eq!(truncate_chars("Олена", 10), "Олена");
        assert_eq!(truncate_chars("Олександра Петренко", 10), "Олексан...");
        assert_eq!(truncate_chars("Олександра Петренко", 10).chars().count(), 10);
    }

    #[test]
    fn splits_at_line_boundaries() {
        assert_eq!(split_lines("a\nb", 100), vec!["a\nb".to_string()]);

        let body = "111\n222\n333";
        let chunks = split_lines(body, 7);
        assert_eq!(chunks, vec!["111\n222".to_string(), "333".to_string()]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 7));

        let chunks = split_lines("short\nтакий довгий рядок що не влазить", 10);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks[0], "short");
    }

    #[test]
    fn handle_formatting() {
        assert_eq!(handle_or(Some("olena"), "-"), "@olena");
        assert_eq!(handle_or(Some("@olena"), "-"), "@olena");
        assert_eq!(handle_or(None, "немає"), "немає");
    }
}
