use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\s*```\s*$").expect("valid fence pattern");
}


/// Char-safe preview of free text for log lines.
#[inline]
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}


/// Models sometimes wrap JSON mode output in a Markdown fence anyway.
pub fn strip_code_fence(reply: &str) -> &str {
    match CODE_FENCE.captures(reply).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => reply.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(preview("Мурлыкать громко", 9), "Мурлыкать...");
    }

    #[test]
    fn test_strip_json_fence() {
        let reply = "```json\n[{\"id\":\"u2\",\"score\":0.8}]\n```";
        assert_eq!(strip_code_fence(reply), "[{\"id\":\"u2\",\"score\":0.8}]");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_unfenced_reply_is_trimmed() {
        assert_eq!(strip_code_fence("  [] \n"), "[]");
    }
}
