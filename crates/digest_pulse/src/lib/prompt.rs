//! Prompt templates with `{name}` placeholders.

/// Fills every `{name}` placeholder of `template` with its value from `vars`.
///
/// The template is scanned once, so braces inside substituted values are
/// copied through as text. Placeholders without a value are left as they are.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let tail = &rest[open..];

        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                filled.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                filled.push('{');
                rest = &tail[1..];
            }
        }
    }
    filled.push_str(rest);

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_every_placeholder() {
        let filled = fill(
            "part {part} of \"{title}\", again {title}",
            &[("title", "Embeddings"), ("part", "2")],
        );
        assert_eq!(filled, "part 2 of \"Embeddings\", again Embeddings");
    }

    #[test]
    fn test_values_are_not_filled_again() {
        let filled = fill(
            "{title}: {transcript}",
            &[("title", "Why {transcript} matters"), ("transcript", "text")],
        );
        assert_eq!(filled, "Why {transcript} matters: text");
    }

    #[test]
    fn test_unknown_and_unclosed_braces_are_kept() {
        let filled = fill("{\"a\": 1} {x} [[tag]] {open", &[("x", "y")]);
        assert_eq!(filled, "{\"a\": 1} y [[tag]] {open");
    }
}
