use regex::Regex;
use std::sync::LazyLock;

/// A blank line followed by an all-caps run (optionally numbered) that ends
/// in a comma or newline. Runs on raw text, so CRLF line endings count too.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r?\n\r?\n[A-Z][A-Z\s]+(?:\d+)?\r?[,\n]").expect("heading pattern is valid")
});

/// Section title shapes, tried in order: numbered title first.
const TITLE_SHAPES: [&str; 2] = [r"(?i){name}\s*\d*", r"(?i){name}"];

/// Narrows `text` to the named section, running to the next heading or the
/// end of the text. Returns `text` unchanged when no section is requested or
/// the title does not occur.
pub fn locate<'a>(text: &'a str, section: Option<&str>) -> &'a str {
    let Some(name) = section else {
        return text;
    };
    let escaped = regex::escape(name);

    for shape in TITLE_SHAPES {
        let title = match Regex::new(&shape.replace("{name}", &escaped)) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(section = name, error = %e, "Invalid section title pattern");
                continue;
            }
        };

        if let Some(found) = title.find(text) {
            let end = HEADING
                .find_at(text, found.end())
                .map(|heading| heading.start())
                .unwrap_or(text.len());
            let scoped = &text[found.start()..end];
            tracing::debug!(
                section = name,
                bytes = scoped.len(),
                "Found section: {}",
                preview(scoped)
            );
            return scoped;
        }
    }

    tracing::debug!(section = name, "Section not found, searching whole report");
    text
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect::<String>().replace('\n', " / ")
}
