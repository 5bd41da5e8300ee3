use crate::core::range;
use crate::utils::error::Result;
use regex::Regex;
use std::ops::Range;

/// Unit tokens that anchor an exact-tier match.
const UNITS: &str = r"(?:mg/dl|ng/ml|µg/dl|g/dl|%|pg/ml)";
const NUMBER: &str = r"([0-9]+\.?[0-9]*)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Value must carry a known unit.
    Exact,
    /// Any number next to the alias.
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    /// `Method: ...` line, value on the next line, alias on the line after.
    MethodThenMarker,
    /// Alias, then the value later on the same line.
    MarkerThenValue,
    /// Alias, then the value at the start of a later line.
    MarkerThenNextLine,
}

struct PatternTemplate {
    tier: Tier,
    family: PatternFamily,
    template: &'static str,
}

/// The whole cascade, in the order it is tried.
const CASCADE: [PatternTemplate; 6] = [
    PatternTemplate {
        tier: Tier::Exact,
        family: PatternFamily::MethodThenMarker,
        template: r"Method:.*?\n\s*{number}\s*{unit}[^\n]*\n[^\n]*{marker}",
    },
    PatternTemplate {
        tier: Tier::Exact,
        family: PatternFamily::MarkerThenValue,
        template: r"{marker}.*?{number}\s*{unit}",
    },
    PatternTemplate {
        tier: Tier::Exact,
        family: PatternFamily::MarkerThenNextLine,
        template: r"{marker}.*?\n\s*{number}\s*{unit}",
    },
    PatternTemplate {
        tier: Tier::General,
        family: PatternFamily::MarkerThenValue,
        template: r"{marker}\s*{number}",
    },
    PatternTemplate {
        tier: Tier::General,
        family: PatternFamily::MarkerThenNextLine,
        template: r"{marker}.*?\n\s*{number}",
    },
    PatternTemplate {
        tier: Tier::General,
        family: PatternFamily::MethodThenMarker,
        template: r"Method:.*?\n\s*{number}[^\n]*\n[^\n]*{marker}",
    },
];

/// A syntactic match that passed range validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub tier: Tier,
    pub family: PatternFamily,
    /// Byte span of the whole match in the searched text.
    pub span: Range<usize>,
    pub value: f64,
}

struct CompiledPattern {
    tier: Tier,
    family: PatternFamily,
    regex: Regex,
}

/// The value cascade compiled for one alias phrase.
pub struct AliasMatcher {
    alias: String,
    patterns: Vec<CompiledPattern>,
}

impl AliasMatcher {
    pub fn new(alias: &str) -> Result<Self> {
        let marker = regex::escape(alias);
        let patterns = CASCADE
            .iter()
            .map(|t| {
                let source = t
                    .template
                    .replace("{marker}", &marker)
                    .replace("{number}", NUMBER)
                    .replace("{unit}", UNITS);
                Ok(CompiledPattern {
                    tier: t.tier,
                    family: t.family,
                    regex: Regex::new(&format!("(?im){}", source))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            alias: alias.to_string(),
            patterns,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// First candidate, across every tier, pattern and match, that the
    /// range validator accepts for `marker`.
    pub fn find(&self, text: &str, marker: &str) -> Option<Candidate> {
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let Ok(value) = number.as_str().parse::<f64>() else {
                    continue;
                };

                tracing::debug!(
                    marker,
                    alias = %self.alias,
                    tier = ?pattern.tier,
                    family = ?pattern.family,
                    value,
                    context = %context(text, whole.range()),
                    "Potential match"
                );

                if range::validate(marker, value) {
                    return Some(Candidate {
                        tier: pattern.tier,
                        family: pattern.family,
                        span: whole.range(),
                        value,
                    });
                }
            }
        }
        None
    }
}

/// Up to 50 bytes either side of the match, snapped to char boundaries.
fn context(text: &str, span: Range<usize>) -> String {
    let mut start = span.start.saturating_sub(50);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (span.end + 50).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].replace('\n', " / ")
}
