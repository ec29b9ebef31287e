use anyhow::{Context, Result};
use regex::{NoExpand, Regex};

/// Name/school normalizer. Compiles its replacement rules once; the acronym
/// table comes from configuration because it encodes one dataset's
/// school-naming conventions rather than a general rule.
pub struct Normalizer {
    acronym_rules: Vec<(Regex, String)>,
    al_muhajirin: Regex,
    school_pattern: Regex,
}

impl Normalizer {
    pub fn new(acronyms: &[String]) -> Result<Self> {
        let mut acronym_rules = Vec::with_capacity(acronyms.len());
        for acronym in acronyms {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(acronym));
            let regex = Regex::new(&pattern)
                .with_context(|| format!("Invalid acronym pattern: {}", acronym))?;
            acronym_rules.push((regex, acronym.to_uppercase()));
        }

        // Any spelling of "Al Muhajirin" / "Al-Muhajirin" collapses to one token.
        let al_muhajirin = Regex::new(r"(?i)\bAl[- ]?Muhajirin\b")?;

        // (SD|SDS) [Plus]? <digits> [Al][- ]?Muhajirin <anything> -> canonical form.
        let school_pattern =
            Regex::new(r"(?i)^(SD|SDS)(?:\s+Plus)?\s+(\d+)\s+(?:Al\s*[- ]*)?Muhajirin\b.*$")?;

        Ok(Self {
            acronym_rules,
            al_muhajirin,
            school_pattern,
        })
    }

    /// Lowercase everything, then capitalize the first letter of every
    /// whitespace-delimited token and after internal hyphens
    /// ("al-muhajirin" -> "Al-Muhajirin"), then restore known acronyms and
    /// collapse AlMuhajirin spellings. Idempotent.
    pub fn normalize_name(&self, raw: &str) -> String {
        if raw.is_empty() {
            return raw.to_string();
        }

        let mut out = smart_title_case(raw);
        for (regex, replacement) in &self.acronym_rules {
            out = regex
                .replace_all(&out, NoExpand(replacement.as_str()))
                .into_owned();
        }
        self.al_muhajirin
            .replace_all(&out, NoExpand("AlMuhajirin"))
            .into_owned()
    }

    /// Like [`normalize_name`], plus the school-specific rewrite: recognized
    /// AlMuhajirin school spellings become "SDS Plus <digits> AlMuhajirin"
    /// with any trailing text (e.g. ", Purwakarta") discarded. Non-matching
    /// names fall through to the generic result unchanged.
    ///
    /// [`normalize_name`]: Normalizer::normalize_name
    pub fn normalize_school(&self, raw: &str) -> String {
        let out = self.normalize_name(raw);
        if let Some(caps) = self.school_pattern.captures(&out) {
            return format!("SDS Plus {} AlMuhajirin", &caps[2]);
        }
        out
    }
}

fn smart_title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut capitalize_next = true;
    for ch in input.chars() {
        if ch.is_whitespace() || ch == '-' {
            capitalize_next = true;
            out.push(ch);
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
