//! Rules text cleanup.
//!
//! Descriptions in the source format are HTML fragments sprinkled with
//! enricher syntax such as `@UUID[...]{Grabbed}`, `@Damage[2d6[fire]]`,
//! `@Check[type:reflex|dc:20|basic:true]` and inline rolls `[[/r 1d4]]`.
//! [`sanitize`] turns them into plain text, one paragraph per line.

use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

// Static regex patterns (compiled once)
static BLOCK_BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
static DAMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static DAMAGE_CATEGORY_REGEX: OnceLock<Regex> = OnceLock::new();
static CHECK_REGEX: OnceLock<Regex> = OnceLock::new();
static TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();
static LABELED_ENRICHER_REGEX: OnceLock<Regex> = OnceLock::new();
static BARE_ENRICHER_REGEX: OnceLock<Regex> = OnceLock::new();
static INLINE_ROLL_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static SPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("sanitizer regex pattern is invalid"))
}

/// Convert a marked-up description into plain text.
///
/// Paragraph boundaries (`</p>`, `<br>`, `<hr>`, list items, headings) become
/// line breaks; everything else collapses to single spaces.
pub fn sanitize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let re = regex(
        &BLOCK_BREAK_REGEX,
        r"(?i)</p>|<br\s*/?>|<hr\s*/?>|</li>|</h[1-6]>|</tr>",
    );
    let text = re.replace_all(text, "\n");

    let re = regex(
        &DAMAGE_REGEX,
        r"@Damage\[((?:[^\[\]]|\[[^\[\]]*\])*)\](?:\{([^}]*)\})?",
    );
    let text = re.replace_all(&text, |caps: &Captures| match caps.get(2) {
        Some(label) => label.as_str().to_string(),
        None => format_damage(&caps[1]),
    });

    let re = regex(&CHECK_REGEX, r"@Check\[([^\]]*)\](?:\{([^}]*)\})?");
    let text = re.replace_all(&text, |caps: &Captures| match caps.get(2) {
        Some(label) => label.as_str().to_string(),
        None => format_check(&caps[1]),
    });

    let re = regex(&TEMPLATE_REGEX, r"@Template\[([^\]]*)\](?:\{([^}]*)\})?");
    let text = re.replace_all(&text, |caps: &Captures| match caps.get(2) {
        Some(label) => label.as_str().to_string(),
        None => format_template(&caps[1]),
    });

    let re = regex(&LABELED_ENRICHER_REGEX, r"@\w+\[[^\]]*\]\{([^}]*)\}");
    let text = re.replace_all(&text, "$1");

    let re = regex(&BARE_ENRICHER_REGEX, r"@\w+\[([^\]]*)\]");
    let text = re.replace_all(&text, |caps: &Captures| {
        let target = &caps[1];
        target.rsplit('.').next().unwrap_or(target).to_string()
    });

    let re = regex(
        &INLINE_ROLL_REGEX,
        r"\[\[/\w+\s+([^\]#]*?)\s*(?:#[^\]]*)?\]\](?:\{([^}]*)\})?",
    );
    let text = re.replace_all(&text, |caps: &Captures| match caps.get(2) {
        Some(label) => label.as_str().to_string(),
        None => caps[1].trim().to_string(),
    });

    let re = regex(&TAG_REGEX, r"<[^>]*>");
    let text = re.replace_all(&text, "");

    let text = decode_entities(&text);

    let re = regex(&SPACE_REGEX, r"[ \t\r\x{A0}]+");
    text.lines()
        .map(|line| re.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `2d6+4[fire],1d6[persistent,bleed]` -> `2d6+4 fire, 1d6 persistent bleed`
fn format_damage(formula: &str) -> String {
    let re = regex(&DAMAGE_CATEGORY_REGEX, r"\[([^\]]*)\]");
    let spaced = re.replace_all(formula, |caps: &Captures| {
        format!(" {}", caps[1].replace(',', " "))
    });
    spaced
        .replace(['(', ')'], "")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split enricher parameters `reflex|dc:20|basic:true` into (key, value)
/// pairs; a leading bare word is treated as the `type` parameter.
fn parameters(params: &str) -> Vec<(String, String)> {
    params
        .split('|')
        .enumerate()
        .filter_map(|(i, part)| {
            let part = part.trim();
            match part.split_once(':') {
                Some((k, v)) => Some((k.trim().to_lowercase(), v.trim().to_string())),
                None if i == 0 && !part.is_empty() => Some(("type".to_string(), part.to_string())),
                None => None,
            }
        })
        .collect()
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// `type:reflex|dc:20|basic:true` -> `DC 20 basic Reflex`
fn format_check(params: &str) -> String {
    let params = parameters(params);
    let check = capitalize(param(&params, "type").unwrap_or_default());
    let basic = param(&params, "basic").is_some_and(|b| b.eq_ignore_ascii_case("true"));

    let mut parts = Vec::new();
    if let Some(dc) = param(&params, "dc") {
        parts.push(format!("DC {}", dc));
    }
    if basic {
        parts.push("basic".to_string());
    }
    if !check.is_empty() {
        parts.push(check);
    }
    parts.join(" ")
}

/// `type:cone|distance:30` -> `30-foot cone`
fn format_template(params: &str) -> String {
    let params = parameters(params);
    let shape = param(&params, "type").unwrap_or_default();
    match param(&params, "distance") {
        Some(distance) => format!("{}-foot {}", distance, shape).trim().to_string(),
        None => shape.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_and_keeps_paragraphs() {
        assert_eq!(
            sanitize("<p>The naga <strong>bites</strong>.</p><p>Second&nbsp;paragraph.</p>"),
            "The naga bites.\nSecond paragraph."
        );
    }

    #[test]
    fn horizontal_rules_split_paragraphs() {
        assert_eq!(
            sanitize("<p>Trigger a creature moves</p><hr /><p>Effect the naga bites</p>"),
            "Trigger a creature moves\nEffect the naga bites"
        );
    }

    #[test]
    fn labeled_links_use_label() {
        assert_eq!(
            sanitize("The target is @UUID[Compendium.pf2e.conditionitems.Item.Grabbed]{Grabbed}."),
            "The target is Grabbed."
        );
    }

    #[test]
    fn bare_links_use_last_segment() {
        assert_eq!(
            sanitize("It becomes @UUID[Compendium.pf2e.conditionitems.Item.Frightened] 1."),
            "It becomes Frightened 1."
        );
    }

    #[test]
    fn damage_enrichers_render_formula() {
        assert_eq!(sanitize("Deals @Damage[2d6[fire]] damage."), "Deals 2d6 fire damage.");
        assert_eq!(
            sanitize("Deals @Damage[(2d6+4)[piercing],1d6[persistent,bleed]] damage."),
            "Deals 2d6+4 piercing, 1d6 persistent bleed damage."
        );
        assert_eq!(
            sanitize("Deals @Damage[2d6[fire]]{2d6 fire damage}."),
            "Deals 2d6 fire damage."
        );
    }

    #[test]
    fn check_enrichers_render_dc() {
        assert_eq!(
            sanitize("Each creature attempts a @Check[type:reflex|dc:29|basic:true] save."),
            "Each creature attempts a DC 29 basic Reflex save."
        );
        assert_eq!(
            sanitize("Attempt a @Check[fortitude|dc:20] save."),
            "Attempt a DC 20 Fortitude save."
        );
    }

    #[test]
    fn template_enrichers_render_area() {
        assert_eq!(
            sanitize("Breathes in a @Template[type:cone|distance:30]."),
            "Breathes in a 30-foot cone."
        );
    }

    #[test]
    fn inline_rolls_render_formula() {
        assert_eq!(sanitize("Recharges in [[/r 1d4 #rounds]] rounds."), "Recharges in 1d4 rounds.");
        assert_eq!(
            sanitize("Recharges in [[/r 1d4 #rounds]]{1d4 rounds}."),
            "Recharges in 1d4 rounds."
        );
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(sanitize("Fish &amp; chips &lt;3"), "Fish & chips <3");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("<p></p>"), "");
    }
}
