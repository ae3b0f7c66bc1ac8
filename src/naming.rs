/// File extension used for stored templates.
pub const TEMPLATE_EXT: &str = ".html";

/// Filename prefix shared by every stored template.
pub const TEMPLATE_PREFIX: &str = "template_";

/// Build the canonical filename for a template: `template_{id}_{slug}.html`.
///
/// The slug is derived from the human-readable template name when one is
/// available, otherwise the literal `template` is used. The slug is cosmetic;
/// only the embedded identifier is authoritative.
pub fn encode(template_id: u64, human_name: Option<&str>) -> String {
    let slug = match human_name {
        Some(name) => slugify(name),
        None => "template".to_string(),
    };
    format!("{TEMPLATE_PREFIX}{template_id}_{slug}{TEMPLATE_EXT}")
}

/// Extract the template identifier from a filename following the
/// `template_{id}_{slug}.html` convention.
///
/// Returns `None` for any filename that does not match the pattern. Callers
/// enumerating a directory use this to skip unrelated files rather than
/// treating them as errors.
pub fn decode(filename: &str) -> Option<u64> {
    let rest = filename.strip_prefix(TEMPLATE_PREFIX)?;
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 || !rest[digits_end..].starts_with('_') {
        return None;
    }
    rest[..digits_end].parse().ok()
}

/// Lowercase a template name and collapse every run of characters outside
/// `[a-z0-9]` into a single underscore, trimming underscores from both ends.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn encode_without_name_uses_literal_template_slug() {
        assert_eq!(encode(20993079, None), "template_20993079_template.html");
    }

    #[test]
    fn encode_slugifies_human_name() {
        assert_eq!(
            encode(20993079, Some("Carvana Car Recs")),
            "template_20993079_carvana_car_recs.html"
        );
    }

    #[rstest]
    #[case("Hi", "template_1_hi.html")]
    #[case("  Weekly Digest!  ", "template_1_weekly_digest.html")]
    #[case("50% Off -- Today", "template_1_50_off_today.html")]
    #[case("___", "template_1_.html")]
    fn encode_slug_cases(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(encode(1, Some(name)), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(555)]
    #[case(20993079)]
    #[case(u64::MAX)]
    fn decode_recovers_encoded_identifier(#[case] id: u64) {
        assert_eq!(decode(&encode(id, None)), Some(id));
        assert_eq!(decode(&encode(id, Some("Some Name"))), Some(id));
        assert_eq!(decode(&encode(id, Some("!!!"))), Some(id));
    }

    #[rstest]
    #[case("readme.html")]
    #[case("template.html")]
    #[case("template_.html")]
    #[case("template_abc_foo.html")]
    #[case("template_123.html")]
    #[case("notes.txt")]
    fn decode_rejects_non_matching_names(#[case] filename: &str) {
        assert_eq!(decode(filename), None);
    }

    #[test]
    fn decode_rejects_overflowing_identifier() {
        assert_eq!(decode("template_99999999999999999999999_x.html"), None);
    }
}
