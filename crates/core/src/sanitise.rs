//! Note-body sanitisation.
//!
//! Clinical note text arrives from the source schema as stored markup.
//! It is never injected into a page verbatim: this module reduces it to
//! plain text (tags stripped, character entities decoded, invisible and
//! control characters removed) and the renderer escapes the result like
//! any other value.

/// Reduces stored note markup to displayable plain text.
///
/// Block-level closers and `<br>` become newlines so paragraph structure
/// survives the strip; `<script>` and `<style>` elements are dropped along
/// with their content. Runs of blank lines collapse to a single blank line.
pub fn note_text_plain(raw: &str) -> String {
    let (stripped, dropped) = strip_tags(raw);
    if dropped > 0 {
        // Content stays out of the log (PHI); the count is enough to audit.
        tracing::warn!(removed_elements = dropped, "active content removed from note body");
    }
    let decoded = decode_entities(&stripped);
    let visible = remove_invisible_chars(&decoded);
    collapse_blank_lines(visible.trim())
}

/// Tags whose content must not surface as text.
const DROP_CONTENT: [&str; 2] = ["script", "style"];

/// Tags that terminate a block of text.
const BLOCK_BREAKS: [&str; 7] = ["br", "/p", "/div", "/li", "/tr", "/h1", "/h2"];

fn strip_tags(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('>') else {
            // Unterminated tag: drop the remainder.
            return (out, dropped);
        };
        let tag_body = &after[..close];
        let tag_name = tag_name_of(tag_body);

        rest = &after[close + 1..];

        if DROP_CONTENT.contains(&tag_name.as_str()) {
            dropped += 1;
            let closer = format!("</{tag_name}");
            if let Some(end) = rest.to_ascii_lowercase().find(&closer) {
                let tail = &rest[end..];
                match tail.find('>') {
                    Some(gt) => rest = &tail[gt + 1..],
                    None => return (out, dropped),
                }
            } else {
                return (out, dropped);
            }
            if !out.ends_with(char::is_whitespace) && !out.is_empty() {
                out.push(' ');
            }
            continue;
        }

        if BLOCK_BREAKS.contains(&tag_name.as_str()) {
            out.push('\n');
        } else if !tag_name.is_empty() && !out.ends_with(char::is_whitespace) {
            // Inline tag boundaries keep adjacent words apart.
            out.push(' ');
        }
    }

    out.push_str(rest);
    (out, dropped)
}

fn tag_name_of(tag_body: &str) -> String {
    let trimmed = tag_body.trim();
    let slash = trimmed.starts_with('/');
    let name: String = trimmed
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if slash {
        format!("/{name}")
    } else {
        name
    }
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        match decode_entity(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes one leading entity, returning the replacement text and the number
/// of input bytes consumed.
fn decode_entity(input: &str) -> Option<(String, usize)> {
    let semi = input
        .char_indices()
        .take(12)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let body = &input[1..semi];
    let decoded = match body {
        "amp" => "&".to_owned(),
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "quot" => "\"".to_owned(),
        "apos" => "'".to_owned(),
        "nbsp" => " ".to_owned(),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?.to_string()
        }
    };
    Some((decoded, semi + 1))
}

/// Drops zero-width/formatting characters and C0 controls, preserving
/// ordinary whitespace.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}' | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(line);
            blank_run = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_simple_markup() {
        assert_eq!(
            note_text_plain("<p>Impression: <b>no acute findings</b></p>"),
            "Impression: no acute findings"
        );
    }

    #[test]
    fn test_block_tags_become_newlines() {
        assert_eq!(
            note_text_plain("<p>Line one</p><p>Line two</p>"),
            "Line one\nLine two"
        );
        assert_eq!(note_text_plain("one<br>two<br/>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_script_content_is_dropped() {
        assert_eq!(
            note_text_plain("before<script>alert('x')</script>after"),
            "before after"
        );
        assert_eq!(
            note_text_plain("a<style type=\"text/css\">p { color: red }</style>b"),
            "a b"
        );
    }

    #[test]
    fn test_event_handlers_do_not_survive() {
        let out = note_text_plain("<img src=x onerror=\"alert(1)\">finding");
        assert!(!out.contains("onerror"));
        assert!(out.contains("finding"));
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(note_text_plain("BP &lt; 120 &amp; stable"), "BP < 120 & stable");
        assert_eq!(note_text_plain("O&#39;Brien"), "O'Brien");
        assert_eq!(note_text_plain("temp&nbsp;37&#x2103;"), "temp 37\u{2103}");
    }

    #[test]
    fn test_unknown_entity_left_alone() {
        assert_eq!(note_text_plain("AT&T &bogus; rest"), "AT&T &bogus; rest");
    }

    #[test]
    fn test_invisible_characters_removed() {
        assert_eq!(note_text_plain("sta\u{200B}ble\u{202E}"), "stable");
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(
            note_text_plain("<p>a</p><p></p><p></p><p>b</p>"),
            "a\n\nb"
        );
    }

    #[test]
    fn test_unterminated_tag_truncates_safely() {
        assert_eq!(note_text_plain("ok <img src="), "ok");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(note_text_plain("no markup at all"), "no markup at all");
    }
}
