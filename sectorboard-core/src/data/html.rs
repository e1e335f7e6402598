//! Minimal HTML scanning for table extraction.
//!
//! Just enough to walk `<table>`/`<tr>`/`<th>`/`<td>` blocks in a fetched
//! page and reduce cell markup to text. Case-insensitive on tag names,
//! tolerant of attributes inside the opening tag.

/// Find the next `<tag ...>...</tag>` block at or after `from`.
///
/// Returns the byte range of the whole block (opening tag through closing
/// tag). `tag` is bare ("table", "tr", ...).
pub fn next_block(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lower = s.to_ascii_lowercase();
    let open = format!("<{}", tag.to_ascii_lowercase());
    let close = format!("</{}", tag.to_ascii_lowercase());

    let mut at = from;
    let start = loop {
        let hit = lower.get(at..)?.find(&open)? + at;
        // Reject prefix matches like "<tradename" when scanning for "<tr".
        match s.as_bytes().get(hit + open.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {
                break hit
            }
            _ => at = hit + open.len(),
        }
    };
    let close_at = lower.get(start..)?.find(&close)? + start;
    let end = s.get(close_at..)?.find('>')? + close_at + 1;
    Some((start, end))
}

/// The content between a block's opening and closing tags.
pub fn inner(block: &str) -> &str {
    let open_end = match block.find('>') {
        Some(i) => i + 1,
        None => return "",
    };
    let close_start = match block.rfind("</") {
        Some(i) if i >= open_end => i,
        _ => return "",
    };
    &block[open_end..close_start]
}

/// Strip all tags, decode common entities, normalize whitespace.
pub fn text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

/// Decode the handful of entities that actually occur in the source page.
pub fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_block_with_attributes() {
        let s = r#"junk <TABLE class="wikitable">body</table> tail"#;
        let (a, b) = next_block(s, "table", 0).unwrap();
        assert_eq!(&s[a..b], r#"<TABLE class="wikitable">body</table>"#);
    }

    #[test]
    fn rejects_prefix_tag_matches() {
        let s = "<tradename>x</tradename><tr>row</tr>";
        let (a, b) = next_block(s, "tr", 0).unwrap();
        assert_eq!(&s[a..b], "<tr>row</tr>");
    }

    #[test]
    fn no_block_returns_none() {
        assert!(next_block("<p>no tables here</p>", "table", 0).is_none());
    }

    #[test]
    fn inner_strips_open_and_close() {
        assert_eq!(inner("<td class=\"x\"> MMM </td>"), " MMM ");
        assert_eq!(inner("<td/>"), "");
    }

    #[test]
    fn text_strips_tags_and_decodes() {
        let cell = r#"<a href="/wiki/3M">3M</a> &amp; Co."#;
        assert_eq!(text(cell), "3M & Co.");
    }

    #[test]
    fn text_collapses_whitespace() {
        assert_eq!(text("  a\n   b  "), "a b");
    }
}
