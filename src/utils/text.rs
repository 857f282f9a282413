//! Page text helpers.

use scraper::Html;

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: [&str; 34] = [
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "div", "dl",
    "dt", "figcaption", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "title", "tr",
];

/// Visible text of an HTML document, one line per block of markup.
///
/// Text inside inline elements joins its neighbours directly, so
/// `Church<b>gate</b>` reads `Churchgate`. Whitespace within a line is
/// collapsed and blank lines are dropped. Malformed markup is tolerated;
/// the parser recovers the way browsers do.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    let mut previous_block = None;
    let mut pending_break = false;
    for node in document.tree.root().descendants() {
        if let Some(el) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&el.name()) {
                pending_break = true;
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let block = node
            .ancestors()
            .find(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| BLOCK_ELEMENTS.contains(&el.name()))
            })
            .map(|ancestor| ancestor.id());
        if pending_break || block != previous_block {
            raw.push('\n');
        }
        raw.push_str(text);
        previous_block = block;
        pending_break = false;
    }

    raw.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"mira-bhayandar  east"` becomes `"Mira-Bhayandar East"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in normalize_whitespace(s).chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"<html><head><style>.x{}</style><script>var from = "a to b";</script></head>
            <body><h1>Route 42</h1><p>From <b>Andheri</b> to Churchgate</p></body></html>"#;
        assert_eq!(visible_text(html), "Route 42\nFrom Andheri to Churchgate");
    }

    #[test]
    fn test_visible_text_tolerates_broken_markup() {
        let html = "<div><p>every 15 minutes <span>first bus 05:30</div></td>";
        assert_eq!(visible_text(html), "every 15 minutes first bus 05:30");
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        assert_eq!(visible_text("<p>Church<b>gate</b></p>"), "Churchgate");
        assert_eq!(
            visible_text("<p>every 1<b>5</b> minutes</p>"),
            "every 15 minutes"
        );
    }

    #[test]
    fn test_blocks_and_breaks_start_new_lines() {
        let html = "<table><tr><td>Timings</td><td>06:00 - 22:30</td></tr></table>\
                    <p>Colaba<br>Worli</p><div>a<div>b</div>c</div>";
        assert_eq!(
            visible_text(html),
            "Timings\n06:00 - 22:30\nColaba\nWorli\na\nb\nc"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("andheri"), "Andheri");
        assert_eq!(title_case("  mira-bhayandar   east "), "Mira-Bhayandar East");
        assert_eq!(title_case("CST depot"), "Cst Depot");
    }
}
