//! Allow-listed markdown for advisory text.
//!
//! Remote model output is parsed into a small set of structured nodes and
//! rendered from those. Anything outside the allow list (raw HTML, links,
//! images, nested structures) stays literal text, so remote text can never
//! smuggle markup into the display.

/// A span of inline text. Only plain and bold survive parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `#`..`###` headings; deeper levels clamp to 3.
    Heading { level: u8, text: String },
    Bullet(Vec<Inline>),
    Paragraph(Vec<Inline>),
}

/// Split a line into plain and `**bold**` spans. An unmatched `**` is
/// treated as literal text.
fn parse_inlines(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                if start > 0 {
                    spans.push(Inline::Text(rest[..start].to_string()));
                }
                spans.push(Inline::Strong(after[..end].to_string()));
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        spans.push(Inline::Text(rest.to_string()));
    }
    spans
}

/// Parse markdown-ish advisory text into nodes. Blank lines separate
/// paragraphs; consecutive plain lines merge into one paragraph.
pub fn parse(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut paragraph = String::new();

    let mut flush = |buf: &mut String, nodes: &mut Vec<Node>| {
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            nodes.push(Node::Paragraph(parse_inlines(trimmed)));
        }
        buf.clear();
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut nodes);
        } else if let Some(stripped) = trimmed.strip_prefix('#') {
            flush(&mut paragraph, &mut nodes);
            let extra = stripped.chars().take_while(|c| *c == '#').count();
            let level = (1 + extra).min(3) as u8;
            let text = stripped[extra..].trim_start().to_string();
            nodes.push(Node::Heading { level, text });
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* "))
        {
            flush(&mut paragraph, &mut nodes);
            nodes.push(Node::Bullet(parse_inlines(item)));
        } else {
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(trimmed);
        }
    }
    flush(&mut paragraph, &mut nodes);
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_bullets() {
        let nodes = parse("# Advice\n\n- save more\n- **cut** subscriptions\n");
        assert_eq!(
            nodes[0],
            Node::Heading {
                level: 1,
                text: "Advice".to_string()
            }
        );
        assert_eq!(nodes[1], Node::Bullet(vec![Inline::Text("save more".into())]));
        assert_eq!(
            nodes[2],
            Node::Bullet(vec![
                Inline::Strong("cut".into()),
                Inline::Text(" subscriptions".into())
            ])
        );
    }

    #[test]
    fn test_paragraph_merging() {
        let nodes = parse("line one\nline two\n\nline three");
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes[0],
            Node::Paragraph(vec![Inline::Text("line one line two".into())])
        );
    }

    #[test]
    fn test_html_stays_literal() {
        let nodes = parse("<script>alert(1)</script>");
        assert_eq!(
            nodes[0],
            Node::Paragraph(vec![Inline::Text("<script>alert(1)</script>".into())])
        );
    }

    #[test]
    fn test_unmatched_bold_is_literal() {
        let nodes = parse("oops ** not closed");
        assert_eq!(
            nodes[0],
            Node::Paragraph(vec![Inline::Text("oops ** not closed".into())])
        );
    }

    #[test]
    fn test_deep_heading_clamps() {
        let nodes = parse("##### tiny");
        assert_eq!(
            nodes[0],
            Node::Heading {
                level: 3,
                text: "tiny".to_string()
            }
        );
    }
}
