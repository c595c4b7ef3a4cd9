//! Token view over a parsed comrak document.

use comrak::nodes::{AstNode, NodeValue};

/// One block-level element, in document order.
///
/// Only headings carry data; everything else is opaque and labelled by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading { depth: u8, text: String },
    Block(&'static str),
}

impl Token {
    pub fn heading(depth: u8, text: impl Into<String>) -> Self {
        Token::Heading { depth, text: text.into() }
    }
}

/// Flatten the block nodes under `root` into tokens.
///
/// Blocks nested in quotes and list items are included at their position in
/// the source.
pub fn tokens<'a>(root: &'a AstNode<'a>) -> Vec<Token> {
    root.descendants()
        .skip(1)
        .filter_map(|node| {
            let data = node.data.borrow();
            if !data.value.block() {
                return None;
            }
            Some(match &data.value {
                NodeValue::Heading(heading) => Token::Heading { depth: heading.level, text: plain_text(node) },
                value => Token::Block(kind(value)),
            })
        })
        .collect()
}

/// Concatenated text of the inline nodes under `node`.
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.descendants() {
        match &child.data.borrow().value {
            NodeValue::Text(literal) => text.push_str(literal),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn kind(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Paragraph => "paragraph",
        NodeValue::BlockQuote => "blockquote",
        NodeValue::List(_) => "list",
        NodeValue::Item(_) => "item",
        NodeValue::CodeBlock(_) => "code",
        NodeValue::HtmlBlock(_) => "html",
        NodeValue::ThematicBreak => "hr",
        NodeValue::Table(_) => "table",
        _ => "other",
    }
}
