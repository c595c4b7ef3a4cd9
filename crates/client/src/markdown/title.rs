//! Document title selection from heading tokens.

use super::Token;

/// Pick the document title from `tokens`.
///
/// A depth-1 heading wins immediately. Otherwise the title is the last-seen
/// text at the shallowest depth that appears. No headings means no title.
pub fn extract_title(tokens: &[Token]) -> Option<String> {
    let mut best: Option<(u8, &str)> = None;

    for token in tokens {
        let Token::Heading { depth, text } = token else {
            continue;
        };

        if *depth == 1 {
            return Some(text.clone());
        }

        // Ties replace, so the last heading at the shallowest depth wins.
        if best.is_none_or(|(best_depth, _)| *depth <= best_depth) {
            best = Some((*depth, text.as_str()));
        }
    }

    best.map(|(_, text)| text.to_string())
}
