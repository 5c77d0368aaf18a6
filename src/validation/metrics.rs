//! Deterministic text metrics used by the pre-filter.
//!
//! Word count and emoji count are separate quantities from the candidate's
//! character length (see `domain::char_length`). Emoji are classified with
//! the Unicode emoji properties, one grapheme cluster at a time.

use icu_properties::CodePointSetData;
use icu_properties::props::{Emoji, EmojiPresentation};
use unicode_segmentation::UnicodeSegmentation;

/// Combining enclosing keycap, as in `1️⃣`.
const KEYCAP: char = '\u{20E3}';

/// Variation selector requesting emoji presentation.
const EMOJI_VARIATION: char = '\u{FE0F}';

/// Number of whitespace-separated tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of emoji in `text`.
///
/// A multi-codepoint sequence (ZWJ family, skin tone modifier, flag, keycap)
/// is one user-perceived character and counts once.
pub fn emoji_count(text: &str) -> usize {
    text.graphemes(true).filter(|g| is_emoji_grapheme(g)).count()
}

/// A cluster is an emoji when it renders as one: a keycap, a code point with
/// default emoji presentation, or an emoji code point followed by U+FE0F.
/// Text-default symbols such as `™` or a bare `❤` do not count.
fn is_emoji_grapheme(grapheme: &str) -> bool {
    let emoji = CodePointSetData::new::<Emoji>();
    let presentation = CodePointSetData::new::<EmojiPresentation>();

    let mut chars = grapheme.chars().peekable();
    while let Some(c) = chars.next() {
        if c == KEYCAP || presentation.contains(c) {
            return true;
        }
        if emoji.contains(c) && chars.peek() == Some(&EMOJI_VARIATION) {
            return true;
        }
    }
    false
}
