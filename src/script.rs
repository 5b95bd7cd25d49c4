//! Coarse writing-system detection used to pick a translation direction.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptCategory {
    /// Contains at least one Hangul character
    Hangul,
    /// Contains Hiragana or Katakana, and no Hangul
    KanaBearing,
    /// Contains CJK ideographs only
    HanOnly,
    /// None of the above
    Unclassified,
}

impl fmt::Display for ScriptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hangul => "hangul",
            Self::KanaBearing => "kana",
            Self::HanOnly => "han",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

fn is_hangul(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{11FF}'     // Jamo
        | '\u{3130}'..='\u{318F}'   // Compatibility Jamo
        | '\u{A960}'..='\u{A97F}'   // Jamo Extended-A
        | '\u{AC00}'..='\u{D7AF}'   // Syllables
        | '\u{D7B0}'..='\u{D7FF}'   // Jamo Extended-B
        | '\u{FFA0}'..='\u{FFDC}'   // Halfwidth Jamo
    )
}

fn is_kana(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'     // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
        | '\u{31F0}'..='\u{31FF}'   // Katakana Phonetic Extensions
        | '\u{FF66}'..='\u{FF9F}'   // Halfwidth Katakana
    )
}

fn is_han(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{3005}' | '\u{3007}'   // 々 〇
        | '\u{20000}'..='\u{2A6DF}' // Extension B
        | '\u{2A700}'..='\u{2EBEF}' // Extensions C-F
    )
}

/// Classify text by the scripts it contains.
///
/// Hangul wins over Kana, and Kana wins over Han, so mixed text such as
/// Japanese with kanji lands in `KanaBearing`.
pub fn classify(text: &str) -> ScriptCategory {
    let (mut kana, mut han) = (false, false);

    for c in text.chars() {
        if is_hangul(c) {
            return ScriptCategory::Hangul;
        }
        kana |= is_kana(c);
        han |= is_han(c);
    }

    if kana {
        ScriptCategory::KanaBearing
    } else if han {
        ScriptCategory::HanOnly
    } else {
        ScriptCategory::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangul_takes_precedence() {
        assert_eq!(classify("안녕하세요"), ScriptCategory::Hangul);
        assert_eq!(classify("東京에 갑니다"), ScriptCategory::Hangul);
        assert_eq!(classify("こんにちは 안녕"), ScriptCategory::Hangul);
        assert_eq!(classify("ㅋㅋㅋ"), ScriptCategory::Hangul);
    }

    #[test]
    fn test_kana_beats_han() {
        assert_eq!(classify("こんにちは"), ScriptCategory::KanaBearing);
        assert_eq!(classify("半導体の歩留まり"), ScriptCategory::KanaBearing);
        assert_eq!(classify("フォトレジスト"), ScriptCategory::KanaBearing);
        assert_eq!(classify("ｶﾀｶﾅ"), ScriptCategory::KanaBearing);
    }

    #[test]
    fn test_han_only() {
        assert_eq!(classify("你好"), ScriptCategory::HanOnly);
        assert_eq!(classify("光阻劑製程 OK!"), ScriptCategory::HanOnly);
        assert_eq!(classify("々"), ScriptCategory::HanOnly);
        assert_eq!(classify("〇"), ScriptCategory::HanOnly);
    }

    #[test]
    fn test_everything_else_is_unclassified() {
        assert_eq!(classify("hello world"), ScriptCategory::Unclassified);
        assert_eq!(classify("!!! 123 :-)"), ScriptCategory::Unclassified);
        assert_eq!(classify(""), ScriptCategory::Unclassified);
    }
}
