use crate::model::Category;

#[rustfmt::skip]
const HIRAGANA: [(&str, &str); 46] = [
    ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
    ("か", "ka"), ("き", "ki"), ("く", "ku"), ("け", "ke"), ("こ", "ko"),
    ("さ", "sa"), ("し", "shi"), ("す", "su"), ("せ", "se"), ("そ", "so"),
    ("た", "ta"), ("ち", "chi"), ("つ", "tsu"), ("て", "te"), ("と", "to"),
    ("な", "na"), ("に", "ni"), ("ぬ", "nu"), ("ね", "ne"), ("の", "no"),
    ("は", "ha"), ("ひ", "hi"), ("ふ", "fu"), ("へ", "he"), ("ほ", "ho"),
    ("ま", "ma"), ("み", "mi"), ("む", "mu"), ("め", "me"), ("も", "mo"),
    ("や", "ya"), ("ゆ", "yu"), ("よ", "yo"), ("ら", "ra"), ("り", "ri"),
    ("る", "ru"), ("れ", "re"), ("ろ", "ro"), ("わ", "wa"), ("を", "wo"),
    ("ん", "n"),
];

#[rustfmt::skip]
const KATAKANA: [(&str, &str); 46] = [
    ("ア", "a"), ("イ", "i"), ("ウ", "u"), ("エ", "e"), ("オ", "o"),
    ("カ", "ka"), ("キ", "ki"), ("ク", "ku"), ("ケ", "ke"), ("コ", "ko"),
    ("サ", "sa"), ("シ", "shi"), ("ス", "su"), ("セ", "se"), ("ソ", "so"),
    ("タ", "ta"), ("チ", "chi"), ("ツ", "tsu"), ("テ", "te"), ("ト", "to"),
    ("ナ", "na"), ("ニ", "ni"), ("ヌ", "nu"), ("ネ", "ne"), ("ノ", "no"),
    ("ハ", "ha"), ("ヒ", "hi"), ("フ", "fu"), ("ヘ", "he"), ("ホ", "ho"),
    ("マ", "ma"), ("ミ", "mi"), ("ム", "mu"), ("メ", "me"), ("モ", "mo"),
    ("ヤ", "ya"), ("ユ", "yu"), ("ヨ", "yo"), ("ラ", "ra"), ("リ", "ri"),
    ("ル", "ru"), ("レ", "re"), ("ロ", "ro"), ("ワ", "wa"), ("ヲ", "wo"),
    ("ン", "n"),
];

fn table(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Hiragana => &HIRAGANA,
        Category::Katakana => &KATAKANA,
    }
}

/// Canonical romaji for a symbol, if it belongs to the category.
#[must_use]
pub fn romaji(category: Category, item: &str) -> Option<&'static str> {
    table(category)
        .iter()
        .find(|(symbol, _)| *symbol == item)
        .map(|(_, answer)| *answer)
}

/// All symbols of a category in gojūon order.
pub fn items(category: Category) -> impl Iterator<Item = &'static str> {
    table(category).iter().map(|(symbol, _)| *symbol)
}

/// Compares a learner's answer with the canonical romaji, ignoring case.
#[must_use]
pub fn check_answer(input: &str, answer: &str) -> bool {
    input.to_lowercase() == answer.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_romaji_per_category() {
        assert_eq!(romaji(Category::Hiragana, "し"), Some("shi"));
        assert_eq!(romaji(Category::Katakana, "ツ"), Some("tsu"));
        assert_eq!(romaji(Category::Hiragana, "ツ"), None);
    }

    #[test]
    fn tables_have_unique_symbols() {
        for category in Category::ALL {
            let mut symbols: Vec<_> = items(category).collect();
            assert_eq!(symbols.len(), 46);
            symbols.sort_unstable();
            symbols.dedup();
            assert_eq!(symbols.len(), 46, "duplicate symbol in {category}");
        }
    }

    #[test]
    fn answers_compare_case_insensitively() {
        assert!(check_answer("Shi", "shi"));
        assert!(check_answer("TSU", "tsu"));
        assert!(!check_answer("si", "shi"));
        assert!(!check_answer(" shi", "shi"));
    }
}
