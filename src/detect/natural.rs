//! Natural-language identification for text inputs.

/// A detected natural/human language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NatLang {
    #[default]
    Unknown,
    English,
    Spanish,
    French,
    Portuguese,
    German,
    Italian,
    Dutch,
    Chinese,
    Arabic,
    Hindi,
    Indonesian,
    Bengali,
    Russian,
    Japanese,
}

impl std::fmt::Display for NatLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NatLang::Unknown => "Unknown",
            NatLang::English => "English",
            NatLang::Spanish => "Spanish",
            NatLang::French => "French",
            NatLang::Portuguese => "Portuguese",
            NatLang::German => "German",
            NatLang::Italian => "Italian",
            NatLang::Dutch => "Dutch",
            NatLang::Chinese => "Chinese",
            NatLang::Arabic => "Arabic",
            NatLang::Hindi => "Hindi",
            NatLang::Indonesian => "Indonesian",
            NatLang::Bengali => "Bengali",
            NatLang::Russian => "Russian",
            NatLang::Japanese => "Japanese",
        };
        f.write_str(name)
    }
}

/// Function-word indicators per Latin-script language. Each hit counts
/// once; a language needs at least three hits to be claimed.
static ENGLISH_WORDS: &[&str] = &[
    " the ", " and ", " is ", " to ", " of ", " a ", " in ", " that ", " it ", " for ",
    " with ", " as ", " was ", " are ", " be ", " have ",
];

static SPANISH_WORDS: &[&str] = &[
    " el ", " la ", " los ", " las ", " de ", " en ", " que ", " es ", " un ", " una ",
    " para ", " con ", " por ", "ción", "ñ",
];

static FRENCH_WORDS: &[&str] = &[
    " le ", " la ", " les ", " de ", " et ", " est ", " un ", " une ", " que ", " pour ",
    " avec ", " dans ", "ç", "œ", "ê", "è",
];

static PORTUGUESE_WORDS: &[&str] = &[
    " o ", " a ", " os ", " as ", " de ", " em ", " que ", " é ", " um ", " uma ",
    " para ", " com ", " não ", "ção", "ã",
];

static GERMAN_WORDS: &[&str] = &[
    " der ", " die ", " das ", " und ", " ist ", " ein ", " eine ", " für ", " mit ",
    " auf ", " nicht ", " sich ", "ß", "ü", "ö", "ä",
];

static ITALIAN_WORDS: &[&str] = &[
    " il ", " la ", " i ", " le ", " di ", " che ", " è ", " un ", " una ", " per ",
    " con ", " non ", " sono ", " della ",
];

static DUTCH_WORDS: &[&str] = &[
    " de ", " het ", " een ", " van ", " en ", " is ", " op ", " te ", " dat ",
    " niet ", " met ", " voor ", "ij", "oe",
];

static INDONESIAN_WORDS: &[&str] = &[
    " yang ", " dan ", " di ", " ini ", " itu ", " dengan ", " untuk ", " dari ",
    " pada ", " adalah ", " tidak ", " ke ", "kan ", "nya ",
];

/// Identify the natural language of `text`.
///
/// Non-Latin scripts win outright by Unicode range, with Japanese kana
/// taking precedence over CJK ideographs when both appear. Latin-script
/// languages are scored by function-word hits.
pub(super) fn detect_natural_language(text: &str) -> NatLang {
    if text.is_empty() {
        return NatLang::Unknown;
    }

    let mut has_arabic = false;
    let mut has_chinese = false;
    let mut has_japanese = false;
    let mut has_hindi = false;
    let mut has_bengali = false;
    let mut has_russian = false;

    for c in text.chars() {
        match c as u32 {
            0x0600..=0x06FF => has_arabic = true,
            0x4E00..=0x9FFF => has_chinese = true,
            0x3040..=0x30FF => has_japanese = true,
            0x0900..=0x097F => has_hindi = true,
            0x0980..=0x09FF => has_bengali = true,
            0x0400..=0x04FF => has_russian = true,
            _ => {}
        }
    }

    if has_arabic {
        return NatLang::Arabic;
    }
    if has_japanese {
        return NatLang::Japanese;
    }
    if has_chinese {
        return NatLang::Chinese;
    }
    if has_hindi {
        return NatLang::Hindi;
    }
    if has_bengali {
        return NatLang::Bengali;
    }
    if has_russian {
        return NatLang::Russian;
    }

    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();

    let scores = [
        (hits(ENGLISH_WORDS), NatLang::English),
        (hits(SPANISH_WORDS), NatLang::Spanish),
        (hits(FRENCH_WORDS), NatLang::French),
        (hits(PORTUGUESE_WORDS), NatLang::Portuguese),
        (hits(GERMAN_WORDS), NatLang::German),
        (hits(ITALIAN_WORDS), NatLang::Italian),
        (hits(DUTCH_WORDS), NatLang::Dutch),
        (hits(INDONESIAN_WORDS), NatLang::Indonesian),
    ];

    let mut best_score = 0;
    let mut best = NatLang::Unknown;
    for (score, lang) in scores {
        if score > best_score {
            best_score = score;
            best = lang;
        }
    }

    if best_score < 3 {
        return NatLang::Unknown;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_prose() {
        assert_eq!(
            detect_natural_language("the cat is on the mat and it is happy to be there with a friend"),
            NatLang::English
        );
    }

    #[test]
    fn spanish_prose() {
        assert_eq!(
            detect_natural_language("el perro corre en la calle y es un animal que vive con la familia"),
            NatLang::Spanish
        );
    }

    #[test]
    fn german_prose() {
        assert_eq!(
            detect_natural_language("der hund und die katze sind ein gutes paar für das haus"),
            NatLang::German
        );
    }

    #[test]
    fn scripts_win_over_word_lists() {
        assert_eq!(detect_natural_language("Привет мир"), NatLang::Russian);
        assert_eq!(detect_natural_language("مرحبا بالعالم"), NatLang::Arabic);
        assert_eq!(detect_natural_language("你好世界"), NatLang::Chinese);
        assert_eq!(detect_natural_language("नमस्ते दुनिया"), NatLang::Hindi);
    }

    #[test]
    fn kana_beats_ideographs() {
        // Japanese text mixes kanji (CJK range) with kana.
        assert_eq!(detect_natural_language("日本語のテキストです"), NatLang::Japanese);
    }

    #[test]
    fn too_few_hits_is_unknown() {
        assert_eq!(detect_natural_language("xyzzy plugh"), NatLang::Unknown);
    }
}
