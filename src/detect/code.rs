//! Programming-language identification for source-code inputs.

/// A detected programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeLang {
    #[default]
    Unknown,
    Go,
    Python,
    JavaScript,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Rust,
    Php,
    Swift,
    Kotlin,
}

impl std::fmt::Display for CodeLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CodeLang::Unknown => "Unknown",
            CodeLang::Go => "Go",
            CodeLang::Python => "Python",
            CodeLang::JavaScript => "JavaScript",
            CodeLang::Java => "Java",
            CodeLang::C => "C",
            CodeLang::Cpp => "C++",
            CodeLang::CSharp => "C#",
            CodeLang::Ruby => "Ruby",
            CodeLang::Rust => "Rust",
            CodeLang::Php => "PHP",
            CodeLang::Swift => "Swift",
            CodeLang::Kotlin => "Kotlin",
        };
        f.write_str(name)
    }
}

/// A substring indicator contributing `weight` when present.
type Indicator = (&'static str, u32);

/// A pair of substrings that must both be present to contribute.
type PairIndicator = (&'static str, &'static str, u32);

static GO_RULES: &[Indicator] = &[
    ("package ", 3),
    ("func ", 2),
    (":= ", 2),
    ("if err != nil", 3),
    ("import (", 2),
    ("defer ", 2),
    ("go func", 2),
    ("chan ", 2),
    ("interface{", 2),
    ("struct {", 2),
];

static PYTHON_RULES: &[Indicator] = &[
    ("def ", 2),
    ("class ", 1),
    ("import ", 1),
    ("self.", 3),
    ("__init__", 3),
    ("__name__", 3),
    ("elif ", 3),
    ("True", 1),
    ("None", 1),
    ("async def", 2),
    ("await ", 1),
];

static PYTHON_PAIR_RULES: &[PairIndicator] = &[("from ", " import ", 3)];

static JS_RULES: &[Indicator] = &[
    ("const ", 2),
    ("let ", 2),
    ("var ", 1),
    ("function ", 1),
    ("=> ", 3),
    ("async ", 1),
    ("export ", 2),
    ("require(", 3),
    ("module.exports", 3),
    ("console.log", 2),
    ("null", 1),
    ("undefined", 2),
    ("interface ", 1),
    (": string", 2),
    ("useState", 3),
    ("useEffect", 3),
];

static JAVA_RULES: &[Indicator] = &[
    ("public class ", 4),
    ("private ", 1),
    ("public static void main", 5),
    ("System.out.println", 4),
    ("import java.", 4),
    ("@Override", 3),
    ("throws ", 2),
    ("extends ", 1),
    ("implements ", 2),
];

static C_RULES: &[Indicator] = &[
    ("#include <", 4),
    ("#include \"", 3),
    ("#define ", 3),
    ("int main(", 4),
    ("printf(", 3),
    ("malloc(", 3),
    ("free(", 3),
    ("sizeof(", 2),
    ("typedef ", 2),
    ("->", 1),
];

static CPP_RULES: &[Indicator] = &[
    ("std::", 4),
    ("cout <<", 4),
    ("cin >>", 4),
    ("namespace ", 3),
    ("template<", 4),
    ("template <", 4),
    ("virtual ", 2),
    ("nullptr", 3),
];

static CPP_PAIR_RULES: &[PairIndicator] = &[
    ("class ", "public:", 3),
    ("new ", "delete ", 2),
];

static CSHARP_RULES: &[Indicator] = &[
    ("using System", 4),
    ("Console.WriteLine", 4),
    ("public async Task", 4),
    ("[SerializeField]", 3),
    ("get;", 3),
    ("set;", 3),
];

static CSHARP_PAIR_RULES: &[PairIndicator] = &[
    ("namespace ", "class ", 2),
    ("var ", "new ", 1),
    ("=> ", "public ", 2),
];

static RUBY_RULES: &[Indicator] = &[
    ("require '", 3),
    ("require \"", 3),
    ("puts ", 3),
    ("attr_accessor", 4),
    ("attr_reader", 4),
    ("do |", 3),
    (".each ", 2),
    (".map ", 2),
    ("unless ", 2),
    ("elsif ", 2),
    ("module ", 2),
];

static RUBY_PAIR_RULES: &[PairIndicator] = &[
    ("def ", "end", 3),
    ("@", "def ", 2),
];

static RUST_RULES: &[Indicator] = &[
    ("fn main()", 4),
    ("println!(", 4),
    ("print!(", 4),
    ("use std::", 4),
    ("mut ", 3),
    ("impl ", 3),
    ("pub fn ", 3),
    ("Option<", 3),
    ("Result<", 3),
    ("&self", 3),
    ("&mut self", 3),
    ("unwrap()", 2),
];

static RUST_PAIR_RULES: &[PairIndicator] = &[
    ("fn ", "let ", 3),
    ("match ", "=>", 3),
];

static PHP_RULES: &[Indicator] = &[
    ("<?php", 5),
    ("echo ", 2),
    ("array(", 1),
    ("=>", 1),
];

static PHP_PAIR_RULES: &[PairIndicator] = &[
    ("$", "function ", 3),
    ("->", "$this", 4),
    ("namespace ", "use ", 2),
];

static SWIFT_RULES: &[Indicator] = &[
    ("import Foundation", 5),
    ("import UIKit", 5),
    ("guard ", 4),
    ("if let ", 4),
    ("@IBOutlet", 4),
    ("@IBAction", 4),
];

static SWIFT_PAIR_RULES: &[PairIndicator] = &[
    ("func ", "->", 3),
    ("var ", ": ", 2),
    ("let ", ": ", 2),
    ("struct ", ": ", 2),
];

static KOTLIN_RULES: &[Indicator] = &[
    ("fun main(", 4),
    ("println(", 2),
    ("val ", 1),
    ("var ", 1),
    ("?.", 3),
    ("!!", 3),
    ("data class ", 4),
    ("suspend fun ", 4),
    ("companion object", 4),
    ("import kotlin", 4),
    ("import android", 4),
];

static KOTLIN_PAIR_RULES: &[PairIndicator] = &[("fun ", ": ", 3)];

fn score(text: &str, rules: &[Indicator], pairs: &[PairIndicator]) -> u32 {
    let mut total = 0;
    for &(pat, weight) in rules {
        if text.contains(pat) {
            total += weight;
        }
    }
    for &(a, b, weight) in pairs {
        if text.contains(a) && text.contains(b) {
            total += weight;
        }
    }
    total
}

/// Identify the programming language of source-like text.
///
/// Scores every language's fixed rule table and picks the highest,
/// requiring a score of at least 3 to claim a language at all.
pub(super) fn detect_language(text: &str) -> CodeLang {
    let mut py_score = score(text, PYTHON_RULES, PYTHON_PAIR_RULES);
    // Significant four-space indentation leans Python over tabs.
    if text.matches("    ").count() > text.matches('\t').count() {
        py_score += 1;
    }

    let c_score = score(text, C_RULES, &[]);
    // C++ scores everything C does plus its own indicators.
    let cpp_score = c_score + score(text, CPP_RULES, CPP_PAIR_RULES);

    let mut swift_score = score(text, SWIFT_RULES, SWIFT_PAIR_RULES);
    if text.contains("print(") && !text.contains("println") {
        swift_score += 2;
    }

    let scores = [
        (score(text, GO_RULES, &[]), CodeLang::Go),
        (py_score, CodeLang::Python),
        (score(text, JS_RULES, &[]), CodeLang::JavaScript),
        (score(text, JAVA_RULES, &[]), CodeLang::Java),
        (c_score, CodeLang::C),
        (cpp_score, CodeLang::Cpp),
        (score(text, CSHARP_RULES, CSHARP_PAIR_RULES), CodeLang::CSharp),
        (score(text, RUBY_RULES, RUBY_PAIR_RULES), CodeLang::Ruby),
        (score(text, RUST_RULES, RUST_PAIR_RULES), CodeLang::Rust),
        (score(text, PHP_RULES, PHP_PAIR_RULES), CodeLang::Php),
        (swift_score, CodeLang::Swift),
        (score(text, KOTLIN_RULES, KOTLIN_PAIR_RULES), CodeLang::Kotlin),
    ];

    let mut best_score = 0;
    let mut best = CodeLang::Unknown;
    for (s, lang) in scores {
        if s > best_score {
            best_score = s;
            best = lang;
        }
    }

    if best_score < 3 {
        return CodeLang::Unknown;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_beats_others() {
        let src = "package main\n\nfunc run() error {\n\tif err != nil {\n\t\treturn err\n\t}\n\tx := 1\n\t_ = x\n\treturn nil\n}\n";
        assert_eq!(detect_language(src), CodeLang::Go);
    }

    #[test]
    fn python_by_idiom() {
        let src = "import os\n\nclass Loader:\n    def __init__(self):\n        self.path = None\n\n    def load(self):\n        if self.path:\n            return open(self.path)\n        elif os.path.exists('x'):\n            return None\n";
        assert_eq!(detect_language(src), CodeLang::Python);
    }

    #[test]
    fn javascript_by_idiom() {
        let src = "const fs = require('fs');\nlet total = 0;\nconst add = (x) => x + 1;\nmodule.exports = { add };\nconsole.log(add(total));\n";
        assert_eq!(detect_language(src), CodeLang::JavaScript);
    }

    #[test]
    fn rust_by_idiom() {
        let src = "use std::io;\n\npub fn parse(input: &str) -> Option<u32> {\n    let mut n = 0;\n    match input.parse() {\n        Ok(v) => Some(v),\n        Err(_) => None,\n    }\n}\n";
        assert_eq!(detect_language(src), CodeLang::Rust);
    }

    #[test]
    fn c_by_idiom() {
        let src = "#include <stdio.h>\n#include <stdlib.h>\n\nint main(void) {\n    char *p = malloc(16);\n    printf(\"%p\\n\", p);\n    free(p);\n    return 0;\n}\n";
        let lang = detect_language(src);
        assert!(matches!(lang, CodeLang::C | CodeLang::Cpp));
    }

    #[test]
    fn ambiguous_text_is_unknown() {
        assert_eq!(detect_language("hello there, nothing codey here"), CodeLang::Unknown);
    }
}
