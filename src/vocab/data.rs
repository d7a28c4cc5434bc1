//! Embedded merge tables for the pre-trained vocabularies.
//!
//! Each table lists the merge tokens learned offline on a per-language
//! corpus, ordered by merge rank. Ranks 0..=255 are reserved for the
//! single-byte tokens; the first entry of each table takes rank 256.

/// Merges trained on mixed English prose.
pub(super) static TEXT_MERGES: &[&str] = &[
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or", "te", "of",
    "ed", "is", "it", "al", "ar", "st", "to", "nt", "ng", "se", "ha", "as", "ou", "io", "le",
    "ve", "co", "me", "de", "hi", "ri", "ro", "ic", "ne", "ea", "ra", "ce", "li", "ch", "ll",
    "be", "ma", "si", "om", "ur", "the", "and", "ing", "ion", "ent", "her", "for", "tha",
    "nth", "int", "ere", "tio", "ter", "est", "ers", "ati", "hat", "ate", "all", "eth", "hes",
    "ver", "his", "oft", "ith", "fth", "sth", "oth", "res", "ont", " the ", " of ", " and ",
    " to ", " in ", " is ", " that ", " it ", " for ", " as ", " with ", " was ", " on ",
    " are ", " be ", " this ", " have ", " not ", " by ", " but ", " from ", " at ", " or ",
    " an ", " they ", " which ", " one ", " had ", " has ", " were ", " their ", " been ",
    " would ", " there ", " what ", " will ", " when ", " who ", " more ", " can ", " all ",
    "tion ", "ation", "ment ", "ness ", "able ", "ing ", "ed ", "ly ", "es ", "er ", "s ",
    "t ", "d ", "e ", "n ", "y ", ", ", ". ", ".\n", ",\n", "\n\n", "  ", "    ", "'s ",
    "n't ", "ould ", "ight ", "ough ", "ance ", "ence ",
];

/// Merges trained on Go source.
pub(super) static GO_MERGES: &[&str] = &[
    "\n\t", "\n\t\t", "\n\t\t\t", "\n\n", "()", "{}", "[]", ":=", " :=", ":= ", " := ", "==",
    "!=", "&&", "||", "//", "// ", "()\n", "(), ", "er", "in", "re", "un", "te", "st", "or",
    "at", "en", "ur", "func", "func ", "func (", "package ", "import ", "import (\n", "type ",
    "type Error", "struct", "struct {", " struct {\n", "interface", "interface{}", "return",
    "return ", "return nil", "return err", "return nil, ", "\t\treturn ", "if ", "if err",
    "if err != nil", "if err != nil {\n", "if err != nil {\n\t\treturn ", "err != nil", "err",
    " err", "error", " error", ") error {\n", " error {\n", "nil", " nil", "nil {\n", "for ",
    "for _, ", "for i := ", "range ", " range ", "defer ", "go func", "chan ", "select {\n",
    "switch ", "case ", "case :", "default:\n", "break\n", "continue\n", "string", " string",
    "string ", "[]byte", "[]byte(", "byte", "int", " int", "int64", "uint32", "uint16",
    "float64", "bool", "true", "false", "len(", "cap(", "make(", "make([]", "append(",
    " = append(", "copy(", "new(", "panic(", "fmt.", "fmt.Errorf(", "fmt.Sprintf(",
    "fmt.Printf(", "fmt.Println(", "os.", "io.", "bytes.", "strings.", "binary.",
    "binary.LittleEndian.", "errors.New(", "var ", "const ", "const (\n", " uint32)",
    " []byte) ", " []byte, ", "(data []byte", ") {\n", ") {\n\t", "}\n", "}\n\n", "\t}\n",
    "\t\t}\n", " {\n", ", err := ", ", ok := ", "_, ok := ", "value", "count", "data",
    " data", "buf", "buffer", "offset", "length", "index", "result", "test", "Test",
    "func Test", "t.Errorf(", "t.Fatalf(", "t *testing.T) {\n",
];

/// Merges trained on Python source.
pub(super) static PYTHON_MERGES: &[&str] = &[
    "    ", "        ", "            ", "\n    ", "\n        ", "\n\n", "()", "[]", "{}",
    "==", "!=", ">=", "<=", "->", " -> ", "er", "in", "re", "st", "or", "at", "en", "an",
    "se", "def", "def ", "def __init__(self", "class ", "self", "self.", "(self)", "(self, ",
    "import", "import ", "from ", " import ", "return", "return ", "return None",
    "    return ", "if ", "if __name__", "elif ", "else:", "else:\n", "for ", " in ",
    "for i in ", "while ", "range(", " range(", "len(", "print(", "None", " None", "True",
    " True", "False", " False", "not ", " not ", "and ", " and ", "or ", " or ", "is ",
    " is ", "in ", "try:", "try:\n", "except ", "except Exception", "raise ", "finally:",
    "with ", "with open(", "as ", " as ", "lambda ", "yield ", "pass\n", "break\n",
    "continue\n", "async def ", "await ", "str(", "int(", "list(", "dict(", "set(",
    "tuple(", "isinstance(", "append(", ".append(", ".join(", ".split(", ".strip(",
    ".format(", "f\"", "'''", "\"\"\"", "# ", "#!", "args", "kwargs", "**kwargs", "*args",
    "value", "values", "item", "items", ".items()", "key", "keys", ".keys()", "data",
    "result", "index", "count", "name", "type", "test_", "def test_", "assert ",
    "assert_equal(", "__init__", "__name__", "__main__", "'__main__':\n", "number", "string",
];

/// Merges trained on JavaScript/TypeScript source.
pub(super) static JS_MERGES: &[&str] = &[
    "  ", "    ", "\n  ", "\n    ", "\n\n", "()", "{}", "[]", "();\n", "};\n", "=>",
    " => ", "=== ", "!== ", "==", "er", "in", "re", "st", "or", "at", "on", "an", "le",
    "const", "const ", "let ", "var ", "function", "function ", "function (", "return",
    "return ", "return;\n", "  return ", "if ", "if (", "} else {", "else {\n", "for (",
    "for (let ", "while (", "switch (", "case ", "break;\n", "continue;\n", "new ",
    "this", "this.", "class ", "extends ", "constructor(", "super(", "null", " null",
    "undefined", " undefined", "true", " true", "false", " false", "typeof ", "instanceof ",
    "async ", "async function ", "await ", "Promise", "Promise.", ".then(", ".catch(",
    "try {", "catch (", "throw new ", "Error(", "console.", "console.log(",
    "console.error(", "require(", "require('", "module.exports", "module.exports = ",
    "export ", "export default ", "export const ", "import ", "import {", " from '",
    "document.", "window.", "JSON.", "JSON.stringify(", "JSON.parse(", "Object.",
    "Object.keys(", "Array.", ".length", ".push(", ".map(", ".filter(", ".forEach(",
    ".reduce(", ".indexOf(", ".slice(", ".join(", ".split(", "=> {\n", ") {\n", ") => ",
    "});\n", ");\n", ";\n", ",\n", ": ", "', '", "\", \"", "${", "value", "result",
    "data", "item", "index", "callback", "options", "props", "state", "event", "target",
    ": string", ": number", ": boolean", "interface ", "type ", "React.", "useState(",
    "useEffect(",
];
