//! Syntax highlighting and cross-linking for code snippets
//!
//! A lexical approximation, not a parser: a single ordered token pattern
//! splits the text, identifiers are classified by an ordered rule table, and
//! every identifier, punctuation character and operator run found in the
//! [`SymbolIndex`] becomes a link. Classification never depends on the
//! index, so incomplete cross-link data only loses links, never styling.

use std::sync::OnceLock;

use regex::Regex;

use crate::anchor::Anchor;
use crate::render::html::escape_html;
use crate::symbols::SymbolIndex;

/// Token alternatives in precedence order
const TOKEN_PATTERN: &str = concat!(
    r#"(?m)(?P<string>"[^"\n]*"|'[^'\n]*'|`[^`\n]*`)"#,
    r"|(?P<comment>//.*$|/\*(?s:.*?)\*/)",
    r"|(?P<macro>\b[A-Za-z_][A-Za-z0-9_]*!)",
    r"|(?P<number>\b[0-9]+(?:\.[0-9]+)?\b)",
    r"|(?P<ident>\b[A-Za-z_][A-Za-z0-9_]*\b)",
    r"|(?P<punct>[{}()\[\].,:;])",
    r"|(?P<op>[-+*/%=&|<>!^?]+)",
);

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

const LIBRARIES: &[&str] = &[
    "Math", "System", "Game", "Net", "Graph", "Data", "Utils", "Audio", "OS", "Physics", "UI",
    "Input", "Thread", "Task", "CLI",
];

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "loop", "break", "continue", "return", "match", "switch", "case",
    "default", "try", "catch", "throw", "await", "use", "extern", "include", "import",
];

const STORAGE_KEYWORDS: &[&str] = &[
    "fn", "func", "let", "var", "const", "mut", "static", "pub", "public", "private", "mod",
    "crate", "class", "struct", "enum", "trait", "impl", "type", "union", "unsafe", "where", "as",
    "in", "is", "from", "async", "move", "super", "self", "Self", "this", "new", "true", "false",
    "null", "void",
];

const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "double", "char", "string", "bool", "void", "auto", "i8", "i16", "i32", "i64",
    "u8", "u16", "u32", "u64", "f32", "f64", "usize", "isize", "Vec2", "Vec3", "Color", "Array",
    "Map", "String", "List", "Dict", "Object", "Result", "Option", "Box", "Rc", "Arc", "Cell",
    "RefCell", "Mutex", "RwLock", "Any", "Vec", "HashMap", "VM", "CallFrame", "CompiledProgram",
    "Value",
];

/// Bracket family, each with its own depth counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Round,
    Square,
    Curly,
}

/// Style category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Unmatched characters, passed through
    Text,
    String,
    Comment,
    Macro,
    Number,
    Library,
    ControlKeyword,
    Keyword,
    Type,
    Function,
    Variable,
    Punctuation,
    /// Bracket colored by nesting depth, `level` cycles through 0..3
    Bracket { kind: BracketKind, level: u8 },
    Operator,
}

const BRACKET_CLASSES: [[&str; 3]; 3] = [
    ["token-bracket-round-0", "token-bracket-round-1", "token-bracket-round-2"],
    ["token-bracket-square-0", "token-bracket-square-1", "token-bracket-square-2"],
    ["token-bracket-curly-0", "token-bracket-curly-1", "token-bracket-curly-2"],
];

impl TokenClass {
    /// CSS class attached to the rendered token
    pub fn css_class(&self) -> &'static str {
        match self {
            TokenClass::Text => "",
            TokenClass::String => "token-string",
            TokenClass::Comment => "token-comment",
            TokenClass::Macro => "token-macro",
            TokenClass::Number => "token-number",
            TokenClass::Library => "token-library",
            TokenClass::ControlKeyword => "token-keyword-control",
            TokenClass::Keyword => "token-keyword",
            TokenClass::Type => "token-type",
            TokenClass::Function => "token-function",
            TokenClass::Variable => "token-variable",
            TokenClass::Punctuation => "token-punctuation",
            TokenClass::Bracket { kind, level } => {
                let row = match kind {
                    BracketKind::Round => 0,
                    BracketKind::Square => 1,
                    BracketKind::Curly => 2,
                };
                BRACKET_CLASSES[row][usize::from(*level) % 3]
            }
            TokenClass::Operator => "token-operator",
        }
    }
}

/// What an identifier rule sees: the word and the text after it
struct IdentContext<'a> {
    word: &'a str,
    rest: &'a str,
}

type IdentRule = fn(&IdentContext<'_>) -> bool;

/// Identifier rules, first match wins; no match means [`TokenClass::Variable`]
const IDENTIFIER_RULES: &[(IdentRule, TokenClass)] = &[
    (is_library, TokenClass::Library),
    (is_control_keyword, TokenClass::ControlKeyword),
    (is_storage_keyword, TokenClass::Keyword),
    (is_builtin_type, TokenClass::Type),
    (looks_like_type, TokenClass::Type),
    (is_call_site, TokenClass::Function),
];

/// Library names match exactly or in their all-lowercase module form
fn is_library(cx: &IdentContext<'_>) -> bool {
    LIBRARIES
        .iter()
        .any(|lib| *lib == cx.word || lib.to_ascii_lowercase() == cx.word)
}

fn is_control_keyword(cx: &IdentContext<'_>) -> bool {
    CONTROL_KEYWORDS.contains(&cx.word)
}

fn is_storage_keyword(cx: &IdentContext<'_>) -> bool {
    STORAGE_KEYWORDS.contains(&cx.word)
}

fn is_builtin_type(cx: &IdentContext<'_>) -> bool {
    BUILTIN_TYPES.contains(&cx.word)
}

/// Starts uppercase and is not SCREAMING_CASE
fn looks_like_type(cx: &IdentContext<'_>) -> bool {
    cx.word.starts_with(|c: char| c.is_ascii_uppercase()) && cx.word != cx.word.to_uppercase()
}

fn is_call_site(cx: &IdentContext<'_>) -> bool {
    cx.rest.trim_start().starts_with('(')
}

fn classify_identifier(word: &str, rest: &str) -> TokenClass {
    let cx = IdentContext { word, rest };
    IDENTIFIER_RULES
        .iter()
        .find(|(rule, _)| rule(&cx))
        .map_or(TokenClass::Variable, |(_, class)| *class)
}

/// Independent depth counters for the three bracket families
///
/// Counters may go negative on unbalanced input.
#[derive(Debug, Default)]
struct BracketDepths {
    round: i32,
    square: i32,
    curly: i32,
}

impl BracketDepths {
    fn classify(&mut self, c: char) -> Option<TokenClass> {
        let (counter, kind, opening) = match c {
            '(' => (&mut self.round, BracketKind::Round, true),
            ')' => (&mut self.round, BracketKind::Round, false),
            '[' => (&mut self.square, BracketKind::Square, true),
            ']' => (&mut self.square, BracketKind::Square, false),
            '{' => (&mut self.curly, BracketKind::Curly, true),
            '}' => (&mut self.curly, BracketKind::Curly, false),
            _ => return None,
        };

        // A closer is styled with the depth of its opener
        let depth = if opening {
            *counter += 1;
            *counter
        } else {
            let depth = *counter;
            *counter -= 1;
            depth
        };

        let level = u8::try_from(depth.rem_euclid(3)).unwrap_or(0);
        Some(TokenClass::Bracket { kind, level })
    }
}

/// A classified slice of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub class: TokenClass,
    /// Cross-link target, when the token is indexed
    pub link: Option<&'a Anchor>,
}

impl<'a> Token<'a> {
    fn new(text: &'a str, class: TokenClass) -> Self {
        Self {
            text,
            class,
            link: None,
        }
    }

    fn linked(text: &'a str, class: TokenClass, symbols: &'a SymbolIndex) -> Self {
        Self {
            text,
            class,
            link: symbols.resolve(text),
        }
    }

    /// Append the escaped markup of this token
    pub fn write_markup(&self, out: &mut String) {
        // Tokens are cut from raw code; escaping first would split `<=` into `&lt;=`
        let text = escape_html(self.text);
        match (self.class, self.link) {
            (TokenClass::Text, _) => out.push_str(&text),
            (class, Some(anchor)) => out.push_str(&format!(
                "<a href=\"{}\" class=\"code-link {}\">{}</a>",
                escape_html(&anchor.href()),
                class.css_class(),
                text
            )),
            (class, None) => out.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                class.css_class(),
                text
            )),
        }
    }
}

/// Highlighter bound to a symbol index
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'a> {
    symbols: &'a SymbolIndex,
}

impl<'a> Highlighter<'a> {
    pub fn new(symbols: &'a SymbolIndex) -> Self {
        Self { symbols }
    }

    /// Split `code` into classified tokens covering the whole input
    pub fn tokenize<'s>(&self, code: &'s str) -> Vec<Token<'s>>
    where
        'a: 's,
    {
        let symbols: &'s SymbolIndex = self.symbols;
        let mut tokens = Vec::new();
        let mut depths = BracketDepths::default();
        let mut last = 0;

        for caps in token_pattern().captures_iter(code) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                tokens.push(Token::new(&code[last..whole.start()], TokenClass::Text));
            }
            last = whole.end();

            let text = whole.as_str();
            let token = if caps.name("string").is_some() {
                Token::new(text, TokenClass::String)
            } else if caps.name("comment").is_some() {
                Token::new(text, TokenClass::Comment)
            } else if caps.name("macro").is_some() {
                Token::new(text, TokenClass::Macro)
            } else if caps.name("number").is_some() {
                Token::new(text, TokenClass::Number)
            } else if caps.name("ident").is_some() {
                let class = classify_identifier(text, &code[whole.end()..]);
                Token::linked(text, class, symbols)
            } else if caps.name("punct").is_some() {
                let class = text
                    .chars()
                    .next()
                    .and_then(|c| depths.classify(c))
                    .unwrap_or(TokenClass::Punctuation);
                Token::linked(text, class, symbols)
            } else {
                Token::linked(text, TokenClass::Operator, symbols)
            };
            tokens.push(token);
        }

        if last < code.len() {
            tokens.push(Token::new(&code[last..], TokenClass::Text));
        }
        tokens
    }

    /// Render `code` as escaped, classified, cross-linked markup
    pub fn highlight(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len() * 4);
        for token in self.tokenize(code) {
            token.write_markup(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn classes(code: &str) -> Vec<(String, TokenClass)> {
        let index = SymbolIndex::new();
        Highlighter::new(&index)
            .tokenize(code)
            .into_iter()
            .filter(|t| t.class != TokenClass::Text)
            .map(|t| (t.text.to_string(), t.class))
            .collect()
    }

    fn round(level: u8) -> TokenClass {
        TokenClass::Bracket {
            kind: BracketKind::Round,
            level,
        }
    }

    #[test]
    fn test_keywords_and_literals() {
        assert_eq!(
            classes("let x = 42"),
            vec![
                ("let".to_string(), TokenClass::Keyword),
                ("x".to_string(), TokenClass::Variable),
                ("=".to_string(), TokenClass::Operator),
                ("42".to_string(), TokenClass::Number),
            ]
        );
        assert_eq!(classes("return")[0].1, TokenClass::ControlKeyword);
        assert_eq!(classes("Math")[0].1, TokenClass::Library);
        assert_eq!(classes("float")[0].1, TokenClass::Type);
    }

    #[test]
    fn test_type_heuristic_and_call_site() {
        assert_eq!(classes("Sprite")[0].1, TokenClass::Type);
        assert_eq!(classes("MAX_SPEED")[0].1, TokenClass::Variable);
        assert_eq!(classes("spawn (x)")[0].1, TokenClass::Function);
        // Type rule comes before the call-site rule
        assert_eq!(classes("Sprite(1)")[0].1, TokenClass::Type);
    }

    #[test]
    fn test_string_beats_comment() {
        let tokens = classes(r#""// not a comment" // real"#);
        assert_eq!(tokens[0], (r#""// not a comment""#.to_string(), TokenClass::String));
        assert_eq!(tokens[1], ("// real".to_string(), TokenClass::Comment));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = classes("/* one\ntwo */ x");
        assert_eq!(tokens[0], ("/* one\ntwo */".to_string(), TokenClass::Comment));
        assert_eq!(tokens[1].1, TokenClass::Variable);
    }

    #[test]
    fn test_macro_and_numbers() {
        let tokens = classes("print!(1.2.3)");
        assert_eq!(tokens[0], ("print!".to_string(), TokenClass::Macro));
        assert_eq!(tokens[2], ("1.2".to_string(), TokenClass::Number));
        assert_eq!(tokens[3], (".".to_string(), TokenClass::Punctuation));
        assert_eq!(tokens[4], ("3".to_string(), TokenClass::Number));
    }

    #[test]
    fn test_operator_runs() {
        let tokens = classes("a += b => c");
        assert_eq!(tokens[1], ("+=".to_string(), TokenClass::Operator));
        assert_eq!(tokens[3], ("=>".to_string(), TokenClass::Operator));
    }

    #[test]
    fn test_bracket_pairs_share_style() {
        let tokens = classes("(a(b)c)");
        let brackets: Vec<_> = tokens
            .iter()
            .filter(|(_, c)| matches!(c, TokenClass::Bracket { .. }))
            .map(|(_, c)| *c)
            .collect();

        assert_eq!(brackets, vec![round(1), round(2), round(2), round(1)]);
        assert_ne!(brackets[0].css_class(), brackets[1].css_class());
        assert_eq!(brackets[0].css_class(), brackets[3].css_class());
    }

    #[test]
    fn test_bracket_families_independent() {
        let tokens = classes("{[(x)]}");
        assert_eq!(
            tokens[0].1,
            TokenClass::Bracket {
                kind: BracketKind::Curly,
                level: 1
            }
        );
        assert_eq!(
            tokens[1].1,
            TokenClass::Bracket {
                kind: BracketKind::Square,
                level: 1
            }
        );
        assert_eq!(tokens[2].1, round(1));
    }

    #[test]
    fn test_unbalanced_brackets_degrade() {
        let tokens = classes(")))(");
        let levels: Vec<_> = tokens.iter().map(|(_, c)| *c).collect();
        // depth 0, -1, -2 on close; back to -2 on open
        assert_eq!(levels, vec![round(0), round(2), round(1), round(1)]);
    }

    #[test]
    fn test_unterminated_string_passes_through() {
        let index = SymbolIndex::new();
        let html = Highlighter::new(&index).highlight("\"abc");
        assert!(html.starts_with("&quot;"));
        assert!(html.contains("<span class=\"token-variable\">abc</span>"));
    }

    #[test]
    fn test_unterminated_block_comment_degrades() {
        assert_eq!(
            classes("x /* open"),
            vec![
                ("x".to_string(), TokenClass::Variable),
                ("/*".to_string(), TokenClass::Operator),
                ("open".to_string(), TokenClass::Variable),
            ]
        );
    }

    #[test]
    fn test_escaping_never_leaks_markup() {
        let index = SymbolIndex::new();
        let html = Highlighter::new(&index).highlight("if a < b && c > d { x = \"<b>&\" }");

        let stripped = html
            .replace("</span>", "")
            .replace("</a>", "");
        let stripped = regex::Regex::new(r#"<(span|a) [^>]*>"#)
            .unwrap()
            .replace_all(&stripped, "");
        assert!(!stripped.contains('<'));
        assert!(!stripped.contains('>'));
        let bare_amp = regex::Regex::new(r"&(?:lt|gt|amp|quot);").unwrap().replace_all(&stripped, "");
        assert!(!bare_amp.contains('&'));
    }

    #[test]
    fn test_links_follow_symbol_index() {
        let registry = testutil::math_registry();
        let index = SymbolIndex::build(&registry);
        let html = Highlighter::new(&index).highlight("math.sqrt(4)");

        assert!(html.starts_with(
            "<a href=\"#math\" class=\"code-link token-library\">math</a>"
        ));
        assert!(html.contains("<a href=\"#math:sqrt\" class=\"code-link token-function\">sqrt</a>"));
        assert!(html.contains("<span class=\"token-number\">4</span>"));
        assert!(html.contains("class=\"code-link token-bracket-round-1\">(</a>"));
        assert!(html.contains("class=\"code-link token-bracket-round-1\">)</a>"));
    }

    #[test]
    fn test_unindexed_tokens_are_spans() {
        let index = SymbolIndex::new();
        let html = Highlighter::new(&index).highlight("foo");
        assert_eq!(html, "<span class=\"token-variable\">foo</span>");
    }

    #[test]
    fn test_tokens_cover_input() {
        let index = SymbolIndex::new();
        let code = "let v = math.vector3(1, 0, 0) // ok\n@ #";
        let joined: String = Highlighter::new(&index)
            .tokenize(code)
            .iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(joined, code);
    }
}
