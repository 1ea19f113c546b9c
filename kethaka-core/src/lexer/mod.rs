//! # Lexer 模块
//!
//! 将源码文本切分为带行号的 token 序列。
//!
//! ## 匹配规则
//!
//! 每个位置按固定优先级依次尝试各条规则，采用第一条匹配的规则（有序选择，
//! 而非最长匹配）：
//!
//! ```text
//! 数字 → 字符串 → 关键字 → 标识符 → 算术运算符 → 比较运算符 → '='
//!      → 括号/花括号 → ',' → ';' → 空白/注释 → 换行
//! ```
//!
//! 空白、`#` 注释和换行不产生 token，换行只推进行号。

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Lexicon;
use crate::error::LexError;

#[cfg(test)]
mod tests;

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Number,
    String,
    KeywordVar,
    KeywordPrint,
    KeywordIf,
    KeywordElse,
    KeywordFor,
    KeywordFunction,
    KeywordReturn,
    Identifier,
    ArithOp,
    CompareOp,
    Assign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
}

impl TokenKind {
    /// 固定拼写的标点类 token
    fn fixed_text(self) -> Option<&'static str> {
        match self {
            Self::Assign => Some("="),
            Self::LParen => Some("("),
            Self::RParen => Some(")"),
            Self::LBrace => Some("{"),
            Self::RBrace => Some("}"),
            Self::Comma => Some(","),
            Self::Semicolon => Some(";"),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "数字",
            Self::String => "字符串",
            Self::KeywordVar => "关键字 var",
            Self::KeywordPrint => "关键字 print",
            Self::KeywordIf => "关键字 if",
            Self::KeywordElse => "关键字 else",
            Self::KeywordFor => "关键字 for",
            Self::KeywordFunction => "关键字 function",
            Self::KeywordReturn => "关键字 return",
            Self::Identifier => "标识符",
            Self::ArithOp => "算术运算符",
            Self::CompareOp => "比较运算符",
            Self::Assign => "'='",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
        };
        f.write_str(name)
    }
}

/// 词法单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// 源码中的原始文本（字符串字面量包含引号）
    pub text: String,
    /// 所在行（从 1 开始）
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// 用于错误信息的描述
    pub fn describe(&self) -> String {
        match self.kind.fixed_text() {
            Some(_) => self.kind.to_string(),
            None => format!("{} '{}'", self.kind, self.text),
        }
    }
}

/// 标识符起始字符
pub fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// 标识符后续字符
///
/// 除 XID_Continue 外还接受 ZWJ/ZWNJ，僧伽罗语等文字的合字需要它们。
pub fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || matches!(c, '_' | '\u{200C}' | '\u{200D}')
}

/// 使用默认（英文）词表进行词法分析
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(source, &Lexicon::default())
}

/// 使用指定词表进行词法分析
///
/// 不验证词表。拼写为空的关键字永远不会匹配，与其他关键字重名时按
/// 规则顺序取第一个。需要报错时先调用 [`Lexicon::validate`]，
/// 或直接使用 [`compile_with_lexicon`](crate::compile_with_lexicon)。
pub fn tokenize_with(source: &str, lexicon: &Lexicon) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source, lexicon);
    let tokens = lexer.run()?;
    debug!(tokens = tokens.len(), lines = lexer.line, "词法分析完成");
    Ok(tokens)
}

/// 单条词法规则
#[derive(Debug, Clone, Copy)]
enum Rule {
    Number,
    String,
    Keyword(TokenKind),
    Identifier,
    ArithOp,
    CompareOp,
    Punct(TokenKind),
    Skip,
    Newline,
}

impl Rule {
    /// 规则产生的 token 类型，丢弃规则返回 `None`
    fn token_kind(self) -> Option<TokenKind> {
        match self {
            Self::Number => Some(TokenKind::Number),
            Self::String => Some(TokenKind::String),
            Self::Keyword(kind) | Self::Punct(kind) => Some(kind),
            Self::Identifier => Some(TokenKind::Identifier),
            Self::ArithOp => Some(TokenKind::ArithOp),
            Self::CompareOp => Some(TokenKind::CompareOp),
            Self::Skip | Self::Newline => None,
        }
    }
}

/// 规则优先级表
const RULES: [Rule; 21] = [
    Rule::Number,
    Rule::String,
    Rule::Keyword(TokenKind::KeywordVar),
    Rule::Keyword(TokenKind::KeywordPrint),
    Rule::Keyword(TokenKind::KeywordIf),
    Rule::Keyword(TokenKind::KeywordElse),
    Rule::Keyword(TokenKind::KeywordFor),
    Rule::Keyword(TokenKind::KeywordFunction),
    Rule::Keyword(TokenKind::KeywordReturn),
    Rule::Identifier,
    Rule::ArithOp,
    Rule::CompareOp,
    Rule::Punct(TokenKind::Assign),
    Rule::Punct(TokenKind::LParen),
    Rule::Punct(TokenKind::RParen),
    Rule::Punct(TokenKind::LBrace),
    Rule::Punct(TokenKind::RBrace),
    Rule::Punct(TokenKind::Comma),
    Rule::Punct(TokenKind::Semicolon),
    Rule::Skip,
    Rule::Newline,
];

/// 词法分析器
struct Lexer<'a> {
    source: &'a str,
    lexicon: &'a Lexicon,
    /// 当前字节偏移
    pos: usize,
    /// 当前行号
    line: usize,
    /// 当前行起始字节偏移
    line_start: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, lexicon: &'a Lexicon) -> Self {
        Self {
            source,
            lexicon,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn run(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.source.len() {
            let rest = self.remaining();
            let matched = RULES
                .iter()
                .find_map(|rule| self.match_rule(*rule, rest).map(|len| (*rule, len)));

            let Some((rule, len)) = matched else {
                return Err(self.unexpected_character());
            };
            let text = &rest[..len];

            match rule.token_kind() {
                None => {
                    if matches!(rule, Rule::Newline) {
                        self.new_line(len);
                    }
                }
                Some(kind) => {
                    if kind == TokenKind::Number && text.parse::<i64>().is_err() {
                        return Err(LexError::IntegerOutOfRange {
                            line: self.line,
                            text: text.to_string(),
                        });
                    }
                    trace!(?kind, text, line = self.line, "token");
                    tokens.push(Token::new(kind, text, self.line));

                    // 字符串字面量内部可以包含换行
                    if kind == TokenKind::String {
                        for (offset, _) in text.match_indices('\n') {
                            self.line += 1;
                            self.line_start = self.pos + offset + 1;
                        }
                    }
                }
            }

            self.pos += len;
        }

        Ok(tokens)
    }

    fn new_line(&mut self, len: usize) {
        self.line += 1;
        self.line_start = self.pos + len;
    }

    fn unexpected_character(&self) -> LexError {
        let character = self.remaining().chars().next().unwrap_or('\0');
        let column = self.source[self.line_start..self.pos].chars().count() + 1;
        LexError::UnexpectedCharacter {
            line: self.line,
            column,
            character,
        }
    }

    /// 尝试在 `rest` 开头匹配规则，返回匹配的字节长度
    fn match_rule(&self, rule: Rule, rest: &str) -> Option<usize> {
        match rule {
            Rule::Number => {
                let len = rest.bytes().take_while(u8::is_ascii_digit).count();
                (len > 0).then_some(len)
            }
            Rule::String => match_string(rest),
            Rule::Keyword(kind) => {
                let spelling = self.keyword_spelling(kind);
                if spelling.is_empty() {
                    return None;
                }
                let after = rest.strip_prefix(spelling)?;
                match after.chars().next() {
                    Some(c) if is_ident_continue(c) => None,
                    _ => Some(spelling.len()),
                }
            }
            Rule::Identifier => {
                let mut chars = rest.char_indices();
                let (_, first) = chars.next()?;
                if !is_ident_start(first) {
                    return None;
                }
                let end = chars
                    .find(|(_, c)| !is_ident_continue(*c))
                    .map_or(rest.len(), |(i, _)| i);
                Some(end)
            }
            Rule::ArithOp => rest.starts_with(['+', '-', '*', '/']).then_some(1),
            Rule::CompareOp => ["<=", ">=", "==", "!=", "<", ">"]
                .iter()
                .find(|op| rest.starts_with(**op))
                .map(|op| op.len()),
            Rule::Punct(kind) => {
                let text = kind.fixed_text()?;
                rest.starts_with(text).then_some(text.len())
            }
            Rule::Skip => {
                if rest.starts_with('#') {
                    Some(rest.find('\n').unwrap_or(rest.len()))
                } else {
                    let len = rest
                        .bytes()
                        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r'))
                        .count();
                    (len > 0).then_some(len)
                }
            }
            Rule::Newline => rest.starts_with('\n').then_some(1),
        }
    }

    fn keyword_spelling(&self, kind: TokenKind) -> &'a str {
        let lexicon = self.lexicon;
        match kind {
            TokenKind::KeywordVar => &lexicon.var,
            TokenKind::KeywordPrint => &lexicon.print,
            TokenKind::KeywordIf => &lexicon.if_,
            TokenKind::KeywordElse => &lexicon.else_,
            TokenKind::KeywordFor => &lexicon.for_,
            TokenKind::KeywordFunction => &lexicon.function,
            _ => &lexicon.return_,
        }
    }
}

/// 字符串字面量：任一引号开头，内容不含引号，任一引号结尾
fn match_string(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix(['"', '\''])?;
    let close = body.find(['"', '\''])?;
    Some(1 + close + 1)
}
