//! # Token 游标
//!
//! 对不可变 token 切片的只进游标，解析函数通过 `&mut` 独占借用共享它。

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

pub(super) struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// 查看下一个 token，不消费
    pub(super) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// 下一个 token 是否为指定类型
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    /// 下一个 token 是否为指定类型且文本在 `texts` 中
    pub(super) fn check_text(&self, kind: TokenKind, texts: &[&str]) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == kind && texts.contains(&t.text.as_str()))
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// 消费下一个 token
    pub(super) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// 下一个 token 类型匹配时消费它
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// 消费指定类型的 token，否则报错
    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.error(kind.to_string())),
        }
    }

    /// 在当前位置构造错误
    ///
    /// 输入已结束时行号取最后一个 token 所在行。
    pub(super) fn error(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.describe(),
                line: token.line,
            },
            None => ParseError::UnexpectedEnd {
                expected,
                line: self.tokens.last().map_or(1, |t| t.line),
            },
        }
    }
}
