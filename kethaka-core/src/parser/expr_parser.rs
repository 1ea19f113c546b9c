//! # 表达式解析器
//!
//! 优先级爬升：每一层只处理一个优先级，操作数交给更高一层解析。
//!
//! ```text
//! Expr           := Comparison
//! Comparison     := Additive (CompareOp Additive)*
//! Additive       := Multiplicative (('+' | '-') Multiplicative)*
//! Multiplicative := Primary (('*' | '/') Primary)*
//! Primary        := NUMBER | STRING | IDENT ('(' ArgList? ')')? | '(' Expr ')'
//! ArgList        := Expr (',' Expr)*
//! ```
//!
//! 所有二元运算都是左结合的。每个表达式入口和运算符链中的每个运算符都占一层嵌套，
//! 左结合的长链同样会加深 AST。

use crate::ast::{BinaryOperator, Expr};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

use super::Parser;

impl Parser<'_> {
    /// 解析表达式（最低优先级入口）
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.parse_comparison()?;
        self.leave(1);
        Ok(expr)
    }

    /// 比较链，`a < b == c` 解析为 `(a < b) == c`
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        let mut levels = 0;

        while let Some(token) = self.cursor.eat(TokenKind::CompareOp) {
            let operator = binary_operator(token)?;
            self.enter()?;
            levels += 1;
            let right = self.parse_additive()?;
            left = Expr::binary(left, operator, right);
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let mut levels = 0;

        while self.cursor.check_text(TokenKind::ArithOp, &["+", "-"]) {
            let operator = self.next_operator()?;
            self.enter()?;
            levels += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(left, operator, right);
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;
        let mut levels = 0;

        while self.cursor.check_text(TokenKind::ArithOp, &["*", "/"]) {
            let operator = self.next_operator()?;
            self.enter()?;
            levels += 1;
            let right = self.parse_primary()?;
            left = Expr::binary(left, operator, right);
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.cursor.error("表达式"));
        };

        match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::UnexpectedToken {
                        expected: "整数".to_string(),
                        found: token.describe(),
                        line: token.line,
                    })?;
                Ok(Expr::Number(value))
            }
            TokenKind::String => {
                self.cursor.advance();
                Ok(Expr::StringLiteral(string_body(&token.text).to_string()))
            }
            TokenKind::Identifier => {
                self.cursor.advance();
                if self.cursor.eat(TokenKind::LParen).is_some() {
                    let args = self.parse_call_args()?;
                    Ok(Expr::call(token.text.clone(), args))
                } else {
                    Ok(Expr::Variable(token.text.clone()))
                }
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let expr = self.parse_expression()?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.cursor.error("表达式")),
        }
    }

    /// 解析实参列表直到右括号（左括号已被消费）
    pub(super) fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.cursor.eat(TokenKind::Comma).is_some() {
                args.push(self.parse_expression()?);
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn next_operator(&mut self) -> Result<BinaryOperator, ParseError> {
        let token = self.cursor.expect(TokenKind::ArithOp)?;
        binary_operator(token)
    }
}

fn binary_operator(token: &Token) -> Result<BinaryOperator, ParseError> {
    BinaryOperator::from_symbol(&token.text).ok_or_else(|| ParseError::UnexpectedToken {
        expected: "运算符".to_string(),
        found: token.describe(),
        line: token.line,
    })
}

/// 去掉字符串字面量两端的引号
fn string_body(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
}
