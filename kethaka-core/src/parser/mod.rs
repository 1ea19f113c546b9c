//! # Parser 模块
//!
//! 递归下降解析器，把 token 序列组装成 [`Program`]。
//!
//! ## 文法
//!
//! ```text
//! Program    := Stmt*
//! Stmt       := VarDecl | FuncDef | IfStmt | ForStmt | PrintStmt | ReturnStmt | CallStmt
//! VarDecl    := 'var' IDENT '=' Expr ';'
//! FuncDef    := 'function' IDENT '(' ParamList? ')' '{' Stmt* '}'
//! IfStmt     := 'if' '(' Expr ')' '{' Stmt* '}' ('else' '{' Stmt* '}')?
//! ForStmt    := 'for' '(' Expr ')' '{' Stmt* '}'
//! PrintStmt  := 'print' '(' Expr ')' ';'
//! ReturnStmt := 'return' Expr ';'
//! CallStmt   := IDENT '(' ArgList? ')' ';'
//! ```
//!
//! 表达式部分见 `expr_parser`。
//!
//! ## 模块结构
//!
//! - `cursor`: token 游标
//! - `expr_parser`: 表达式解析（优先级爬升）
//!
//! ## 嵌套上限
//!
//! 括号、调用实参、运算符链和代码块都会加深嵌套层数，超过 [`MAX_NESTING_DEPTH`]
//! 时返回语法错误，因此后续降级只会见到深度有限的树。

mod cursor;
mod expr_parser;


use tracing::debug;

use crate::ast::{Call, Expr, Program, Stmt};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

use cursor::TokenCursor;

/// 最大嵌套层数
pub const MAX_NESTING_DEPTH: usize = 256;

/// 解析 token 序列
///
/// 遇到第一个结构错误即返回，不做错误恢复。
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    debug!(statements = program.len(), "语法分析完成");
    Ok(program)
}

/// 语法解析器
///
/// 状态只有 token 游标和当前嵌套层数，只在一次 `parse` 调用内存在。
struct Parser<'a> {
    cursor: TokenCursor<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            depth: 0,
        }
    }

    /// 进入一层嵌套，超过上限时报错
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.cursor.error(format!("嵌套层数不超过 {MAX_NESTING_DEPTH}")));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        let mut source_map = Vec::new();

        while let Some(token) = self.cursor.peek() {
            source_map.push(token.line);
            statements.push(self.parse_statement()?);
        }

        Ok(Program::with_source_map(statements, source_map))
    }

    /// 按首个 token 分派语句
    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.cursor.error("语句"));
        };

        match token.kind {
            TokenKind::KeywordVar => self.parse_var_decl(),
            TokenKind::KeywordFunction => self.parse_function_def(),
            TokenKind::KeywordIf => self.parse_if(),
            TokenKind::KeywordFor => self.parse_for(),
            TokenKind::KeywordPrint => self.parse_print(),
            TokenKind::KeywordReturn => self.parse_return(),
            TokenKind::Identifier => self.parse_call_statement(),
            _ => Err(self.cursor.error("语句")),
        }
    }

    /// `var name = expr;`
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordVar)?;
        let name = self.cursor.expect(TokenKind::Identifier)?.text.clone();
        self.cursor.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl { name, value })
    }

    /// `function name(a, b) { ... }`
    fn parse_function_def(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordFunction)?;
        let name = self.cursor.expect(TokenKind::Identifier)?.text.clone();

        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            params.push(self.cursor.expect(TokenKind::Identifier)?.text.clone());
            while self.cursor.eat(TokenKind::Comma).is_some() {
                params.push(self.cursor.expect(TokenKind::Identifier)?.text.clone());
            }
        }
        self.cursor.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(Stmt::FunctionDef { name, params, body })
    }

    /// `if (cond) { ... } else { ... }`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordIf)?;
        let condition = self.parse_condition()?;
        let then_body = self.parse_block()?;

        let else_body = if self.cursor.eat(TokenKind::KeywordElse).is_some() {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    /// `for (cond) { ... }`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordFor)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::ForLoop { condition, body })
    }

    /// `print(expr);`
    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordPrint)?;
        let value = self.parse_condition()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Print { value })
    }

    /// `return expr;`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::KeywordReturn)?;
        let value = self.parse_expression()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return { value })
    }

    /// `name(args);`
    fn parse_call_statement(&mut self) -> Result<Stmt, ParseError> {
        let name = self.cursor.expect(TokenKind::Identifier)?.text.clone();
        self.cursor.expect(TokenKind::LParen)?;
        let args = self.parse_call_args()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(Stmt::ExprStmt(Call { name, args }))
    }

    /// 带括号的表达式 `( expr )`
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.cursor.expect(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    /// `{ Stmt* }`，语句序列止于（不含）右花括号
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        self.enter()?;

        let mut body = Vec::new();
        while !self.cursor.is_at_end() && !self.cursor.check(TokenKind::RBrace) {
            body.push(self.parse_statement()?);
        }

        self.cursor.expect(TokenKind::RBrace)?;
        self.leave(1);
        Ok(body)
    }
}
