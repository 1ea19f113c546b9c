//! # Lower 模块
//!
//! 把 AST 降级为后端定义的目标表示。
//!
//! ## 职责
//!
//! - 按原有顺序遍历每条语句、每个代码块、每个表达式
//! - 调用 [`Backend`] 为每个节点构造对应的目标节点
//! - 不做重组、不做常量折叠，不执行任何东西
//!
//! 子节点先于父节点降级，遇到第一个不支持的节点即失败。
//!
//! ## 内置后端
//!
//! - [`TreeBackend`]：结构化目标树（可序列化）
//! - [`PythonBackend`]：Python 源码文本

mod python;
mod tree;


use tracing::debug;

use crate::ast::{BinaryOperator, Call, Expr, NodeKind, Program, Stmt};
use crate::error::LoweringError;

pub use python::{PyExpr, PythonBackend};
pub use tree::{ArithOp, CompareOp, TargetExpr, TargetProgram, TargetStmt, TreeBackend};

/// 降级后端
///
/// 每个 AST 节点对应一个方法，子节点已经降级完毕后再传入。
/// 节点方法默认返回 [`LoweringError::Unsupported`]，部分后端只需实现自己支持的节点。
pub trait Backend {
    /// 整个程序的目标表示
    type Program;
    /// 语句的目标表示
    type Stmt;
    /// 表达式的目标表示
    type Expr;

    fn number(&self, _value: i64) -> Result<Self::Expr, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::Number))
    }

    fn string_literal(&self, _value: &str) -> Result<Self::Expr, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::StringLiteral))
    }

    fn variable(&self, _name: &str) -> Result<Self::Expr, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::Variable))
    }

    fn binary_op(
        &self,
        _left: Self::Expr,
        _operator: BinaryOperator,
        _right: Self::Expr,
    ) -> Result<Self::Expr, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::BinaryOp))
    }

    fn call(&self, _name: &str, _args: Vec<Self::Expr>) -> Result<Self::Expr, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::Call))
    }

    fn var_decl(&self, _name: &str, _value: Self::Expr) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::VarDecl))
    }

    fn function_def(
        &self,
        _name: &str,
        _params: &[String],
        _body: Vec<Self::Stmt>,
    ) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::FunctionDef))
    }

    fn print(&self, _value: Self::Expr) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::Print))
    }

    fn if_stmt(
        &self,
        _condition: Self::Expr,
        _then_body: Vec<Self::Stmt>,
        _else_body: Option<Vec<Self::Stmt>>,
    ) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::If))
    }

    fn for_loop(
        &self,
        _condition: Self::Expr,
        _body: Vec<Self::Stmt>,
    ) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::ForLoop))
    }

    fn return_stmt(&self, _value: Self::Expr) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::Return))
    }

    fn expr_stmt(
        &self,
        _name: &str,
        _args: Vec<Self::Expr>,
    ) -> Result<Self::Stmt, LoweringError> {
        Err(LoweringError::unsupported(NodeKind::ExprStmt))
    }

    /// 组装顶层语句
    fn program(&self, statements: Vec<Self::Stmt>) -> Result<Self::Program, LoweringError>;
}

/// 降级整个程序
///
/// 错误会带上所属顶层语句的行号（如果 `program` 含行号信息）。
pub fn lower<B: Backend + ?Sized>(
    program: &Program,
    backend: &B,
) -> Result<B::Program, LoweringError> {
    let mut statements = Vec::with_capacity(program.len());

    for (index, stmt) in program.iter().enumerate() {
        let lowered = lower_stmt(stmt, backend).map_err(|e| match program.line_of(index) {
            Some(line) => e.at_line(line),
            None => e,
        })?;
        statements.push(lowered);
    }

    let count = statements.len();
    let target = backend.program(statements)?;
    debug!(statements = count, "降级完成");
    Ok(target)
}

/// 降级单条语句
pub fn lower_stmt<B: Backend + ?Sized>(stmt: &Stmt, backend: &B) -> Result<B::Stmt, LoweringError> {
    match stmt {
        Stmt::VarDecl { name, value } => {
            let value = lower_expr(value, backend)?;
            backend.var_decl(name, value)
        }
        Stmt::FunctionDef { name, params, body } => {
            let body = lower_block(body, backend)?;
            backend.function_def(name, params, body)
        }
        Stmt::Print { value } => {
            let value = lower_expr(value, backend)?;
            backend.print(value)
        }
        Stmt::If {
            condition,
            then_body,
            else_body,
        } => {
            let condition = lower_expr(condition, backend)?;
            let then_body = lower_block(then_body, backend)?;
            let else_body = else_body
                .as_deref()
                .map(|body| lower_block(body, backend))
                .transpose()?;
            backend.if_stmt(condition, then_body, else_body)
        }
        Stmt::ForLoop { condition, body } => {
            let condition = lower_expr(condition, backend)?;
            let body = lower_block(body, backend)?;
            backend.for_loop(condition, body)
        }
        Stmt::Return { value } => {
            let value = lower_expr(value, backend)?;
            backend.return_stmt(value)
        }
        Stmt::ExprStmt(Call { name, args }) => {
            let args = lower_args(args, backend)?;
            backend.expr_stmt(name, args)
        }
    }
}

/// 降级单个表达式
pub fn lower_expr<B: Backend + ?Sized>(expr: &Expr, backend: &B) -> Result<B::Expr, LoweringError> {
    match expr {
        Expr::Number(value) => backend.number(*value),
        Expr::StringLiteral(value) => backend.string_literal(value),
        Expr::Variable(name) => backend.variable(name),
        Expr::BinaryOp {
            left,
            operator,
            right,
        } => {
            let left = lower_expr(left, backend)?;
            let right = lower_expr(right, backend)?;
            backend.binary_op(left, *operator, right)
        }
        Expr::Call(Call { name, args }) => {
            let args = lower_args(args, backend)?;
            backend.call(name, args)
        }
    }
}

fn lower_block<B: Backend + ?Sized>(
    body: &[Stmt],
    backend: &B,
) -> Result<Vec<B::Stmt>, LoweringError> {
    body.iter().map(|stmt| lower_stmt(stmt, backend)).collect()
}

fn lower_args<B: Backend + ?Sized>(
    args: &[Expr],
    backend: &B,
) -> Result<Vec<B::Expr>, LoweringError> {
    args.iter().map(|arg| lower_expr(arg, backend)).collect()
}
