//! # 结构化目标树
//!
//! 与 AST 同构的可序列化目标表示，交给外部执行后端使用。
//!
//! 与 AST 的差别：
//! - 二元运算按类别拆成 `BinOp`（算术）与 `Compare`（比较）
//! - 只有条件的循环降级为 `While`

use serde::{Deserialize, Serialize};

use crate::ast::BinaryOperator;
use crate::error::LoweringError;

use super::Backend;

/// 算术运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    Div,
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Lt,
    Gt,
    LtE,
    GtE,
    Eq,
    NotEq,
}

/// 目标表达式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetExpr {
    Int {
        value: i64,
    },
    Str {
        value: String,
    },
    Name {
        id: String,
    },
    BinOp {
        left: Box<TargetExpr>,
        op: ArithOp,
        right: Box<TargetExpr>,
    },
    Compare {
        left: Box<TargetExpr>,
        op: CompareOp,
        right: Box<TargetExpr>,
    },
    Call {
        func: String,
        args: Vec<TargetExpr>,
    },
}

/// 目标语句
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetStmt {
    Assign {
        target: String,
        value: TargetExpr,
    },
    FunctionDef {
        name: String,
        args: Vec<String>,
        body: Vec<TargetStmt>,
    },
    Print {
        value: TargetExpr,
    },
    If {
        test: TargetExpr,
        body: Vec<TargetStmt>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        orelse: Option<Vec<TargetStmt>>,
    },
    While {
        test: TargetExpr,
        body: Vec<TargetStmt>,
    },
    Return {
        value: TargetExpr,
    },
    /// 调用语句
    Expr {
        value: TargetExpr,
    },
}

/// 目标程序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProgram {
    pub body: Vec<TargetStmt>,
}

impl TargetProgram {
    /// 序列化为格式化的 JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

enum OpClass {
    Arith(ArithOp),
    Compare(CompareOp),
}

fn classify(operator: BinaryOperator) -> OpClass {
    match operator {
        BinaryOperator::Add => OpClass::Arith(ArithOp::Add),
        BinaryOperator::Sub => OpClass::Arith(ArithOp::Sub),
        BinaryOperator::Mul => OpClass::Arith(ArithOp::Mult),
        BinaryOperator::Div => OpClass::Arith(ArithOp::Div),
        BinaryOperator::Lt => OpClass::Compare(CompareOp::Lt),
        BinaryOperator::Gt => OpClass::Compare(CompareOp::Gt),
        BinaryOperator::Le => OpClass::Compare(CompareOp::LtE),
        BinaryOperator::Ge => OpClass::Compare(CompareOp::GtE),
        BinaryOperator::Eq => OpClass::Compare(CompareOp::Eq),
        BinaryOperator::NotEq => OpClass::Compare(CompareOp::NotEq),
    }
}

/// 生成 [`TargetProgram`] 的后端，支持全部节点
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBackend;

impl Backend for TreeBackend {
    type Program = TargetProgram;
    type Stmt = TargetStmt;
    type Expr = TargetExpr;

    fn number(&self, value: i64) -> Result<TargetExpr, LoweringError> {
        Ok(TargetExpr::Int { value })
    }

    fn string_literal(&self, value: &str) -> Result<TargetExpr, LoweringError> {
        Ok(TargetExpr::Str {
            value: value.to_string(),
        })
    }

    fn variable(&self, name: &str) -> Result<TargetExpr, LoweringError> {
        Ok(TargetExpr::Name { id: name.to_string() })
    }

    fn binary_op(
        &self,
        left: TargetExpr,
        operator: BinaryOperator,
        right: TargetExpr,
    ) -> Result<TargetExpr, LoweringError> {
        let left = Box::new(left);
        let right = Box::new(right);
        Ok(match classify(operator) {
            OpClass::Arith(op) => TargetExpr::BinOp { left, op, right },
            OpClass::Compare(op) => TargetExpr::Compare { left, op, right },
        })
    }

    fn call(&self, name: &str, args: Vec<TargetExpr>) -> Result<TargetExpr, LoweringError> {
        Ok(TargetExpr::Call {
            func: name.to_string(),
            args,
        })
    }

    fn var_decl(&self, name: &str, value: TargetExpr) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::Assign {
            target: name.to_string(),
            value,
        })
    }

    fn function_def(
        &self,
        name: &str,
        params: &[String],
        body: Vec<TargetStmt>,
    ) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::FunctionDef {
            name: name.to_string(),
            args: params.to_vec(),
            body,
        })
    }

    fn print(&self, value: TargetExpr) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::Print { value })
    }

    fn if_stmt(
        &self,
        condition: TargetExpr,
        then_body: Vec<TargetStmt>,
        else_body: Option<Vec<TargetStmt>>,
    ) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::If {
            test: condition,
            body: then_body,
            orelse: else_body,
        })
    }

    fn for_loop(
        &self,
        condition: TargetExpr,
        body: Vec<TargetStmt>,
    ) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::While {
            test: condition,
            body,
        })
    }

    fn return_stmt(&self, value: TargetExpr) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::Return { value })
    }

    fn expr_stmt(&self, name: &str, args: Vec<TargetExpr>) -> Result<TargetStmt, LoweringError> {
        Ok(TargetStmt::Expr {
            value: self.call(name, args)?,
        })
    }

    fn program(&self, statements: Vec<TargetStmt>) -> Result<TargetProgram, LoweringError> {
        Ok(TargetProgram { body: statements })
    }
}
