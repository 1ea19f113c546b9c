//! # AST 模块
//!
//! 定义程序的抽象语法树（Abstract Syntax Tree）。
//!
//! ## 设计说明
//!
//! AST 是解析器的输出，由 `lower` 读取并交给后端。
//! 节点在解析时一次性构造，之后不再修改；每个节点只属于它的父节点。
//!
//! 只有函数调用可以直接作为语句出现，其余表达式必须包在
//! `Print` / `VarDecl` / `Return` 中。这一点由 [`Call`] 在
//! [`Stmt::ExprStmt`] 与 [`Expr::Call`] 之间共享来保证。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 二元运算符
///
/// 算术运算符与比较运算符互不相交。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
}

impl BinaryOperator {
    /// 源码中的符号
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
        }
    }

    /// 从符号解析运算符
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Le,
            ">=" => Self::Ge,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            _ => return None,
        };
        Some(op)
    }

    /// 是否为比较运算符
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::Le | Self::Ge | Self::Eq | Self::NotEq
        )
    }

    /// 是否为算术运算符
    pub fn is_arithmetic(self) -> bool {
        !self.is_comparison()
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 函数调用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// 被调用的函数名
    pub name: String,
    /// 实参列表
    pub args: Vec<Expr>,
}

impl Call {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// 表达式节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// 整数字面量
    Number(i64),

    /// 字符串字面量（不含引号）
    StringLiteral(String),

    /// 变量引用
    Variable(String),

    /// 二元运算
    BinaryOp {
        left: Box<Expr>,
        operator: BinaryOperator,
        right: Box<Expr>,
    },

    /// 函数调用
    Call(Call),
}

impl Expr {
    /// 创建整数字面量
    pub fn number(value: i64) -> Self {
        Self::Number(value)
    }

    /// 创建字符串字面量
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    /// 创建变量引用
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// 创建二元运算
    pub fn binary(left: Expr, operator: BinaryOperator, right: Expr) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// 创建函数调用
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(Call::new(name, args))
    }

    /// 节点类型
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Number(_) => NodeKind::Number,
            Self::StringLiteral(_) => NodeKind::StringLiteral,
            Self::Variable(_) => NodeKind::Variable,
            Self::BinaryOp { .. } => NodeKind::BinaryOp,
            Self::Call(_) => NodeKind::Call,
        }
    }
}

/// 语句节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    /// 变量声明
    ///
    /// 对应 `var name = expr;`
    VarDecl { name: String, value: Expr },

    /// 函数定义
    ///
    /// 对应 `function name(a, b) { ... }`
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },

    /// 输出
    ///
    /// 对应 `print(expr);`
    Print { value: Expr },

    /// 条件分支
    ///
    /// `else_body` 为 `None` 表示源码中没有 else 分支。
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },

    /// 循环
    ///
    /// 只有条件，没有初始化和步进，语义上等同 while。
    ForLoop { condition: Expr, body: Vec<Stmt> },

    /// 返回
    Return { value: Expr },

    /// 调用语句
    ///
    /// 对应 `name(args);`
    ExprStmt(Call),
}

impl Stmt {
    /// 节点类型
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::VarDecl { .. } => NodeKind::VarDecl,
            Self::FunctionDef { .. } => NodeKind::FunctionDef,
            Self::Print { .. } => NodeKind::Print,
            Self::If { .. } => NodeKind::If,
            Self::ForLoop { .. } => NodeKind::ForLoop,
            Self::Return { .. } => NodeKind::Return,
            Self::ExprStmt(_) => NodeKind::ExprStmt,
        }
    }
}

/// 节点类型标记
///
/// 用于错误信息，不携带节点内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    VarDecl,
    FunctionDef,
    Print,
    If,
    ForLoop,
    Return,
    ExprStmt,
    Call,
    Number,
    StringLiteral,
    Variable,
    BinaryOp,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 编译单元
///
/// 顶层语句序列，附带每条顶层语句的起始行号。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// 顶层语句
    pub statements: Vec<Stmt>,
    /// 与 `statements` 一一对应的行号
    #[serde(default)]
    source_map: Vec<usize>,
}

impl Program {
    /// 创建不带行号信息的程序
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self {
            statements,
            source_map: Vec::new(),
        }
    }

    /// 创建带行号信息的程序
    ///
    /// `source_map` 长度与 `statements` 不一致时行号信息被丢弃。
    pub fn with_source_map(statements: Vec<Stmt>, source_map: Vec<usize>) -> Self {
        let source_map = if source_map.len() == statements.len() {
            source_map
        } else {
            Vec::new()
        };
        Self {
            statements,
            source_map,
        }
    }

    /// 第 `index` 条顶层语句的行号
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.source_map.get(index).copied()
    }

    /// 顶层语句数量
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// 遍历顶层语句
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
