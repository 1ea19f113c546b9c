//! # Kethaka Core
//!
//! 本地化关键字小语言的编译前端。
//!
//! ## 架构概述
//!
//! `kethaka-core` 只做翻译，不执行任何代码。源码依次经过三个阶段：
//!
//! ```text
//! 源码文本
//!   │ tokenize()          关键字拼写由 Lexicon 决定
//!   ▼
//! Vec<Token>
//!   │ parse()             递归下降，运算符左结合
//!   ▼
//! Program (AST)
//!   │ lower(&backend)     子节点先于父节点
//!   ▼
//! B::Program              TargetProgram / Python 源码 / 自定义后端
//! ```
//!
//! 每个阶段都是纯函数：相同输入得到相同输出，没有全局状态。
//!
//! ## 使用示例
//!
//! ```ignore
//! use kethaka_core::{PythonBackend, compile};
//!
//! let python = compile("var x = 1 + 2; print(x);", &PythonBackend)?;
//! assert_eq!(python, "x = 1 + 2\nprint(x)\n");
//! ```
//!
//! ## 模块结构
//!
//! - [`lexer`]：词法分析
//! - [`parser`]：语法分析
//! - [`ast`]：AST 定义
//! - [`lower`]：后端接口与内置后端
//! - [`config`]：关键字表与前端配置
//! - [`error`]：错误类型定义

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod lower;
pub mod parser;

// 重导出核心类型
pub use ast::{BinaryOperator, Call, Expr, NodeKind, Program, Stmt};
pub use config::{FrontendConfig, Lexicon, TargetKind};
pub use error::{
    ConfigError, FrontendError, FrontendResult, LexError, LoweringError, ParseError,
};
pub use lexer::{Token, TokenKind, tokenize, tokenize_with};
pub use lower::{
    ArithOp, Backend, CompareOp, PyExpr, PythonBackend, TargetExpr, TargetProgram, TargetStmt,
    TreeBackend, lower,
};
pub use parser::{MAX_NESTING_DEPTH, parse};

/// 使用默认（英文）关键字编译源码
pub fn compile<B: Backend + ?Sized>(source: &str, backend: &B) -> FrontendResult<B::Program> {
    compile_with_lexicon(source, &Lexicon::default(), backend)
}

/// 使用指定关键字表编译源码
///
/// 先验证词表，无效时返回 [`FrontendError::Config`]。
pub fn compile_with_lexicon<B: Backend + ?Sized>(
    source: &str,
    lexicon: &Lexicon,
    backend: &B,
) -> FrontendResult<B::Program> {
    lexicon.validate()?;
    let tokens = tokenize_with(source, lexicon)?;
    let program = parse(&tokens)?;
    Ok(lower(&program, backend)?)
}
