//! # Error 模块
//!
//! 定义 kethaka-core 各阶段的错误类型。
//!
//! 每个阶段遇到第一个错误即失败，不做恢复，也不返回部分结果。

use thiserror::Error;

use crate::ast::NodeKind;

/// 词法错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// 当前位置没有任何词法规则可以匹配
    #[error("第 {line} 行第 {column} 列：无法识别的字符 '{character}'")]
    UnexpectedCharacter {
        line: usize,
        column: usize,
        character: char,
    },

    /// 数字字面量超出 64 位有符号整数范围
    #[error("第 {line} 行：数字字面量 '{text}' 超出整数范围")]
    IntegerOutOfRange { line: usize, text: String },
}

impl LexError {
    /// 出错的行号（从 1 开始）
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. } | Self::IntegerOutOfRange { line, .. } => *line,
        }
    }
}

/// 语法错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 下一个 token 与期望不符
    #[error("第 {line} 行：期望 {expected}，实际为 {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    /// 输入在结构完整前结束
    ///
    /// `line` 为最后一个 token 所在行，空输入时为 1。
    #[error("第 {line} 行：期望 {expected}，但输入已结束")]
    UnexpectedEnd { expected: String, line: usize },
}

impl ParseError {
    /// 出错的行号
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. } | Self::UnexpectedEnd { line, .. } => *line,
        }
    }

    /// 期望内容的描述
    pub fn expected(&self) -> &str {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEnd { expected, .. } => {
                expected
            }
        }
    }

    /// 实际遇到内容的描述
    pub fn found(&self) -> &str {
        match self {
            Self::UnexpectedToken { found, .. } => found,
            Self::UnexpectedEnd { .. } => "输入结束",
        }
    }
}

/// 降级（lowering）错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoweringError {
    /// 当前后端不支持该节点
    #[error("{}后端不支持节点 {node_kind}", line_prefix(*line))]
    Unsupported {
        node_kind: NodeKind,
        /// 所属顶层语句的行号（已知时）
        line: Option<usize>,
    },
}

impl LoweringError {
    /// 创建不支持节点错误（行号由 `lower` 补充）
    pub fn unsupported(node_kind: NodeKind) -> Self {
        Self::Unsupported {
            node_kind,
            line: None,
        }
    }

    /// 不支持的节点类型
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Self::Unsupported { node_kind, .. } => *node_kind,
        }
    }

    /// 所属顶层语句的行号
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Unsupported { line, .. } => *line,
        }
    }

    /// 补充行号，已有行号时保持不变
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            Self::Unsupported { node_kind, line } => Self::Unsupported {
                node_kind,
                line: line.or(Some(at)),
            },
        }
    }
}

fn line_prefix(line: Option<usize>) -> String {
    match line {
        Some(line) => format!("第 {line} 行："),
        None => String::new(),
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// JSON 解析/序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// 配置值无效
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// kethaka-core 统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontendError {
    /// 词表无效，尚未开始编译
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 词法错误
    #[error("词法错误: {0}")]
    Lex(#[from] LexError),

    /// 语法错误
    #[error("语法错误: {0}")]
    Parse(#[from] ParseError),

    /// 降级错误
    #[error("降级错误: {0}")]
    Lowering(#[from] LoweringError),
}

impl FrontendError {
    /// 出错的行号（已知时）
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Config(_) => None,
            Self::Lex(e) => Some(e.line()),
            Self::Parse(e) => Some(e.line()),
            Self::Lowering(e) => e.line(),
        }
    }
}

/// Result 类型别名
pub type FrontendResult<T> = Result<T, FrontendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_accessors() {
        let err = ParseError::UnexpectedToken {
            expected: "')'".to_string(),
            found: "';'".to_string(),
            line: 3,
        };
        assert_eq!(err.line(), 3);
        assert_eq!(err.expected(), "')'");
        assert_eq!(err.found(), "';'");
        assert!(err.to_string().contains("第 3 行"));

        let err = ParseError::UnexpectedEnd {
            expected: "';'".to_string(),
            line: 7,
        };
        assert_eq!(err.line(), 7);
        assert_eq!(err.found(), "输入结束");
    }

    #[test]
    fn test_lowering_error_keeps_first_line() {
        let err = LoweringError::unsupported(NodeKind::ForLoop);
        assert_eq!(err.line(), None);
        assert!(!err.to_string().contains("第"));

        let err = err.at_line(4).at_line(9);
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.node_kind(), NodeKind::ForLoop);
        assert!(err.to_string().contains("第 4 行"));
        assert!(err.to_string().contains("ForLoop"));
    }

    #[test]
    fn test_frontend_error_from() {
        let err: FrontendError = LexError::UnexpectedCharacter {
            line: 2,
            column: 5,
            character: '@',
        }
        .into();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains('@'));

        let err: FrontendError =
            ConfigError::Validation("关键字 var 不能为空".to_string()).into();
        assert_eq!(err.line(), None);
        assert_eq!(err.to_string(), "配置错误: 配置验证失败: 关键字 var 不能为空");
    }
}
