//! # Config 模块
//!
//! 前端配置：关键字词表与目标后端选择。
//!
//! ## 配置来源
//!
//! 1. JSON 字符串（由宿主读取文件后传入，core 不做 IO）
//! 2. 默认值（英文词表 + 树形目标）
//!
//! 缺省字段一律回退到默认值。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lexer::{is_ident_continue, is_ident_start};

/// 关键字词表
///
/// 词法分析按固定顺序尝试各个关键字，关键字之后紧跟标识符字符时不算匹配。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(default = "default_var")]
    pub var: String,

    #[serde(default = "default_print")]
    pub print: String,

    #[serde(rename = "if", default = "default_if")]
    pub if_: String,

    #[serde(rename = "else", default = "default_else")]
    pub else_: String,

    #[serde(rename = "for", default = "default_for")]
    pub for_: String,

    #[serde(default = "default_function")]
    pub function: String,

    #[serde(rename = "return", default = "default_return")]
    pub return_: String,
}

// 默认值函数
fn default_var() -> String {
    "var".to_string()
}

fn default_print() -> String {
    "print".to_string()
}

fn default_if() -> String {
    "if".to_string()
}

fn default_else() -> String {
    "else".to_string()
}

fn default_for() -> String {
    "for".to_string()
}

fn default_function() -> String {
    "function".to_string()
}

fn default_return() -> String {
    "return".to_string()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

impl Lexicon {
    /// 英文词表
    pub fn english() -> Self {
        Self {
            var: default_var(),
            print: default_print(),
            if_: default_if(),
            else_: default_else(),
            for_: default_for(),
            function: default_function(),
            return_: default_return(),
        }
    }

    /// 僧伽罗语词表
    ///
    /// සඳහන් / මුද්‍රණය / නම් / නැතහොත් / දක්වා / ක්‍රියාව / ආපසු
    pub fn sinhala() -> Self {
        Self {
            var: "\u{0DC3}\u{0DB3}\u{0DC4}\u{0DB1}\u{0DCA}".to_string(),
            print: "\u{0DB8}\u{0DD4}\u{0DAF}\u{0DCA}\u{200D}\u{0DBB}\u{0DAB}\u{0DBA}".to_string(),
            if_: "\u{0DB1}\u{0DB8}\u{0DCA}".to_string(),
            else_: "\u{0DB1}\u{0DD0}\u{0DAD}\u{0DC4}\u{0DDC}\u{0DAD}\u{0DCA}".to_string(),
            for_: "\u{0DAF}\u{0D9A}\u{0DCA}\u{0DC0}\u{0DCF}".to_string(),
            function: "\u{0D9A}\u{0DCA}\u{200D}\u{0DBB}\u{0DD2}\u{0DBA}\u{0DCF}\u{0DC0}".to_string(),
            return_: "\u{0D86}\u{0DB4}\u{0DC3}\u{0DD4}".to_string(),
        }
    }

    /// 按词法匹配顺序列出 (名称, 拼写)
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("var", &self.var),
            ("print", &self.print),
            ("if", &self.if_),
            ("else", &self.else_),
            ("for", &self.for_),
            ("function", &self.function),
            ("return", &self.return_),
        ]
    }

    /// 验证词表
    ///
    /// 每个关键字非空、以标识符起始字符开头、只含标识符字符，且互不相同。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.entries();

        for (name, spelling) in entries {
            let mut chars = spelling.chars();
            let Some(first) = chars.next() else {
                return Err(ConfigError::Validation(format!("关键字 {name} 不能为空")));
            };
            if !is_ident_start(first) {
                return Err(ConfigError::Validation(format!(
                    "关键字 {name} 必须以标识符字符开头: '{spelling}'"
                )));
            }
            if let Some(bad) = chars.find(|&c| !is_ident_continue(c)) {
                return Err(ConfigError::Validation(format!(
                    "关键字 {name} 含有非法字符 {bad:?}: '{spelling}'"
                )));
            }
        }

        for (i, (name, spelling)) in entries.iter().enumerate() {
            if let Some((other, _)) = entries[i + 1..].iter().find(|(_, s)| s == spelling) {
                return Err(ConfigError::Validation(format!(
                    "关键字 {name} 与 {other} 拼写相同: '{spelling}'"
                )));
            }
        }

        Ok(())
    }
}

/// 目标后端类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// 结构化目标树
    #[default]
    Tree,
    /// Python 源码
    Python,
}

/// 前端配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// 关键字词表
    #[serde(default)]
    pub lexicon: Lexicon,

    /// 目标后端
    #[serde(default)]
    pub target: TargetKind,
}

impl FrontendConfig {
    /// 从 JSON 文本解析配置并验证
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lexicon.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrontendConfig::default();
        assert_eq!(config.lexicon.var, "var");
        assert_eq!(config.lexicon.return_, "return");
        assert_eq!(config.target, TargetKind::Tree);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sinhala_lexicon_is_valid() {
        assert!(Lexicon::sinhala().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = FrontendConfig::from_json_str(r#"{ "lexicon": { "var": "let" } }"#).unwrap();
        assert_eq!(config.lexicon.var, "let");
        assert_eq!(config.lexicon.print, "print");
        assert_eq!(config.target, TargetKind::Tree);

        let config = FrontendConfig::from_json_str(r#"{ "target": "python" }"#).unwrap();
        assert_eq!(config.target, TargetKind::Python);
        assert_eq!(config.lexicon, Lexicon::english());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FrontendConfig {
            lexicon: Lexicon::sinhala(),
            target: TargetKind::Python,
        };
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"if\""));
        assert_eq!(FrontendConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = FrontendConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn test_validate_rejects_bad_keywords() {
        let mut lexicon = Lexicon::english();
        lexicon.print = String::new();
        assert!(matches!(
            lexicon.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("print")
        ));

        let mut lexicon = Lexicon::english();
        lexicon.var = "1var".to_string();
        assert!(lexicon.validate().is_err());

        let mut lexicon = Lexicon::english();
        lexicon.var = "my var".to_string();
        assert!(lexicon.validate().is_err());

        let mut lexicon = Lexicon::english();
        lexicon.else_ = "if".to_string();
        assert!(matches!(
            lexicon.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("else")
        ));
    }
}
