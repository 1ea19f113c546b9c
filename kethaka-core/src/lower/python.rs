//! # Python 源码后端
//!
//! 把 AST 降级为 Python 源码文本，由宿主自行交给 Python 解释器。
//!
//! - 缩进 4 个空格，空代码块输出 `pass`
//! - `for` 循环只有条件，输出为 `while`
//! - 只在需要时加括号，保持解析得到的结合方式；Python 的比较会连写成链，
//!   所以比较的操作数本身是比较时总是加括号
//! - 标识符改名是一一对应的：普通标识符原样输出；保留字、`print`、含 ZWJ/ZWNJ 或以 `_`
//!   结尾的标识符改写为以 `_` 结尾的转义形式（见 `identifier`）

use crate::ast::BinaryOperator;
use crate::error::LoweringError;

use super::Backend;

const INDENT: &str = "    ";

/// Python 保留字
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// 后端生成代码依赖的内置函数，用户标识符不能遮蔽它们
const BUILTINS: &[&str] = &["print"];

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

// 优先级，数值越大结合越紧
const PREC_COMPARE: u8 = 1;
const PREC_ADDITIVE: u8 = 2;
const PREC_MULTIPLICATIVE: u8 = 3;
const PREC_ATOM: u8 = 4;

/// 带优先级的 Python 表达式文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyExpr {
    text: String,
    precedence: u8,
}

impl PyExpr {
    fn atom(text: String) -> Self {
        Self {
            text,
            precedence: PREC_ATOM,
        }
    }

    /// 表达式文本
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn wrapped(self, wrap: bool) -> String {
        if wrap {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

/// 生成 Python 源码的后端，支持全部节点
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonBackend;

impl PythonBackend {
    fn call_text(name: &str, args: Vec<PyExpr>) -> String {
        let args: Vec<String> = args.into_iter().map(|a| a.text).collect();
        format!("{}({})", identifier(name), args.join(", "))
    }
}

impl Backend for PythonBackend {
    type Program = String;
    /// 语句的各行，不含外层缩进
    type Stmt = Vec<String>;
    type Expr = PyExpr;

    fn number(&self, value: i64) -> Result<PyExpr, LoweringError> {
        Ok(PyExpr::atom(value.to_string()))
    }

    fn string_literal(&self, value: &str) -> Result<PyExpr, LoweringError> {
        Ok(PyExpr::atom(string_literal(value)))
    }

    fn variable(&self, name: &str) -> Result<PyExpr, LoweringError> {
        Ok(PyExpr::atom(identifier(name)))
    }

    fn binary_op(
        &self,
        left: PyExpr,
        operator: BinaryOperator,
        right: PyExpr,
    ) -> Result<PyExpr, LoweringError> {
        let precedence = precedence(operator);
        let wrap_left = left.precedence < precedence
            || (precedence == PREC_COMPARE && left.precedence == PREC_COMPARE);
        let wrap_right = right.precedence <= precedence;

        Ok(PyExpr {
            text: format!(
                "{} {} {}",
                left.wrapped(wrap_left),
                operator.symbol(),
                right.wrapped(wrap_right)
            ),
            precedence,
        })
    }

    fn call(&self, name: &str, args: Vec<PyExpr>) -> Result<PyExpr, LoweringError> {
        Ok(PyExpr::atom(Self::call_text(name, args)))
    }

    fn var_decl(&self, name: &str, value: PyExpr) -> Result<Vec<String>, LoweringError> {
        Ok(vec![format!("{} = {}", identifier(name), value.text)])
    }

    fn function_def(
        &self,
        name: &str,
        params: &[String],
        body: Vec<Vec<String>>,
    ) -> Result<Vec<String>, LoweringError> {
        let params: Vec<String> = params.iter().map(|p| identifier(p)).collect();
        let mut lines = vec![format!("def {}({}):", identifier(name), params.join(", "))];
        push_block(&mut lines, body);
        Ok(lines)
    }

    fn print(&self, value: PyExpr) -> Result<Vec<String>, LoweringError> {
        Ok(vec![format!("print({})", value.text)])
    }

    fn if_stmt(
        &self,
        condition: PyExpr,
        then_body: Vec<Vec<String>>,
        else_body: Option<Vec<Vec<String>>>,
    ) -> Result<Vec<String>, LoweringError> {
        let mut lines = vec![format!("if {}:", condition.text)];
        push_block(&mut lines, then_body);
        if let Some(else_body) = else_body.filter(|body| !body.is_empty()) {
            lines.push("else:".to_string());
            push_block(&mut lines, else_body);
        }
        Ok(lines)
    }

    fn for_loop(
        &self,
        condition: PyExpr,
        body: Vec<Vec<String>>,
    ) -> Result<Vec<String>, LoweringError> {
        let mut lines = vec![format!("while {}:", condition.text)];
        push_block(&mut lines, body);
        Ok(lines)
    }

    fn return_stmt(&self, value: PyExpr) -> Result<Vec<String>, LoweringError> {
        Ok(vec![format!("return {}", value.text)])
    }

    fn expr_stmt(&self, name: &str, args: Vec<PyExpr>) -> Result<Vec<String>, LoweringError> {
        Ok(vec![Self::call_text(name, args)])
    }

    fn program(&self, statements: Vec<Vec<String>>) -> Result<String, LoweringError> {
        let mut source = String::new();
        for line in statements.into_iter().flatten() {
            source.push_str(&line);
            source.push('\n');
        }
        Ok(source)
    }
}

fn precedence(operator: BinaryOperator) -> u8 {
    match operator {
        BinaryOperator::Mul | BinaryOperator::Div => PREC_MULTIPLICATIVE,
        BinaryOperator::Add | BinaryOperator::Sub => PREC_ADDITIVE,
        _ => PREC_COMPARE,
    }
}

/// 追加缩进后的代码块
fn push_block(lines: &mut Vec<String>, body: Vec<Vec<String>>) {
    if body.is_empty() {
        lines.push(format!("{INDENT}pass"));
        return;
    }
    for line in body.into_iter().flatten() {
        lines.push(format!("{INDENT}{line}"));
    }
}

/// 把源码标识符映射为 Python 标识符
///
/// 不以 `_` 结尾、不含 ZWJ/ZWNJ、且不与保留字或内置函数同名的标识符原样保留。
/// 其余标识符逐字符转义（`_` → `__`，ZWNJ → `_c`，ZWJ → `_d`）后再追加一个 `_`。
/// 原样保留的名字从不以 `_` 结尾，转义后的名字总以 `_` 结尾，转义本身是前缀码，
/// 因此不同的源码标识符总是得到不同的 Python 标识符。
fn identifier(name: &str) -> String {
    let plain = !name.ends_with('_')
        && !name.contains([ZWNJ, ZWJ])
        && !RESERVED.contains(&name)
        && !BUILTINS.contains(&name);
    if plain {
        return name.to_string();
    }

    let mut ident = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        match c {
            '_' => ident.push_str("__"),
            ZWNJ => ident.push_str("_c"),
            ZWJ => ident.push_str("_d"),
            c => ident.push(c),
        }
    }
    ident.push('_');
    ident
}

/// 单引号字符串，转义反斜杠与控制字符
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
