//! JavaScript Statements
//!
//! A small structured builder for the statements widgets emit. Every
//! configuration value is serialized through `serde_json` at the boundary,
//! so interpolated keys, ids and labels cannot break out of a string
//! literal or the surrounding `<script>` block.
//!
//! Caller-supplied hooks (token handlers, event callbacks) are carried as
//! [`JsExpr`] source text and emitted verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// JavaScript source text supplied by the page author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsExpr(String);

impl JsExpr {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JsExpr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Serialize a string as a JS string literal safe inside `<script>`
pub fn string_literal(value: &str) -> String {
    json_literal(&serde_json::Value::String(value.to_string()))
}

fn json_literal(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// `jQuery("<selector>")`
pub fn jquery(selector: &str) -> String {
    format!("jQuery({})", string_literal(selector))
}

/// `jQuery("#<id>")`
pub fn jquery_id(id: &str) -> String {
    jquery(&format!("#{id}"))
}

/// Call expression `callee(args...)` without the trailing semicolon
pub fn call_expr(callee: &str, args: &[JsValue]) -> String {
    let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("{callee}({})", args.join(", "))
}

// ============================================================================
// Values
// ============================================================================

/// A value in argument or initializer position
#[derive(Clone, Debug, PartialEq)]
pub enum JsValue {
    /// Serialized configuration data
    Json(serde_json::Value),
    /// Verbatim source (identifiers, hooks)
    Expr(JsExpr),
    Object(JsObject),
    Function(JsFunction),
}

impl JsValue {
    pub fn string(value: impl Into<String>) -> Self {
        JsValue::Json(serde_json::Value::String(value.into()))
    }

    pub fn expr(source: impl Into<String>) -> Self {
        JsValue::Expr(JsExpr::new(source))
    }
}

impl From<serde_json::Value> for JsValue {
    fn from(value: serde_json::Value) -> Self {
        JsValue::Json(value)
    }
}

impl From<JsExpr> for JsValue {
    fn from(value: JsExpr) -> Self {
        JsValue::Expr(value)
    }
}

impl From<JsObject> for JsValue {
    fn from(value: JsObject) -> Self {
        JsValue::Object(value)
    }
}

impl From<JsFunction> for JsValue {
    fn from(value: JsFunction) -> Self {
        JsValue::Function(value)
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Json(value) => f.write_str(&json_literal(value)),
            JsValue::Expr(expr) => write!(f, "{expr}"),
            JsValue::Object(object) => write!(f, "{object}"),
            JsValue::Function(function) => write!(f, "{function}"),
        }
    }
}

/// Object literal whose members may mix data and source expressions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsObject {
    members: Vec<(String, JsValue)>,
}

impl JsObject {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn member(mut self, key: impl Into<String>, value: impl Into<JsValue>) -> Self {
        self.members.push((key.into(), value.into()));
        self
    }

    /// Add a member only when a value is present
    #[must_use]
    pub fn member_opt<V: Into<JsValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.member(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsValue> {
        self.members.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return f.write_str("{}");
        }

        f.write_str("{")?;
        for (i, (key, value)) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if is_identifier(key) {
                write!(f, " {key}: {value}")?;
            } else {
                write!(f, " {}: {value}", string_literal(key))?;
            }
        }
        f.write_str(" }")
    }
}

/// Anonymous function expression
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsFunction {
    params: Vec<String>,
    body: Vec<Statement>,
}

impl JsFunction {
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn statement(mut self, statement: Statement) -> Self {
        self.body.push(statement);
        self
    }

    pub fn body(&self) -> &[Statement] {
        &self.body
    }
}

impl fmt::Display for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function({}) {{", self.params.join(", "))?;
        for statement in &self.body {
            write!(f, "\n    {}", statement.to_string().replace('\n', "\n    "))?;
        }
        if self.body.is_empty() {
            f.write_str(" }")
        } else {
            f.write_str("\n}")
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// One JavaScript statement
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `var name = value;`
    Var { name: String, value: JsValue },
    /// `callee(args...);`
    Call { callee: String, args: Vec<JsValue> },
    /// `return value;`
    Return(JsValue),
    /// Verbatim source
    Raw(String),
}

impl Statement {
    pub fn var(name: impl Into<String>, value: impl Into<JsValue>) -> Self {
        Statement::Var {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<JsValue>) -> Self {
        Statement::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn raw(source: impl Into<String>) -> Self {
        Statement::Raw(source.into())
    }

    /// The callee of a call statement
    pub fn callee(&self) -> Option<&str> {
        match self {
            Statement::Call { callee, .. } => Some(callee),
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var { name, value } => write!(f, "var {name} = {value};"),
            Statement::Call { callee, args } => write!(f, "{};", call_expr(callee, args)),
            Statement::Return(value) => write!(f, "return {value};"),
            Statement::Raw(source) => f.write_str(source.trim()),
        }
    }
}
