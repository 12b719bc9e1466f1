//! Python literal rendering / Python 字面量渲染
//!
//! Every caller-supplied value that ends up in generated source goes through
//! these helpers, so quotes, backslashes and newlines in user text can never
//! break out of a string literal.
//!
//! 所有进入生成源码的调用方数据都经过这些函数，
//! 因此用户文本中的引号、反斜杠和换行无法逃逸出字符串字面量。

use serde_json::{Map, Value};

/// A double-quoted Python string literal.
pub fn py_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text safe to place inside a triple-quoted docstring.
pub fn py_doc(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// A Python expression equal to the JSON value.
pub fn py_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => py_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(py_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => py_dict(map),
    }
}

/// A Python dict literal.
pub fn py_dict(map: &Map<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("{}: {}", py_str(key), py_literal(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// A float literal that Python reads back as a number, e.g. `1.0`.
pub fn py_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
