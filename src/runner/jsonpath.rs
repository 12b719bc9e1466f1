//! JSONPath subset / JSONPath 子集
//!
//! Enough JSONPath for response checks: `$`, `.key`, `['key']`, `[n]`,
//! `[-n]`, `[*]`, `.*`, `..key` and `..*`. A path without a leading `$` is
//! read relative to the root, so `data.id` means `$.data.id`.
//!
//! 满足响应检查所需的 JSONPath 子集。没有前导 `$` 的路径相对于根节点解析。

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonPathError {
    #[error("empty JSONPath expression")]
    Empty,
    #[error("unexpected character `{found}` at position {position}")]
    Unexpected { position: usize, found: char },
    #[error("JSONPath expression ends unexpectedly")]
    Truncated,
    #[error("unterminated bracket starting at position {0}")]
    Unterminated(usize),
    #[error("invalid bracket selector `{0}`")]
    InvalidSelector(String),
}

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Child(String),
    Index(i64),
    Wildcard,
    Descendant(String),
    DescendantAll,
}

/// Parses `path` into segments.
pub fn parse(path: &str) -> Result<Vec<Segment>, JsonPathError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(JsonPathError::Empty);
    }
    let normalized = if path.starts_with('$') {
        path.to_string()
    } else if path.starts_with('[') {
        format!("${}", path)
    } else {
        format!("$.{}", path)
    };

    let chars: Vec<char> = normalized.chars().collect();
    let mut segments = Vec::new();
    let mut i = 1;

    while i < chars.len() {
        match chars[i] {
            '.' if chars.get(i + 1) == Some(&'.') => {
                i += 2;
                if chars.get(i) == Some(&'*') {
                    segments.push(Segment::DescendantAll);
                    i += 1;
                } else {
                    let name = read_name(&chars, &mut i)?;
                    segments.push(Segment::Descendant(name));
                }
            }
            '.' => {
                i += 1;
                if chars.get(i) == Some(&'*') {
                    segments.push(Segment::Wildcard);
                    i += 1;
                } else {
                    let name = read_name(&chars, &mut i)?;
                    segments.push(Segment::Child(name));
                }
            }
            '[' => segments.push(read_bracket(&chars, &mut i)?),
            found => return Err(JsonPathError::Unexpected { position: i, found }),
        }
    }

    Ok(segments)
}

fn read_name(chars: &[char], i: &mut usize) -> Result<String, JsonPathError> {
    let start = *i;
    while *i < chars.len() && chars[*i] != '.' && chars[*i] != '[' {
        *i += 1;
    }
    if start == *i {
        return match chars.get(start) {
            Some(found) => Err(JsonPathError::Unexpected {
                position: start,
                found: *found,
            }),
            None => Err(JsonPathError::Truncated),
        };
    }
    Ok(chars[start..*i].iter().collect())
}

fn read_bracket(chars: &[char], i: &mut usize) -> Result<Segment, JsonPathError> {
    let open = *i;
    *i += 1;

    if let Some(quote) = chars.get(*i).copied().filter(|c| *c == '\'' || *c == '"') {
        *i += 1;
        let start = *i;
        while *i < chars.len() && chars[*i] != quote {
            *i += 1;
        }
        if *i >= chars.len() {
            return Err(JsonPathError::Unterminated(open));
        }
        let key: String = chars[start..*i].iter().collect();
        *i += 1;
        if chars.get(*i) != Some(&']') {
            return Err(JsonPathError::Unterminated(open));
        }
        *i += 1;
        return Ok(Segment::Child(key));
    }

    let start = *i;
    while *i < chars.len() && chars[*i] != ']' {
        *i += 1;
    }
    if *i >= chars.len() {
        return Err(JsonPathError::Unterminated(open));
    }
    let selector: String = chars[start..*i].iter().collect::<String>().trim().to_string();
    *i += 1;

    if selector == "*" {
        return Ok(Segment::Wildcard);
    }
    selector
        .parse::<i64>()
        .map(Segment::Index)
        .map_err(|_| JsonPathError::InvalidSelector(selector))
}

/// All values matched by `path`, in document order.
/// 按文档顺序返回 `path` 匹配的所有值。
pub fn select<'a>(root: &'a Value, path: &str) -> Result<Vec<&'a Value>, JsonPathError> {
    let segments = parse(path)?;
    let mut current = vec![root];

    for segment in &segments {
        let mut next = Vec::new();
        for value in current {
            match segment {
                Segment::Child(key) => {
                    if let Some(child) = value.as_object().and_then(|map| map.get(key)) {
                        next.push(child);
                    }
                }
                Segment::Index(index) => {
                    if let Value::Array(items) = value {
                        let len = items.len() as i64;
                        let position = if *index < 0 { len + index } else { *index };
                        if (0..len).contains(&position) {
                            next.push(&items[position as usize]);
                        }
                    }
                }
                Segment::Wildcard => push_children(value, &mut next),
                Segment::Descendant(key) => collect_descendants(value, Some(key), &mut next),
                Segment::DescendantAll => collect_descendants(value, None, &mut next),
            }
        }
        current = next;
    }

    Ok(current)
}

/// The first value matched by `path`.
pub fn first<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>, JsonPathError> {
    Ok(select(root, path)?.into_iter().next())
}

fn push_children<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => out.extend(items.iter()),
        Value::Object(map) => out.extend(map.values()),
        _ => {}
    }
}

fn collect_descendants<'a>(value: &'a Value, key: Option<&String>, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            match key {
                Some(key) => {
                    if let Some(hit) = map.get(key) {
                        out.push(hit);
                    }
                }
                None => out.extend(map.values()),
            }
            for child in map.values() {
                collect_descendants(child, key, out);
            }
        }
        Value::Array(items) => {
            if key.is_none() {
                out.extend(items.iter());
            }
            for child in items {
                collect_descendants(child, key, out);
            }
        }
        _ => {}
    }
}
