//! JSON pointers over `serde_json::Value`.
//!
//! Object members are looked up by exact name first and then ASCII
//! case-insensitively, so `/firstname` addresses a `firstName` member.

use serde_json::{Map, Value};

/// A parsed pointer. The empty pointer addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// Parse `""` or `/a/b~1c`. Returns `None` for a pointer without a
    /// leading `/` or with a `~` escape other than `~0` and `~1`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(Self { tokens: Vec::new() });
        }
        let rest = raw.strip_prefix('/')?;
        let tokens = rest.split('/').map(unescape).collect::<Option<Vec<_>>>()?;
        Some(Self { tokens })
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Parent pointer and last token, `None` for the root
    pub fn split_last(&self) -> Option<(JsonPointer, &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((
            JsonPointer {
                tokens: parent.to_vec(),
            },
            last,
        ))
    }

    /// True if `self` is strictly below `other`
    pub fn is_descendant_of(&self, other: &JsonPointer) -> bool {
        self.tokens.len() > other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    pub fn get<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        self.tokens.iter().try_fold(document, |node, token| match node {
            Value::Object(map) => {
                let key = member_key(map, token)?;
                map.get(&key)
            }
            Value::Array(items) => items.get(array_index(token)?),
            _ => None,
        })
    }

    pub fn get_mut<'v>(&self, document: &'v mut Value) -> Option<&'v mut Value> {
        self.tokens.iter().try_fold(document, |node, token| match node {
            Value::Object(map) => {
                let key = member_key(map, token)?;
                map.get_mut(&key)
            }
            Value::Array(items) => items.get_mut(array_index(token)?),
            _ => None,
        })
    }
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next()? {
                '0' => out.push('~'),
                '1' => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Existing member name addressed by `token`
pub(crate) fn member_key(map: &Map<String, Value>, token: &str) -> Option<String> {
    if map.contains_key(token) {
        return Some(token.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(token)).cloned()
}

/// Array index without leading zeros; `-` is not an index
pub(crate) fn array_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_escape() {
        let p = JsonPointer::parse("/a~1b/c~0d").unwrap();
        assert_eq!(p.tokens, vec!["a/b".to_string(), "c~d".to_string()]);
        assert!(JsonPointer::parse("").unwrap().is_root());
        assert!(JsonPointer::parse("a").is_none());
        assert!(JsonPointer::parse("/a~2").is_none());
        assert!(JsonPointer::parse("/a~").is_none());
    }

    #[test]
    fn test_get_case_insensitive_member() {
        let doc = json!({"firstName": "Ann", "tags": ["x", "y"]});
        let p = JsonPointer::parse("/firstname").unwrap();
        assert_eq!(p.get(&doc), Some(&json!("Ann")));
        assert_eq!(JsonPointer::parse("/tags/1").unwrap().get(&doc), Some(&json!("y")));
        assert!(JsonPointer::parse("/tags/01").unwrap().get(&doc).is_none());
        assert!(JsonPointer::parse("/tags/-").unwrap().get(&doc).is_none());
    }

    #[test]
    fn test_exact_member_wins_over_case_insensitive() {
        let doc = json!({"Name": 1, "name": 2});
        assert_eq!(JsonPointer::parse("/name").unwrap().get(&doc), Some(&json!(2)));
    }

    #[test]
    fn test_descendant() {
        let a = JsonPointer::parse("/a").unwrap();
        let ab = JsonPointer::parse("/a/b").unwrap();
        assert!(ab.is_descendant_of(&a));
        assert!(!a.is_descendant_of(&a));
        assert!(!a.is_descendant_of(&ab));
    }
}
