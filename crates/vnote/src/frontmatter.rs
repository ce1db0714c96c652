//! Frontmatter accumulation and preamble rendering.

use crate::extract::preamble_source;
use crate::types::Frontmatter;
use serde_yaml::Value;

/// The system keys stamped onto every assembled variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedKeys {
    pub source: String,
    pub variant_id: String,
    pub variant_name: String,
}

impl ReservedKeys {
    /// `variant_name` falls back to the id when the variant has no name.
    pub fn new(source: impl Into<String>, variant_id: impl Into<String>, variant_name: Option<&str>) -> Self {
        let variant_id = variant_id.into();
        let variant_name = variant_name.map(str::to_string).unwrap_or_else(|| variant_id.clone());
        Self {
            source: source.into(),
            variant_id,
            variant_name,
        }
    }

    fn entries(&self) -> [(Value, Value); 4] {
        [
            ("virtual".into(), Value::Bool(true)),
            ("source".into(), self.source.as_str().into()),
            ("variant_id".into(), self.variant_id.as_str().into()),
            ("variant_name".into(), self.variant_name.as_str().into()),
        ]
    }
}

/// Per-variant frontmatter accumulator.
///
/// Precedence, lowest first: the variant's static defaults, keys copied
/// from sources in execution order, then the reserved keys. A key keeps the
/// position of its first write.
#[derive(Debug, Clone)]
pub struct FrontmatterMerge {
    map: Frontmatter,
    reserved: ReservedKeys,
}

impl FrontmatterMerge {
    pub fn new(defaults: Option<&Frontmatter>, reserved: ReservedKeys) -> Self {
        let mut map = defaults.cloned().unwrap_or_default();
        for (k, v) in reserved.entries() {
            map.insert(k, v);
        }
        Self { map, reserved }
    }

    /// Record a key copied from a source document.
    pub fn copy(&mut self, key: &str, value: Value) {
        self.map.insert(Value::String(key.to_string()), value);
    }

    /// Re-assert the reserved keys and hand back the merged mapping.
    pub fn finish(mut self) -> Frontmatter {
        for (k, v) in self.reserved.entries() {
            self.map.insert(k, v);
        }
        self.map
    }
}

/// Parse the preamble at the top of `text` into a mapping.
///
/// Returns `None` when there is no preamble or it is not a YAML mapping.
/// An empty preamble yields an empty mapping.
pub fn parse_preamble(text: &str) -> Option<Frontmatter> {
    let source = preamble_source(text)?;
    if source.trim().is_empty() {
        return Some(Frontmatter::new());
    }
    match serde_yaml::from_str::<Value>(source) {
        Ok(Value::Mapping(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable preamble");
            None
        }
    }
}

/// Render a mapping as a `---` delimited preamble, one `key: value` per line.
///
/// Strings are JSON-quoted; sequences and mappings are written inline.
pub fn render_preamble(frontmatter: &Frontmatter) -> String {
    let items: Vec<String> = frontmatter
        .iter()
        .map(|(k, v)| format!("{}: {}", render_key(k), render_value(v)))
        .collect();
    format!("---\n{}\n---", items.join("\n"))
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => render_value(other),
    }
}

/// Render one value in the inline preamble syntax.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s)),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k), render_value(v)))
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}

/// Integral floats drop the fraction; non-finite values use the
/// `Infinity` / `NaN` spelling instead of YAML's `.inf` / `.nan`.
fn render_number(n: &serde_yaml::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_nan() => "NaN".to_string(),
        Some(f) if f.is_infinite() => {
            if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
        }
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &Frontmatter) -> Vec<String> {
        map.keys().map(render_key).collect()
    }

    #[test]
    fn test_reserved_keys_name_fallback() {
        let r = ReservedKeys::new("a.md", "v1", None);
        assert_eq!(r.variant_name, "v1");
        let r = ReservedKeys::new("a.md", "v1", Some("First"));
        assert_eq!(r.variant_name, "First");
    }

    #[test]
    fn test_merge_order_and_precedence() {
        let mut defaults = Frontmatter::new();
        defaults.insert("tags".into(), "draft".into());
        defaults.insert("variant_id".into(), "spoofed".into());

        let mut merge = FrontmatterMerge::new(
            Some(&defaults),
            ReservedKeys::new("notes/a.md", "short", Some("Short")),
        );
        merge.copy("tags", "final".into());
        merge.copy("author", "ann".into());
        merge.copy("virtual", Value::Bool(false));
        let out = merge.finish();

        assert_eq!(
            keys(&out),
            vec!["tags", "variant_id", "virtual", "source", "variant_name", "author"]
        );
        assert_eq!(out.get("tags"), Some(&Value::from("final")));
        assert_eq!(out.get("variant_id"), Some(&Value::from("short")));
        assert_eq!(out.get("virtual"), Some(&Value::Bool(true)));
        assert_eq!(out.get("source"), Some(&Value::from("notes/a.md")));
    }

    #[test]
    fn test_later_copy_wins() {
        let mut merge = FrontmatterMerge::new(None, ReservedKeys::new("a", "b", None));
        merge.copy("k", 1.into());
        merge.copy("k", 2.into());
        assert_eq!(merge.finish().get("k"), Some(&Value::from(2)));
    }

    #[test]
    fn test_render_preamble() {
        let out = FrontmatterMerge::new(None, ReservedKeys::new("a.md", "v1", None)).finish();
        assert_eq!(
            render_preamble(&out),
            "---\nvirtual: true\nsource: \"a.md\"\nvariant_id: \"v1\"\nvariant_name: \"v1\"\n---"
        );
    }

    #[test]
    fn test_render_values() {
        let v: Value = serde_yaml::from_str("[a, 1, true, null]").unwrap();
        assert_eq!(render_value(&v), "[\"a\", 1, true, null]");

        let v: Value = serde_yaml::from_str("{ x: 1, y: \"two\" }").unwrap();
        assert_eq!(render_value(&v), "{ x: 1, y: \"two\" }");

        assert_eq!(render_value(&Value::from("say \"hi\"\n")), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(render_value(&Value::from(2.5)), "2.5");
    }

    #[test]
    fn test_render_numbers() {
        let v: Value = serde_yaml::from_str("[3, 1.0, 2.5, -0.0, .inf, -.inf, .nan]").unwrap();
        assert_eq!(
            render_value(&v),
            "[3, 1, 2.5, 0, Infinity, -Infinity, NaN]"
        );
    }

    #[test]
    fn test_parse_preamble() {
        let fm = parse_preamble("---\ntitle: Hi\ntags: [a, b]\n---\nbody").unwrap();
        assert_eq!(fm.get("title"), Some(&Value::from("Hi")));
        assert!(parse_preamble("no preamble").is_none());
        assert!(parse_preamble("---\n- a list\n---\n").is_none());
        assert!(parse_preamble("---\n---\n").unwrap().is_empty());
    }
}
