//! Block-style YAML writer for project documents
//!
//! The Python SDK reads these files with a YAML 1.1 loader, which resolves
//! plain `yes`, `1_000` or `2024-01-01` to non-strings. Strings like that are
//! single-quoted here. Every other string is rendered by `serde_yaml`.

use crate::error::{Result, VsdkxError};
use regex::Regex;
use serde_yaml::{Mapping, Number, Value};
use std::sync::OnceLock;

const INDENT: &str = "  ";

/// Plain scalars a YAML 1.1 loader resolves to something other than a string
const YAML11_IMPLICIT: &str = concat!(
    r"^(?:",
    // int: binary, octal, decimal, hex, sexagesimal
    r"[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+",
    r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+",
    // float
    r"|[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?|\.[0-9_]+(?:[eE][-+][0-9]+)?",
    r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN)",
    // bool
    r"|yes|Yes|YES|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF|y|Y|n|N",
    // null, merge, value
    r"|~|null|Null|NULL|<<|=",
    // timestamp
    r"|[0-9]{4}-[0-9]{2}-[0-9]{2}",
    r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?",
    r"(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?",
    r")$"
);

static IMPLICIT_RE: OnceLock<Regex> = OnceLock::new();

fn implicit_regex() -> Result<&'static Regex> {
    if let Some(re) = IMPLICIT_RE.get() {
        return Ok(re);
    }

    let re = Regex::new(YAML11_IMPLICIT)
        .map_err(|e| VsdkxError::Document(format!("Invalid scalar pattern: {e}")))?;
    Ok(IMPLICIT_RE.get_or_init(|| re))
}

/// Render `document` as block-style YAML, keys in their current order
pub fn to_yaml_string(document: &Mapping) -> Result<String> {
    let mut out = String::new();
    if document.is_empty() {
        out.push_str("{}\n");
    } else {
        write_mapping(&mut out, document, 0, false)?;
    }
    Ok(out)
}

fn write_mapping(
    out: &mut String,
    mapping: &Mapping,
    indent: usize,
    inline_first: bool,
) -> Result<()> {
    for (i, (key, value)) in mapping.iter().enumerate() {
        if i > 0 || !inline_first {
            out.push_str(&INDENT.repeat(indent));
        }
        out.push_str(&key_text(key)?);
        out.push(':');

        match value {
            Value::Mapping(inner) if !inner.is_empty() => {
                out.push('\n');
                write_mapping(out, inner, indent + 1, false)?;
            }
            // Sequences sit at the key's indentation
            Value::Sequence(items) if !items.is_empty() => {
                out.push('\n');
                write_sequence(out, items, indent, false)?;
            }
            other => {
                out.push(' ');
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_sequence(
    out: &mut String,
    items: &[Value],
    indent: usize,
    inline_first: bool,
) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || !inline_first {
            out.push_str(&INDENT.repeat(indent));
        }
        out.push_str("- ");

        match item {
            Value::Mapping(inner) if !inner.is_empty() => {
                write_mapping(out, inner, indent + 1, true)?;
            }
            Value::Sequence(inner) if !inner.is_empty() => {
                write_sequence(out, inner, indent + 1, true)?;
            }
            other => {
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn key_text(key: &Value) -> Result<String> {
    match key {
        Value::Sequence(_) | Value::Mapping(_) => flow(key),
        other => inline(other),
    }
}

/// Single-line rendering for scalars, empty collections and tagged values
fn inline(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number(n)),
        Value::String(s) => string(s),
        Value::Sequence(_) | Value::Mapping(_) => flow(value),
        Value::Tagged(tagged) => Ok(format!("{} {}", tagged.tag, flow(&tagged.value)?)),
    }
}

fn flow(value: &Value) -> Result<String> {
    match value {
        Value::Sequence(items) => {
            let items = items.iter().map(flow).collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        Value::Mapping(mapping) => {
            let entries = mapping
                .iter()
                .map(|(k, v)| Ok(format!("{}: {}", flow(k)?, flow(v)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", entries.join(", ")))
        }
        // Flow indicators are legal in plain block scalars but not here
        Value::String(s) if s.contains(|c: char| matches!(c, ',' | '[' | ']' | '{' | '}')) => {
            Ok(double_quoted(s))
        }
        other => inline(other),
    }
}

fn number(n: &Number) -> String {
    let Some(f) = n.as_f64().filter(|_| n.is_f64()) else {
        return n.to_string();
    };

    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() && f > 0.0 {
        ".inf".to_string()
    } else if f.is_infinite() {
        "-.inf".to_string()
    } else {
        yaml11_float(&n.to_string())
    }
}

/// YAML 1.1 floats need a `.` and a signed exponent (`1e20` is a string there)
fn yaml11_float(repr: &str) -> String {
    match repr.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exponent)) => {
            let dot = if mantissa.contains('.') { "" } else { ".0" };
            let sign = if exponent.starts_with('-') || exponent.starts_with('+') {
                ""
            } else {
                "+"
            };
            format!("{mantissa}{dot}e{sign}{exponent}")
        }
        None if repr.contains('.') => repr.to_string(),
        None => format!("{repr}.0"),
    }
}

fn string(s: &str) -> Result<String> {
    if s.is_empty() || implicit_regex()?.is_match(s) {
        return Ok(single_quoted(s));
    }
    if s.contains(char::is_control) {
        return Ok(double_quoted(s));
    }

    let rendered = serde_yaml::to_string(s)
        .map_err(|e| VsdkxError::Document(format!("Failed to serialize string: {e}")))?;
    let rendered = rendered.trim_end_matches('\n');
    let rendered = rendered.strip_prefix("--- ").unwrap_or(rendered);
    if rendered.contains('\n') {
        return Ok(double_quoted(s));
    }
    Ok(rendered.to_string())
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() && (c as u32) <= 0xff => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn render(yaml: &str) -> String {
        to_yaml_string(&mapping(yaml)).unwrap()
    }

    #[test]
    fn test_block_layout() {
        assert_eq!(
            render("a: {b: 1, c: [x, y]}\nd: [[1, 2], {e: 3, f: 4}]\ng: []\nh: {}\n"),
            "a:\n  b: 1\n  c:\n  - x\n  - y\nd:\n- - 1\n  - 2\n- e: 3\n  f: 4\ng: []\nh: {}\n"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_yaml_string(&Mapping::new()).unwrap(), "{}\n");
    }

    #[test]
    fn test_yaml11_ambiguous_strings_are_quoted() {
        for s in [
            "yes", "Yes", "YES", "no", "NO", "on", "On", "off", "OFF", "y", "Y", "n", "N",
            "1_000", "0b101", "0755", "0x1F", "1:30", "190:20:30.15", "1_0.5", ".5",
            "2024-01-01", "2001-12-14t21:59:43.10-05:00", "2001-12-14 21:59:43.10 -5",
            "~", "null", "<<", "=", "",
        ] {
            assert_eq!(string(s).unwrap(), single_quoted(s), "{s:?}");
        }
    }

    #[test]
    fn test_plain_strings_stay_plain() {
        for s in ["yolo", "person", "yesterday", "v1.2.3", "2024-01", "on-device"] {
            assert_eq!(string(s).unwrap(), s, "{s:?}");
        }
    }

    #[test]
    fn test_special_strings() {
        assert_eq!(string("a\nb").unwrap(), "\"a\\nb\"");
        assert_eq!(single_quoted("it's"), "'it''s'");
    }

    #[test]
    fn test_floats_keep_yaml11_form() {
        assert_eq!(yaml11_float("1e20"), "1.0e+20");
        assert_eq!(yaml11_float("1.5e-7"), "1.5e-7");
        assert_eq!(yaml11_float("0.25"), "0.25");
        assert_eq!(yaml11_float("3"), "3.0");
        assert_eq!(render("a: .inf\nb: -.inf\nc: .nan\n"), "a: .inf\nb: -.inf\nc: .nan\n");
    }

    #[test]
    fn test_output_reads_back() {
        let document = mapping(
            "flags: ['yes', 'off', 'y']\nsize: '1_000'\nday: '2024-01-01'\nnested:\n  - name: 'on'\n    weights: [a.pt, 'b, c.pt']\ntext: \"line\\nbreak\"\nbig: 1.0e+20\n",
        );
        let rendered = to_yaml_string(&document).unwrap();
        let reloaded: Mapping = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(reloaded, document);
    }
}
