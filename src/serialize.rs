//! Value tree to JavaScript source text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::emit::{js_string, strip_line_breaks};
use crate::value::Value;

lazy_static! {
    static ref BARE_KEY_RE: Regex = Regex::new(r"^(?:[A-Za-z_$][A-Za-z0-9_$]*|0|[1-9][0-9]*)$").unwrap();
}

pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Writes the fields of an object without the surrounding braces.
pub fn serialize_fields(fields: &[(String, Value)]) -> String {
    let mut out = String::new();
    write_fields(fields.iter().map(|(k, v)| (k.as_str(), v)), &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => out.push_str(&js_string(s)),
        Value::Function(src) => out.push_str(&strip_line_breaks(src)),
        Value::Array(items) => write_array(items, out),
        Value::Object(fields) => {
            out.push('{');
            write_fields(fields.iter().map(|(k, v)| (k.as_str(), v)), out);
            out.push('}');
        }
    }
}

// String-only arrays keep their array shape; every other array is written as
// an object keyed by index, e.g. [1, 2] -> {0:1,1:2}.
fn write_array(items: &[Value], out: &mut String) {
    if items.iter().all(|v| matches!(v, Value::String(_))) {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_value(item, out);
        }
        out.push(']');
        return;
    }

    let keys: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
    out.push('{');
    write_fields(keys.iter().map(String::as_str).zip(items.iter()), out);
    out.push('}');
}

fn write_fields<'v, I>(fields: I, out: &mut String)
where
    I: Iterator<Item = (&'v str, &'v Value)>,
{
    for (i, (key, value)) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if BARE_KEY_RE.is_match(key) {
            out.push_str(key);
        } else {
            out.push_str(&js_string(key));
        }
        out.push(':');
        write_value(value, out);
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
