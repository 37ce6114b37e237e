// SPDX-License-Identifier: Apache-2.0

/// A minimal JSON writer: the generated codec drives it field by field, it
/// owns only comma placement and string escaping.
///
/// Always emits compact output (no indentation); a pretty-printing variant
/// is a presentation concern layered on top by a caller, not this writer.
pub struct JsonWriter {
    out: String,
    /// One entry per open `{`/`[`; `true` once that container has written
    /// its first member, so the next one gets a leading comma.
    needs_comma: Vec<bool>,
}

impl JsonWriter {
    pub fn new() -> Self {
        JsonWriter {
            out: String::new(),
            needs_comma: Vec::new(),
        }
    }

    fn before_value(&mut self) {
        if let Some(top) = self.needs_comma.last_mut() {
            if *top {
                self.out.push(',');
            }
            *top = true;
        }
    }

    pub fn begin_object(&mut self) {
        self.before_value();
        self.out.push('{');
        self.needs_comma.push(false);
    }

    pub fn end_object(&mut self) {
        self.needs_comma.pop();
        self.out.push('}');
    }

    pub fn begin_array(&mut self) {
        self.before_value();
        self.out.push('[');
        self.needs_comma.push(false);
    }

    pub fn end_array(&mut self) {
        self.needs_comma.pop();
        self.out.push(']');
    }

    /// Writes an object key (as a JSON string) followed by `:`. Does not
    /// itself count as the value, so it doesn't trigger the comma logic --
    /// the value written immediately after does.
    pub fn write_key(&mut self, key: &str) {
        self.before_value();
        // Suppress the comma this key's own `before_value` call would have
        // primed for the value that follows immediately after.
        if let Some(top) = self.needs_comma.last_mut() {
            *top = false;
        }
        write_escaped_string(&mut self.out, key);
        self.out.push(':');
    }

    pub fn write_string(&mut self, value: &str) {
        self.before_value();
        write_escaped_string(&mut self.out, value);
    }

    /// Writes pre-formatted text verbatim (numbers, `true`/`false`/`null`),
    /// bumping the comma state as any other value would.
    pub fn write_raw(&mut self, raw: &str) {
        self.before_value();
        self.out.push_str(raw);
    }

    pub fn write_null(&mut self) {
        self.write_raw("null");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_raw(if value { "true" } else { "false" });
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_escaped_string(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_an_object_with_commas() {
        let mut w = JsonWriter::new();
        w.begin_object();
        w.write_key("a");
        w.write_raw("1");
        w.write_key("b");
        w.write_string("two");
        w.end_object();
        assert_eq!(w.finish(), r#"{"a":1,"b":"two"}"#);
    }

    #[test]
    fn writes_nested_arrays() {
        let mut w = JsonWriter::new();
        w.begin_array();
        w.write_raw("1");
        w.begin_array();
        w.write_raw("2");
        w.write_raw("3");
        w.end_array();
        w.end_array();
        assert_eq!(w.finish(), "[1,[2,3]]");
    }

    #[test]
    fn escapes_control_characters() {
        let mut w = JsonWriter::new();
        w.write_string("a\nb\tc\"d");
        assert_eq!(w.finish(), r#""a\nb\tc\"d""#);
    }
}
