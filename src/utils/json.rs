//! Building JSON on the fly.

use std::fmt;
use crate::utils::fmt::WriteOrPanic;


//------------ JsonBuilder ---------------------------------------------------

/// A helper type for building a JSON-encoded string on the fly.
///
/// Members and array items are added through closures which receive a
/// builder for the nested level, so the structure of the code mirrors the
/// structure of the output. Keys and string values are escaped via
/// [`json_str`].
pub struct JsonBuilder<'a> {
    target: &'a mut String,
    indent: usize,
    empty: bool,
}

impl JsonBuilder<'static> {
    /// Builds a JSON object.
    ///
    /// The closure is called with a builder for the members of the object.
    pub fn build<F: FnOnce(&mut JsonBuilder)>(op: F) -> String {
        let mut target = String::new();
        JsonBuilder {
            target: &mut target, indent: 0, empty: true
        }.array_object(op);
        target
    }
}

impl JsonBuilder<'_> {
    pub fn member_array<F: FnOnce(&mut JsonBuilder)>(
        &mut self, key: impl fmt::Display, op: F
    ) {
        self.append_key(key);
        self.target.push_str("[\n");
        self.nested(op);
        self.append_indent();
        self.target.push(']');
    }

    pub fn member_str(
        &mut self, key: impl fmt::Display, value: impl fmt::Display
    ) {
        self.append_key(key);
        self.target.push('"');
        write!(self.target, "{}", json_str(value));
        self.target.push('"');
    }

    /// Adds a member with a value that is written unquoted.
    ///
    /// This is meant for numbers, booleans, and `null`.
    pub fn member_raw(
        &mut self, key: impl fmt::Display, value: impl fmt::Display
    ) {
        self.append_key(key);
        write!(self.target, "{}", json_str(value));
    }

    pub fn array_object<F: FnOnce(&mut JsonBuilder)>(&mut self, op: F) {
        self.append_array_head();
        self.append_indent();
        self.target.push_str("{\n");
        self.nested(op);
        self.append_indent();
        self.target.push('}');
    }

    /// Runs `op` with a builder one level deeper.
    ///
    /// Leaves the target at the start of the line after the nested content.
    fn nested<F: FnOnce(&mut JsonBuilder)>(&mut self, op: F) {
        let mut nested = JsonBuilder {
            target: self.target,
            indent: self.indent + 1,
            empty: true
        };
        op(&mut nested);
        if !nested.empty {
            self.target.push('\n');
        }
    }

    fn append_key(&mut self, key: impl fmt::Display) {
        self.append_array_head();
        self.append_indent();
        self.target.push('"');
        write!(self.target, "{}", json_str(key));
        self.target.push('"');
        self.target.push_str(": ");
    }

    fn append_array_head(&mut self) {
        if self.empty {
            self.empty = false
        }
        else {
            self.target.push_str(",\n");
        }
    }

    fn append_indent(&mut self) {
        for _ in 0..self.indent {
            self.target.push_str("   ");
        }
    }
}


//------------ json_str -----------------------------------------------------

/// Returns a value displaying `val` escaped for use in a JSON string.
///
/// Quotation marks and backslashes are escaped. So are control characters
/// since decoded text may well contain them.
pub fn json_str(val: impl fmt::Display) -> impl fmt::Display {
    struct WriteJsonStr<'a, 'f>(&'a mut fmt::Formatter<'f>);

    impl fmt::Write for WriteJsonStr<'_, '_> {
        fn write_str(&mut self, mut s: &str) -> fmt::Result {
            while let Some(idx) = s.find(|ch: char| {
                ch == '"' || ch == '\\' || ch.is_control()
            }) {
                self.0.write_str(&s[..idx])?;
                let ch = match s[idx..].chars().next() {
                    Some(ch) => ch,
                    None => break,
                };
                match ch {
                    '"' => self.0.write_str("\\\"")?,
                    '\\' => self.0.write_str("\\\\")?,
                    '\n' => self.0.write_str("\\n")?,
                    '\r' => self.0.write_str("\\r")?,
                    '\t' => self.0.write_str("\\t")?,
                    ch => {
                        // All control characters are in the BMP.
                        write!(self.0, "\\u{:04x}", u32::from(ch))?
                    }
                }
                s = &s[idx + ch.len_utf8()..];
            }
            self.0.write_str(s)
        }
    }

    struct JsonStr<T>(T);

    impl<T: fmt::Display> fmt::Display for JsonStr<T> {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            use std::fmt::Write;

            write!(&mut WriteJsonStr(f), "{}", self.0)
        }
    }

    JsonStr(val)
}


//============ Tests =========================================================
