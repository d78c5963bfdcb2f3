//! Output of decoded values.

use std::{fmt, io};
use std::str::FromStr;
use crate::ber::Value;
use crate::utils::json::JsonBuilder;


//------------ OutputFormat --------------------------------------------------

/// The output format for decoded values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// An indented tree.
    ///
    /// Each value gets one line with its type, the length of its content,
    /// and, for the types the decoder interprets, the content itself. The
    /// elements of constructed values follow indented on the next lines.
    #[default]
    Text,

    /// A JSON object.
    ///
    /// The object has the members `"type"`, `"class"`, `"tag"`,
    /// `"constructed"`, `"length"`, and, as applicable, `"value"` with
    /// the rendered content and `"elements"` with an array of the nested
    /// values.
    Json,
}

/// The number of content octets shown for values without interpretation.
const HEX_PREVIEW_LEN: usize = 16;

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    /// Outputs `value` to `target` in this format and flushes `target`.
    ///
    /// A closed pipe is not considered an error.
    pub fn output<W: io::Write>(
        self,
        value: &Value,
        target: &mut W,
    ) -> Result<(), io::Error> {
        ignore_broken_pipe(
            self._output(value, target).and_then(|()| target.flush())
        )
    }

    fn _output<W: io::Write>(
        self,
        value: &Value,
        target: &mut W,
    ) -> Result<(), io::Error> {
        match self {
            OutputFormat::Text => text_value(value, 0, target),
            OutputFormat::Json => {
                let json = JsonBuilder::build(|json| json_value(value, json));
                writeln!(target, "{}", json)
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("invalid output format '{}'", s))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Plain Text ----------------------------------------------------

/// Outputs `text` to `target` as is and flushes `target`.
///
/// A closed pipe is not considered an error.
pub fn output_text<W: io::Write>(
    text: &str, target: &mut W
) -> Result<(), io::Error> {
    ignore_broken_pipe(
        target.write_all(text.as_bytes()).and_then(|()| target.flush())
    )
}

fn ignore_broken_pipe(res: Result<(), io::Error>) -> Result<(), io::Error> {
    match res {
        Err(ref err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        res => res
    }
}


//------------ Text Format ---------------------------------------------------

fn text_value<W: io::Write>(
    value: &Value, indent: usize, target: &mut W
) -> Result<(), io::Error> {
    write!(
        target, "{:indent$}{} [{}]",
        "", value.type_desc(), value.body().len(),
        indent = indent * 2
    )?;
    match value {
        Value::Constructed(cons) => {
            writeln!(target)?;
            for item in cons {
                text_value(item, indent + 1, target)?;
            }
            Ok(())
        }
        Value::Text(_) => {
            writeln!(target, ": {:?}", Rendered(value).to_string())
        }
        _ => {
            let rendered = Rendered(value).to_string();
            if rendered.is_empty() {
                writeln!(target)
            }
            else {
                writeln!(target, ": {}", rendered)
            }
        }
    }
}


//------------ JSON Format ---------------------------------------------------

fn json_value(value: &Value, json: &mut JsonBuilder) {
    json.member_str("type", value.type_desc());
    json.member_str("class", value.class());
    json.member_raw("tag", value.tag().number());
    json.member_raw("constructed", value.is_constructed());
    json.member_raw("length", value.body().len());
    match value {
        Value::Constructed(cons) => {
            json.member_array("elements", |json| {
                for item in cons {
                    json.array_object(|json| json_value(item, json))
                }
            })
        }
        _ => {
            let rendered = Rendered(value).to_string();
            if !rendered.is_empty() || value.is_text() {
                json.member_str("value", rendered)
            }
        }
    }
}


//------------ Rendered ------------------------------------------------------

/// Displays the content of a primitive value.
///
/// Values the decoder interprets are shown in their natural form. Other
/// values are shown as hex digits, truncated for long content.
struct Rendered<'a, 'b>(&'a Value<'b>);

impl fmt::Display for Rendered<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Value::Constructed(_) => Ok(()),
            Value::Boolean(value) => {
                f.write_str(if value.get() { "TRUE" } else { "FALSE" })
            }
            Value::Oid(value) => write!(f, "{}", value.oid()),
            Value::Text(value) => {
                match value.to_utf8() {
                    Ok(text) => f.write_str(&text),
                    Err(_) => f.write_str("[invalid text]"),
                }
            }
            Value::UtcTime(value) => write!(f, "{}", value.time()),
            Value::Generic(value) => {
                let body = value.body();
                let preview = &body[..body.len().min(HEX_PREVIEW_LEN)];
                f.write_str(&hex::encode(preview))?;
                if body.len() > HEX_PREVIEW_LEN {
                    f.write_str("...")?;
                }
                Ok(())
            }
        }
    }
}


//============ Tests =========================================================
