//! Text templates.

use xidl_util::{Error, Result};

/// A text template filling `@field@` placeholders with queued values.
///
/// A horizontal tab in the template raises the indent level, a vertical
/// tab lowers it, and every newline re-applies the current indent to the
/// output. `@@` produces a literal `@`. Rendering fails when placeholder
/// and value counts disagree or a placeholder is left unclosed.
pub struct TextTmpl<'a> {
    tmpl: &'a str,
    indent_width: usize,
    indent_level: usize,
    spaces: String,
    values: Vec<String>,
}

impl<'a> TextTmpl<'a> {
    /// A template with the given text and indent width.
    pub fn new(tmpl: &'a str, indent_width: usize) -> Self {
        TextTmpl {
            tmpl,
            indent_width,
            indent_level: 0,
            spaces: String::new(),
            values: Vec::new(),
        }
    }

    /// Queue the next field value.
    pub fn add_param(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Queue an empty string for the next field.
    pub fn skip_param(mut self) -> Self {
        self.values.push(String::new());
        self
    }

    /// Expand the template.
    pub fn render(mut self) -> Result<String> {
        let mut result = String::new();
        let mut values = std::mem::take(&mut self.values).into_iter();
        let mut chars = self.tmpl.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '@' {
                self.append_char(&mut result, ch);
                continue;
            }

            if chars.peek() == Some(&'@') {
                chars.next();
                result.push('@');
                continue;
            }

            let value = values
                .next()
                .ok_or_else(|| Error::internal("missing field values exist"))?;
            self.append_str(&mut result, &value);

            // Skip the placeholder name up to the closing '@'.
            loop {
                match chars.next() {
                    Some('@') => break,
                    Some(_) => {}
                    None => return Err(Error::internal("unbalanced @ in template")),
                }
            }
        }

        if values.next().is_some() {
            return Err(Error::internal("excessive number of field values given"));
        }

        Ok(result)
    }

    fn append_char(&mut self, target: &mut String, ch: char) {
        match ch {
            '\n' => {
                target.push('\n');
                target.push_str(&self.spaces);
            }
            '\t' => {
                self.indent_level += 1;
                self.spaces = " ".repeat(self.indent_level * self.indent_width);
            }
            '\x0B' => {
                debug_assert!(self.indent_level > 0, "indent level underflow");
                self.indent_level = self.indent_level.saturating_sub(1);
                self.spaces = " ".repeat(self.indent_level * self.indent_width);
            }
            _ => target.push(ch),
        }
    }

    fn append_str(&mut self, target: &mut String, value: &str) {
        for ch in value.chars() {
            self.append_char(target, ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        let text = TextTmpl::new("hello @name@!", 4)
            .add_param("world")
            .render()
            .unwrap();
        assert_eq!(text, "hello world!");
    }

    #[test]
    fn test_indent_control() {
        let text = TextTmpl::new("begin\t\nline\x0B\nend", 4)
            .render()
            .unwrap();
        assert_eq!(text, "begin\n    line\nend");
    }

    #[test]
    fn test_multiline_value_indented() {
        let text = TextTmpl::new("{\t\n@body@\x0B\n}", 4)
            .add_param("a;\nb;")
            .render()
            .unwrap();
        assert_eq!(text, "{\n    a;\n    b;\n}");
    }

    #[test]
    fn test_literal_at() {
        let text = TextTmpl::new("user@@host", 4).render().unwrap();
        assert_eq!(text, "user@host");
    }

    #[test]
    fn test_skip_param() {
        let text = TextTmpl::new("<@a@|@b@>", 2)
            .add_param("x")
            .skip_param()
            .render()
            .unwrap();
        assert_eq!(text, "<x|>");
    }

    #[test]
    fn test_missing_value_fails() {
        let err = TextTmpl::new("@only@", 4).render().unwrap_err();
        assert!(err.to_string().contains("missing field values"));
    }

    #[test]
    fn test_excess_values_fail() {
        let err = TextTmpl::new("plain", 4)
            .add_param("extra")
            .render()
            .unwrap_err();
        assert!(err.to_string().contains("excessive number"));
    }

    #[test]
    fn test_unbalanced_placeholder_fails() {
        let err = TextTmpl::new("@open", 4).add_param("x").render().unwrap_err();
        assert!(err.to_string().contains("unbalanced @"));
    }
}
