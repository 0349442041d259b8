//! Line-oriented writer for generated C#

/// Number of spaces per indentation level.
const INDENT_WIDTH: usize = 4;

#[derive(Debug, Default)]
pub struct SourceBuilder {
    lines: Vec<String>,
    /// Current indentation level (number of indent units, not spaces).
    indent: usize,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current indentation string (spaces).
    fn indent_str(&self) -> String {
        " ".repeat(self.indent * INDENT_WIDTH)
    }

    /// Append one line at the current depth. Empty text gives a blank line
    /// without trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indent_str(), text));
        }
        self
    }

    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.line("")
    }

    /// `header` followed by `{`, then one level deeper
    pub fn open_block(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.line("{");
        self.indent += 1;
        self
    }

    pub fn close_block(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.line("}")
    }

    pub fn close_all(&mut self) -> &mut Self {
        while self.indent > 0 {
            self.close_block();
        }
        self
    }

    /// Insert lines before everything written so far, unindented
    pub fn prepend<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut head: Vec<String> = lines.into_iter().map(Into::into).collect();
        head.append(&mut self.lines);
        self.lines = head;
        self
    }

    /// The text with a trailing newline
    pub fn finish(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_indent_and_close() {
        let mut builder = SourceBuilder::new();
        builder
            .open_block("partial class Outer")
            .open_block("partial class Inner")
            .line("// body");
        builder.close_all();

        assert_eq!(
            builder.finish(),
            "partial class Outer\n{\n    partial class Inner\n    {\n        // body\n    }\n}\n"
        );
    }

    #[test]
    fn test_prepend_and_blank_lines() {
        let mut builder = SourceBuilder::new();
        builder.open_block("class A").line("x").blank_line().line("y").close_block();
        builder.prepend(["#nullable enable", ""]);
        assert_eq!(
            builder.finish(),
            "#nullable enable\n\nclass A\n{\n    x\n\n    y\n}\n"
        );
    }
}
