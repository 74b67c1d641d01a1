//! Indentation-aware output buffer

use crate::config::PrinterConfiguration;

/// Accumulates printed text, indenting the first `print` of each line
///
/// Text is written as given: line breaks inside a printed string do not
/// trigger indentation, so verbatim source and block comments keep their
/// own layout.
#[derive(Debug, Clone)]
pub struct SourcePrinter {
    buffer: String,
    indent_unit: String,
    end_of_line: String,
    level: usize,
    at_line_start: bool,
}

impl SourcePrinter {
    pub fn new(config: &PrinterConfiguration) -> Self {
        Self {
            buffer: String::with_capacity(4096),
            indent_unit: " ".repeat(config.indent_size),
            end_of_line: config.end_of_line.clone(),
            level: 0,
            at_line_start: true,
        }
    }

    pub fn print(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if self.at_line_start {
            for _ in 0..self.level {
                self.buffer.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
        self.buffer.push_str(text);
        self
    }

    pub fn println(&mut self, text: &str) -> &mut Self {
        self.print(text);
        self.buffer.push_str(&self.end_of_line);
        self.at_line_start = true;
        self
    }

    /// End the current line; on an empty line this leaves a blank line
    pub fn newline(&mut self) -> &mut Self {
        self.println("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub fn unindent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    pub fn end_of_line(&self) -> &str {
        &self.end_of_line
    }

    pub fn is_at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer(indent_size: usize) -> SourcePrinter {
        SourcePrinter::new(&PrinterConfiguration {
            indent_size,
            ..PrinterConfiguration::default()
        })
    }

    #[test]
    fn indentation_applies_at_line_start() {
        let mut p = printer(2);
        p.println("{").indent().print("a").print(";").newline();
        p.unindent().print("}");
        assert_eq!(p.finish(), "{\n  a;\n}");
    }

    #[test]
    fn blank_lines_are_not_indented() {
        let mut p = printer(4);
        p.indent().newline().println("x");
        assert_eq!(p.as_str(), "\n    x\n");
    }

    #[test]
    fn embedded_line_breaks_are_verbatim() {
        let mut p = printer(4);
        p.indent().print("/* a\n b */").newline();
        assert_eq!(p.finish(), "    /* a\n b */\n");
    }

    #[test]
    fn unindent_saturates() {
        let mut p = printer(4);
        p.unindent().print("x");
        assert_eq!(p.finish(), "x");
    }
}
