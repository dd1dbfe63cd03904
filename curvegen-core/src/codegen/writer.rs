use crate::error::Result;

/// Accumulates source lines at an explicit indentation depth.
///
/// Scopes are closures: the depth is pushed before the body runs and popped
/// after it returns, whether it returned `Ok` or bailed out with `?`.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    indent: String,
    depth: usize,
    lines: Vec<String>,
}

impl CodeWriter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            depth: 0,
            lines: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn line(&mut self, s: impl AsRef<str>) {
        let s = s.as_ref();
        if s.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indent.repeat(self.depth), s));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn comment(&mut self, s: impl AsRef<str>) {
        self.line(format!("// {}", s.as_ref()));
    }

    /// An empty `s` gives a bare `///` separator line.
    pub fn doc(&mut self, s: impl AsRef<str>) {
        match s.as_ref() {
            "" => self.line("///"),
            s => self.line(format!("/// {}", s)),
        }
    }

    /// `head {`, body one level deeper, `}`.
    pub fn block<F>(&mut self, head: impl AsRef<str>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.line(format!("{} {{", head.as_ref()));
        self.scoped(body)?;
        self.line("}");
        Ok(())
    }

    /// `head`, body one level deeper, then `tail` at the outer level.
    pub fn indented<F>(&mut self, head: impl AsRef<str>, tail: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.line(head);
        self.scoped(body)?;
        self.line(tail);
        Ok(())
    }

    fn scoped<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.depth += 1;
        let out = body(self);
        self.depth -= 1;
        out
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;

    #[test]
    fn test_nested_blocks_indent() {
        let mut w = CodeWriter::new("  ");
        w.block("mod a", |w| {
            w.line("const X: u8 = 1;");
            w.block("fn f()", |w| {
                w.blank();
                w.comment("inner");
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(
            w.into_lines(),
            vec!["mod a {", "  const X: u8 = 1;", "  fn f() {", "", "    // inner", "  }", "}"]
        );
    }

    #[test]
    fn test_depth_restored_on_error() {
        let mut w = CodeWriter::new("\t");
        let out = w.block("outer", |w| {
            w.indented("call(", ");", |_| Err(CodegenError::NotInvertible))
        });
        assert!(out.is_err());
        assert_eq!(w.depth(), 0);
        w.line("after");
        assert_eq!(w.into_lines().last().map(String::as_str), Some("after"));
    }
}
