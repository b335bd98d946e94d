//! Lists the paragraph styles the body actually uses.
//!
//! Every distinct `style` of a `<paragraph-definition>` gets one
//! `<paragraph-style-in-body>` entry, carrying the formatting the style table
//! gives it, in a `<styles-in-body>` block at the end of the preamble.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use super::pass::{Pass, emit, read_all};
use std::io::{BufRead, Write};

#[derive(Debug, Default)]
pub struct BodyStyles {
    used: Vec<String>,
}

impl BodyStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style names in order of first use.
    pub fn used(&self) -> &[String] {
        &self.used
    }
}

impl Pass for BodyStyles {
    fn name(&self) -> &'static str {
        "body_styles"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        let mut table: Vec<ir::Attrs> = Vec::new();
        for line in &lines {
            let Some(tag) = ir::parse_tag(line) else {
                continue;
            };
            match tag.element {
                "paragraph-style-in-table" => table.push(tag.owned_attrs()),
                "paragraph-definition" => {
                    if let Some(style) = tag.attr("style")
                        && !self.used.iter().any(|s| s == style)
                    {
                        self.used.push(style.to_string());
                    }
                },
                _ => {},
            }
        }

        let entries: Vec<String> = self
            .used
            .iter()
            .map(|name| {
                let mut attrs = vec![("name".to_string(), name.clone())];
                if let Some(defined) = table
                    .iter()
                    .find(|attrs| attrs.iter().any(|(k, v)| k == "name" && v == name))
                {
                    attrs.extend(
                        defined
                            .iter()
                            .filter(|(k, _)| k != "name" && k != "num")
                            .cloned(),
                    );
                }
                ir::empty_tag_with("paragraph-style-in-body", &attrs)
            })
            .collect();

        let preamble_close = ir::close_tag("preamble");
        for line in &lines {
            if *line == preamble_close && !entries.is_empty() {
                emit(output, &ir::open_tag("styles-in-body"))?;
                for entry in &entries {
                    emit(output, entry)?;
                }
                emit(output, &ir::close_tag("styles-in-body"))?;
            }
            emit(output, line)?;
        }
        Ok(())
    }
}
