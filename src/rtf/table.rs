//! RTF table support.
//!
//! RTF tables use a row-based model: `\trowd` starts a row definition whose
//! `\cellxN` words give each cell's right edge, paragraphs marked `\intbl`
//! fill the cells, `\cell` ends a cell and `\row` ends a row. There is no
//! table start or end; a table is whatever run of rows is not interrupted
//! by an ordinary paragraph.
//!
//! [`Tables`] turns that into `<table>`, `<row>` and `<cell>` elements and
//! [`TableInfo`] adds summary statistics to each `<table>`.

use super::border::parse_border;
use super::control_words::attribute_name;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit, read_all};
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Markers that end a table.
const TABLE_ENDERS: &[&str] = &[
    mk::SECT_CLOSE,
    mk::SECT_START,
    mk::BODY_CLOSE,
    mk::FIELD_BLOCK_START,
    mk::FIELD_BLOCK_END,
    mk::FOOTNOTE_CLOSE,
    mk::HEADER_CLOSE,
];

/// Row-definition words that describe the current cell rather than the row.
const CELL_WORDS: &[&str] = &["cell-valig", "cell-merge", "cell-vmerg", "cell-shade"];

/// A cell as described by its row definition.
#[derive(Debug, Clone, Default)]
pub struct CellDef {
    /// Width in points, two decimals
    pub width: String,
    pub attrs: ir::Attrs,
}

/// A row definition (`\trowd … \cellx …`).
#[derive(Debug, Clone, Default)]
pub struct RowDef {
    pub attrs: ir::Attrs,
    pub cells: Vec<CellDef>,
    left: f64,
    last_position: Option<f64>,
    pending_cell: ir::Attrs,
}

impl RowDef {
    fn take(&mut self, line: &str) {
        let name = ir::cw_name(line);
        let value = ir::cw_value(line);
        if ir::category(line) == "bd" {
            let attrs = parse_border(name, value);
            if name.starts_with("bor-cel") {
                self.pending_cell.extend(attrs);
            } else if name.starts_with("bor-t-r") {
                self.attrs.extend(attrs);
            }
            return;
        }
        match name {
            "cell-posit" => {
                let position: f64 = value.parse().unwrap_or(0.0);
                let width = match self.last_position {
                    Some(previous) => position - previous,
                    None => position - self.left,
                };
                self.last_position = Some(position);
                self.cells.push(CellDef {
                    width: format!("{:.2}", width),
                    attrs: std::mem::take(&mut self.pending_cell),
                });
            },
            "row-pos-le" => {
                self.left = value.parse().unwrap_or(0.0);
                self.attrs.push((attribute_name(name), value.to_string()));
            },
            name if CELL_WORDS.contains(&name) => {
                self.pending_cell.push((attribute_name(name), value.to_string()));
            },
            "row-def___" | "in-table__" | "cell______" | "row_______" => {},
            name => self.attrs.push((attribute_name(name), value.to_string())),
        }
    }

    /// `w1, w2, …`
    pub fn widths(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.width.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn row_attrs(&self) -> ir::Attrs {
        let mut attrs = vec![
            ("number-of-cells".to_string(), self.cells.len().to_string()),
            ("widths".to_string(), self.widths()),
        ];
        attrs.extend(self.attrs.iter().cloned());
        attrs
    }

    fn cell_attrs(&self, index: usize) -> ir::Attrs {
        match self.cells.get(index) {
            Some(cell) => {
                let mut attrs = vec![("width".to_string(), cell.width.clone())];
                attrs.extend(cell.attrs.iter().cloned());
                attrs
            },
            None => Vec::new(),
        }
    }
}

/// Builds table structure from row definitions and cell/row ends.
#[derive(Debug, Default)]
pub struct Tables {
    in_body: bool,
    row_def: RowDef,
    def_pending: bool,
    in_table: bool,
    row_open: bool,
    cell_open: bool,
    cell_index: usize,
    intbl: bool,
    pard_seen: bool,
    count: usize,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables written.
    pub fn count(&self) -> usize {
        self.count
    }

    fn open_row(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if !self.in_table {
            self.count += 1;
            self.in_table = true;
            emit(output, mk::TABLE_START)?;
            emit(output, &ir::open_tag("table"))?;
        }
        emit(output, &ir::open_tag_with("row", &self.row_def.row_attrs()))?;
        self.row_open = true;
        self.def_pending = false;
        self.cell_index = 0;
        Ok(())
    }

    fn open_cell(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if !self.row_open {
            self.open_row(output)?;
        }
        emit(
            output,
            &ir::open_tag_with("cell", &self.row_def.cell_attrs(self.cell_index)),
        )?;
        self.cell_open = true;
        Ok(())
    }

    fn close_cell(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if self.cell_open {
            emit(output, mk::CLOSE_CELL)?;
            emit(output, &ir::close_tag("cell"))?;
            self.cell_open = false;
            self.cell_index += 1;
        }
        Ok(())
    }

    fn close_row(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        self.close_cell(output)?;
        if self.row_open {
            emit(output, &ir::close_tag("row"))?;
            self.row_open = false;
        }
        Ok(())
    }

    fn close_table(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        self.close_row(output)?;
        if self.in_table {
            emit(output, mk::TABLE_END)?;
            emit(output, &ir::close_tag("table"))?;
            self.in_table = false;
        }
        Ok(())
    }
}

impl Pass for Tables {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for line in input.lines() {
            let line = line?;
            if !self.in_body {
                self.in_body = line == mk::BODY_OPEN;
                emit(output, &line)?;
                continue;
            }

            if line == mk::PARD_START {
                let table_mode = self.intbl || self.def_pending || (self.in_table && !self.pard_seen);
                self.pard_seen = false;
                if table_mode {
                    if !self.row_open {
                        self.open_row(output)?;
                    }
                    if !self.cell_open {
                        self.open_cell(output)?;
                    }
                } else {
                    self.close_table(output)?;
                }
            } else if TABLE_ENDERS.iter().any(|m| line.starts_with(m)) {
                self.close_table(output)?;
            } else if line.starts_with("cw<tb<") || line.starts_with("cw<bd<") {
                match ir::cw_name(&line) {
                    "row-def___" => {
                        self.row_def = RowDef::default();
                        // a definition repeated inside an open row describes that row
                        self.def_pending = !self.row_open;
                    },
                    "in-table__" => self.intbl = true,
                    "cell______" => {
                        emit(output, &line)?;
                        if !self.cell_open {
                            self.open_cell(output)?;
                        }
                        self.close_cell(output)?;
                        continue;
                    },
                    "row_______" => {
                        emit(output, &line)?;
                        self.close_row(output)?;
                        continue;
                    },
                    _ => self.row_def.take(&line),
                }
            } else if line.starts_with("cw<pf<par-def___") {
                self.intbl = false;
                self.pard_seen = true;
            }
            emit(output, &line)?;
        }
        self.close_table(output)
    }
}

/// Most frequent value; ties go to the value seen first.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, value) in values.enumerate() {
        counts.entry(value).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(value, _)| value)
}

/// Adds row/column statistics to every `<table>`.
#[derive(Debug, Default)]
pub struct TableInfo;

impl TableInfo {
    fn summarize(rows: &[(String, String)]) -> ir::Attrs {
        let columns = rows
            .iter()
            .filter_map(|(cells, _)| cells.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        let widths: Vec<&str> = rows
            .iter()
            .flat_map(|(_, widths)| widths.split(", "))
            .filter(|w| !w.is_empty())
            .collect();
        let mut attrs = vec![
            ("number-of-rows".to_string(), rows.len().to_string()),
            ("number-of-columns".to_string(), columns.to_string()),
        ];
        if let Some(cells) = mode(rows.iter().map(|(cells, _)| cells.as_str())) {
            attrs.push(("mode-cells-per-row".to_string(), cells.to_string()));
        }
        if let Some(width) = mode(widths.iter().copied()) {
            attrs.push(("mode-of-widths".to_string(), width.to_string()));
        }
        if !widths.is_empty() {
            let total: f64 = widths.iter().filter_map(|w| w.parse::<f64>().ok()).sum();
            attrs.push((
                "average-cell-width".to_string(),
                format!("{:.2}", total / widths.len() as f64),
            ));
        }
        attrs
    }
}

impl Pass for TableInfo {
    fn name(&self) -> &'static str {
        "table_info"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        let table_open = ir::open_tag("table");
        let table_close = ir::close_tag("table");
        for (index, line) in lines.iter().enumerate() {
            if *line != table_open {
                emit(output, line)?;
                continue;
            }
            let mut rows = Vec::new();
            for later in &lines[index + 1..] {
                if *later == table_close {
                    break;
                }
                if let Some(tag) = ir::parse_tag(later)
                    && tag.element == "row"
                    && tag.kind == ir::TagKind::Open
                {
                    rows.push((
                        tag.attr("number-of-cells").unwrap_or("0").to_string(),
                        tag.attr("widths").unwrap_or("").to_string(),
                    ));
                }
            }
            emit(output, &ir::open_tag_with("table", &Self::summarize(&rows)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn two_by_two() -> String {
        stream(&[
            "mi<mk<body-open_",
            "cw<tb<row-def___<nu<true",
            "cw<tb<cell-posit<nu<72.00",
            "cw<tb<cell-posit<nu<144.00",
            "mi<mk<pard-start",
            "tx<nu<__________<A",
            "cw<tb<cell______<nu<true",
            "mi<mk<pard-start",
            "tx<nu<__________<B",
            "cw<tb<cell______<nu<true",
            "cw<tb<row_______<nu<true",
            "mi<mk<pard-start",
            "tx<nu<__________<C",
            "cw<tb<cell______<nu<true",
            "mi<mk<pard-start",
            "tx<nu<__________<D",
            "cw<tb<cell______<nu<true",
            "cw<tb<row_______<nu<true",
            "mi<mk<body-close",
        ])
    }

    #[test]
    fn test_rows_and_cells() {
        let mut pass = Tables::new();
        let out = run_on(&mut pass, &two_by_two());
        assert_eq!(pass.count(), 1);
        assert!(out.starts_with(
            "mi<mk<body-open_\n\
             cw<tb<row-def___<nu<true\n\
             cw<tb<cell-posit<nu<72.00\n\
             cw<tb<cell-posit<nu<144.00\n\
             mi<mk<tabl-start\n\
             mi<tg<open______<table\n\
             mi<tg<open-att__<row<number-of-cells>2<widths>72.00, 72.00\n\
             mi<tg<open-att__<cell<width>72.00\n\
             mi<mk<pard-start\n\
             tx<nu<__________<A\n\
             cw<tb<cell______<nu<true\n\
             mi<mk<close_cell\n\
             mi<tg<close_____<cell\n"
        ));
        assert_eq!(out.matches("mi<tg<open-att__<row").count(), 2);
        assert_eq!(out.matches("mi<tg<close_____<cell").count(), 4);
        assert!(out.ends_with(
            "mi<tg<close_____<row\nmi<mk<table-end_\nmi<tg<close_____<table\nmi<mk<body-close\n"
        ));
    }

    #[test]
    fn test_first_cell_offset_and_borders() {
        let input = stream(&[
            "mi<mk<body-open_",
            "cw<tb<row-def___<nu<true",
            "cw<tb<row-pos-le<nu<-5.40",
            "cw<bd<bor-cel-to<nu<bdr-single",
            "cw<tb<cell-posit<nu<100.00",
            "cw<tb<cell-posit<nu<100.00",
            "cw<pf<par-def___<nu<true",
            "cw<tb<in-table__<nu<true",
            "mi<mk<pard-start",
            "cw<tb<cell______<nu<true",
            "cw<tb<cell______<nu<true",
            "cw<tb<row_______<nu<true",
            "cw<pf<par-def___<nu<true",
            "mi<mk<pard-start",
            "tx<nu<__________<after",
            "mi<mk<body-close",
        ]);
        let out = run_on(&mut Tables::new(), &input);
        assert!(out.contains(
            "mi<tg<open-att__<row<number-of-cells>2<widths>105.40, 0.00<left-row-position>-5.40\n\
             mi<tg<open-att__<cell<width>105.40<border-cell-top-line-style>single\n"
        ));
        // empty second cell still produces an element
        assert!(out.contains("mi<tg<open-att__<cell<width>0.00\nmi<mk<close_cell\n"));
        assert!(out.contains("mi<tg<close_____<table\nmi<mk<pard-start\ntx<nu<__________<after\n"));
    }

    #[test]
    fn test_table_statistics() {
        let tables = run_on(&mut Tables::new(), &two_by_two());
        let out = run_on(&mut TableInfo, &tables);
        assert!(out.contains(
            "mi<tg<open-att__<table<number-of-rows>2<number-of-columns>2<mode-cells-per-row>2<mode-of-widths>72.00<average-cell-width>72.00\n"
        ));
    }

    #[test]
    fn test_mode_prefers_first_on_tie() {
        assert_eq!(mode(["3", "2", "2", "3"].into_iter()), Some("3"));
        assert_eq!(mode(std::iter::empty()), None);
    }
}
