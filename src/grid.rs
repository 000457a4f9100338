use crate::config::Config;

/// Labels per table row.
pub const COLUMNS: usize = 5;
/// Inner padding applied to every side of every cell, in points.
pub const CELL_PADDING: f32 = 15.0;
/// Gap between the QR graphic and its caption, in points.
pub const CAPTION_MARGIN_TOP: f32 = 10.0;

/// One populated table cell: the text encoded in its QR code and printed
/// beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub content: String,
}

/// A table row holding between one and [`COLUMNS`] cells. Rows are never
/// padded with placeholder cells.
pub type Row = Vec<Cell>;

/// Partitions labels into rows of [`COLUMNS`] cells, row-major, preserving
/// label order.
pub fn rows(labels: &[String], prefix: &str) -> Vec<Row> {
    labels
        .chunks(COLUMNS)
        .map(|chunk| {
            chunk
                .iter()
                .map(|label| Cell {
                    content: format!("{prefix}{label}"),
                })
                .collect()
        })
        .collect()
}

/// Geometry handed to the PDF renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    pub widths: [f32; COLUMNS],
    pub height: f32,
    pub padding: f32,
    pub h_line_width: f32,
    pub v_line_width: f32,
    pub qr_size: f32,
}

impl TableLayout {
    pub fn new(config: &Config) -> Self {
        let line_width = if config.label_border { 1.0 } else { 0.0 };
        Self {
            widths: [config.label_width as f32; COLUMNS],
            height: config.label_height as f32,
            padding: CELL_PADDING,
            h_line_width: line_width,
            v_line_width: line_width,
            qr_size: config.width as f32,
        }
    }

    /// Horizontal distance from a column's left edge to the next one.
    pub fn column_pitch(&self, column: usize) -> f32 {
        self.widths[column] + 2.0 * self.padding + self.v_line_width
    }

    /// Offset of a column's left edge from the table's left edge.
    pub fn column_offset(&self, column: usize) -> f32 {
        (0..column).map(|c| self.column_pitch(c)).sum()
    }

    pub fn row_pitch(&self) -> f32 {
        self.height + 2.0 * self.padding + self.h_line_width
    }

    pub fn has_borders(&self) -> bool {
        self.h_line_width > 0.0 || self.v_line_width > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::tests::config;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("L{i}")).collect()
    }

    #[test]
    fn seven_labels_make_two_rows() {
        let rows = rows(&labels(7), "");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 5);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][1].content, "L7");
    }

    #[test]
    fn row_count_is_ceiling_of_n_over_five() {
        for n in 0..=23 {
            let rows = rows(&labels(n), "");
            assert_eq!(rows.len(), n.div_ceil(COLUMNS));
            assert!(rows.iter().all(|r| !r.is_empty() && r.len() <= COLUMNS));
            assert_eq!(rows.iter().map(Vec::len).sum::<usize>(), n);
        }
    }

    #[test]
    fn cells_carry_prefixed_text_in_order() {
        let rows = rows(&["A".into(), "B".into(), "C".into()], "X-");
        let contents: Vec<_> = rows[0].iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["X-A", "X-B", "X-C"]);
    }

    #[test]
    fn border_flag_controls_line_width() {
        let plain = TableLayout::new(&config(&["--pdf", "x.pdf"]));
        assert_eq!(plain.h_line_width, 0.0);
        assert_eq!(plain.v_line_width, 0.0);
        assert!(!plain.has_borders());

        let bordered = TableLayout::new(&config(&["--pdf", "x.pdf", "--labelborder"]));
        assert_eq!(bordered.h_line_width, 1.0);
        assert_eq!(bordered.v_line_width, 1.0);
        assert!(bordered.has_borders());
    }

    #[test]
    fn pitches_include_padding() {
        let layout = TableLayout::new(&config(&["--pdf", "x.pdf"]));
        assert_eq!(layout.widths, [86.0; COLUMNS]);
        assert_eq!(layout.qr_size, 70.0);
        assert_eq!(layout.column_pitch(0), 116.0);
        assert_eq!(layout.column_offset(3), 348.0);
        assert_eq!(layout.row_pitch(), 118.0);
    }
}
