use crate::color::HexColor;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::grid::{self, Row, TableLayout, CAPTION_MARGIN_TOP};
use crate::qr::{self, QUIET_ZONE};
use log::{debug, info, warn};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt, Px, Rgb,
};
use std::fs;
use std::path::Path;

const TITLE: &str = "QR labels";

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;

const CAPTION_FONT_SIZE: f32 = 12.0;
/// Helvetica ascender height per unit of font size.
const HELVETICA_ASCENT: f32 = 0.718;

/// Helvetica advance widths for ASCII 0x20..=0x7e, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

fn mm(pt: f32) -> Mm {
    Pt(pt).into()
}

fn page_height_pt() -> f32 {
    Pt::from(Mm(A4_HEIGHT_MM)).0
}

/// Width of `text` set in Helvetica at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7e => HELVETICA_WIDTHS[(code - 0x20) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Characters WinAnsiEncoding maps into 0x80..=0x9f.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '\u{20ac}', '\u{201a}', '\u{0192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02c6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017d}', '\u{2018}',
    '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02dc}',
    '\u{2122}', '\u{0161}', '\u{203a}', '\u{0153}', '\u{017e}', '\u{0178}',
];

/// Whether the builtin Helvetica font, written as WinAnsiEncoding, can show `c`.
pub fn is_win_ansi(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// Where a table row lands: page index and the y coordinate of its top edge,
/// measured in points from the bottom of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub top: f32,
}

/// Flows `row_count` rows down A4 pages. A row that would cross the bottom
/// edge moves to the next page; every page takes at least one row.
pub fn paginate(row_count: usize, layout: &TableLayout, margin_top: f32) -> Vec<Placement> {
    let start = page_height_pt() - margin_top;
    let pitch = layout.row_pitch();

    let mut placements = Vec::with_capacity(row_count);
    let mut page = 0;
    let mut top = start;
    let mut rows_on_page = 0;

    for _ in 0..row_count {
        if rows_on_page > 0 && top - pitch < 0.0 {
            page += 1;
            top = start;
            rows_on_page = 0;
        }
        placements.push(Placement { page, top });
        top -= pitch;
        rows_on_page += 1;
    }

    placements
}

fn pdf_color(color: HexColor) -> Color {
    let (r, g, b) = color.to_unit_rgb();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn draw_qr(
    layer: &PdfLayerReference,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    config: &Config,
) -> Result<()> {
    let data = qr::generate_qr_data(text, config.ec_level)?;
    // One pixel per module; the image is scaled up without interpolation.
    let px = data.len() + 2 * QUIET_ZONE;
    let rgba = qr::render(&data, px as u32, config.dark, config.light);
    let raster = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let image = Image::from(ImageXObject {
        width: Px(px),
        height: Px(px),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: raster.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // dpi = pixels per inch, one inch being 72 pt
    let dpi = px as f32 / (size / 72.0);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(x)),
            translate_y: Some(mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

fn draw_border(layer: &PdfLayerReference, left: f32, top: f32, width: f32, height: f32) {
    let corners = [
        (left, top),
        (left + width, top),
        (left + width, top - height),
        (left, top - height),
    ];
    layer.add_line(Line {
        points: corners
            .iter()
            .map(|&(x, y)| (Point::new(mm(x), mm(y)), false))
            .collect(),
        is_closed: true,
    });
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    row: &Row,
    top: f32,
    layout: &TableLayout,
    config: &Config,
) -> Result<()> {
    let table_left = config.margin_left as f32;

    for (column, cell) in row.iter().enumerate() {
        let left = table_left + layout.column_offset(column);
        let content_left = left + layout.v_line_width + layout.padding;
        let content_top = top - layout.h_line_width - layout.padding;
        let content_width = layout.widths[column];

        if layout.has_borders() {
            layer.set_outline_color(pdf_color(config.dark));
            layer.set_outline_thickness(layout.h_line_width.max(layout.v_line_width));
            draw_border(
                layer,
                left,
                top,
                layout.column_pitch(column),
                layout.row_pitch(),
            );
        }

        let qr_left = content_left + (content_width - layout.qr_size) / 2.0;
        let qr_bottom = content_top - layout.qr_size;
        draw_qr(
            layer,
            &cell.content,
            qr_left,
            qr_bottom,
            layout.qr_size,
            config,
        )?;

        let caption_width = text_width(&cell.content, CAPTION_FONT_SIZE);
        let caption_left = content_left + (content_width - caption_width) / 2.0;
        let baseline = qr_bottom - CAPTION_MARGIN_TOP - HELVETICA_ASCENT * CAPTION_FONT_SIZE;
        layer.set_fill_color(pdf_color(config.dark));
        layer.use_text(
            cell.content.as_str(),
            CAPTION_FONT_SIZE,
            mm(caption_left),
            mm(baseline),
            font,
        );
    }

    Ok(())
}

/// Lays the rows out as one table over as many A4 pages as it needs and
/// returns the serialised document.
pub fn render(rows: &[Row], layout: &TableLayout, config: &Config) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(TITLE, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Labels");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::DocumentWrite(e.to_string()))?;

    let mut layers = vec![doc.get_page(page).get_layer(layer)];
    let placements = paginate(rows.len(), layout, config.margin_top as f32);

    for (row, placement) in rows.iter().zip(placements) {
        while layers.len() <= placement.page {
            let (page, layer) = doc.add_page(
                Mm(A4_WIDTH_MM),
                Mm(A4_HEIGHT_MM),
                format!("Labels {}", layers.len() + 1),
            );
            layers.push(doc.get_page(page).get_layer(layer));
        }
        draw_row(
            &layers[placement.page],
            &font,
            row,
            placement.top,
            layout,
            config,
        )?;
    }

    debug!("Laid out {} rows on {} pages", rows.len(), layers.len());
    doc.save_to_bytes()
        .map_err(|e| Error::DocumentWrite(e.to_string()))
}

pub fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .map_err(|e| Error::DocumentWrite(format!("{}: {e}", path.display())))?;
    info!("Written: {}", path.display());
    Ok(())
}

/// Builds the label sheet for `labels` and writes it to `path`.
pub fn build(labels: &[String], path: &Path, config: &Config) -> Result<()> {
    let rows = grid::rows(labels, &config.prefix);
    for cell in rows.iter().flatten() {
        if !cell.content.chars().all(is_win_ansi) {
            warn!(
                "Caption {:?} has characters Helvetica cannot show; only its QR code is reliable",
                cell.content
            );
        }
    }
    let layout = TableLayout::new(config);
    let bytes = render(&rows, &layout, config)?;
    write(path, &bytes)
}
