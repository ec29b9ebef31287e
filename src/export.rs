use crate::models::{
    Participant, FIELD_BIDANG, FIELD_LANGUAGE, FIELD_LEVEL, FIELD_NAME, FIELD_NO, FIELD_RUANG,
    FIELD_SCHOOL,
};
use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// CSV column order: the source field keys plus the derived room column.
const CSV_HEADERS: [&str; 7] = [
    FIELD_NO,
    FIELD_NAME,
    FIELD_SCHOOL,
    FIELD_LEVEL,
    FIELD_BIDANG,
    FIELD_LANGUAGE,
    FIELD_RUANG,
];

/// Write the final row list as CSV with every field double-quoted. Returns
/// false without touching the filesystem when the row list is empty.
pub fn write_csv(rows: &[Participant], path: &Path) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        let no = row.no.to_string();
        writer.write_record([
            no.as_str(),
            row.name.as_str(),
            row.school.as_str(),
            row.level.as_str(),
            row.bidang.as_str(),
            row.language.as_str(),
            row.ruang.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(true)
}

// Landscape print format, in millimeters.
const PAGE_WIDTH: f32 = 330.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_BOTTOM: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.0;

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 11.0;
const HEADER_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 8.0;

/// PDF table columns in fixed order: header label, left edge (mm), width (mm).
const PDF_COLUMNS: [(&str, f32, f32); 7] = [
    (FIELD_NO, MARGIN_LEFT, 14.0),
    (FIELD_NAME, 24.0, 70.0),
    (FIELD_SCHOOL, 94.0, 80.0),
    (FIELD_LEVEL, 174.0, 24.0),
    (FIELD_BIDANG, 198.0, 34.0),
    (FIELD_RUANG, 232.0, 44.0),
    (FIELD_LANGUAGE, 276.0, 44.0),
];

/// Centered title built from the active subject/level filters.
pub fn pdf_title(subject: &str, level: &str) -> String {
    let mut parts = vec!["Daftar Peserta"];
    if !subject.is_empty() {
        parts.push(subject);
    }
    if !level.is_empty() {
        parts.push(level);
    }
    parts.join(" ")
}

/// Render the final row list as a landscape table PDF. The title reflects the
/// active subject/level filters; an active room filter becomes a centered
/// subtitle. Empty row lists are a no-op, same as the CSV exporter.
pub fn write_pdf(
    rows: &[Participant],
    subject: &str,
    level: &str,
    room: &str,
    path: &Path,
) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        pdf_title(subject, level),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load PDF font: {}", e))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load PDF font: {}", e))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    // Main title, centered near the top edge.
    let title = pdf_title(subject, level);
    let mut y = PAGE_HEIGHT - 14.0;
    layer.use_text(
        title.clone(),
        TITLE_SIZE,
        Mm(centered_x(&title, TITLE_SIZE)),
        Mm(y),
        &font_bold,
    );
    y -= 7.0;

    if !room.is_empty() {
        layer.use_text(
            room.to_string(),
            SUBTITLE_SIZE,
            Mm(centered_x(room, SUBTITLE_SIZE)),
            Mm(y),
            &font,
        );
        y -= 7.0;
    }

    y -= 4.0;
    draw_header_row(&layer, &font_bold, y);
    y -= ROW_HEIGHT;

    for row in rows {
        if y < MARGIN_BOTTOM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - 14.0;
            draw_header_row(&layer, &font_bold, y);
            y -= ROW_HEIGHT;
        }

        let no = row.no.to_string();
        let cells = [
            no.as_str(),
            row.name.as_str(),
            row.school.as_str(),
            row.level.as_str(),
            row.bidang.as_str(),
            row.ruang.as_str(),
            row.language.as_str(),
        ];
        for ((_, x, width), cell) in PDF_COLUMNS.iter().zip(cells) {
            layer.use_text(fit_cell(cell, *width, BODY_SIZE), BODY_SIZE, Mm(*x), Mm(y), &font);
        }
        y -= ROW_HEIGHT;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create PDF file: {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("Failed to render PDF: {}", e))?;
    Ok(true)
}

fn draw_header_row(layer: &PdfLayerReference, font: &IndirectFontRef, y: f32) {
    for (label, x, width) in PDF_COLUMNS {
        layer.use_text(fit_cell(label, width, HEADER_SIZE), HEADER_SIZE, Mm(x), Mm(y), font);
    }
}

// Built-in fonts expose no glyph metrics, so widths are approximated from an
// average Helvetica advance of half the font size.
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.352_778;
    text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM
}

fn centered_x(text: &str, font_size: f32) -> f32 {
    ((PAGE_WIDTH - text_width_mm(text, font_size)) / 2.0).max(MARGIN_LEFT)
}

fn fit_cell(text: &str, column_width: f32, font_size: f32) -> String {
    let char_width = font_size * 0.5 * 0.352_778;
    let max_chars = ((column_width - 2.0) / char_width).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn participant(no: i64, name: &str, ruang: &str) -> Participant {
        Participant {
            no,
            name: name.to_string(),
            school: "SDS Plus 2 \"AlMuhajirin\"".to_string(),
            level: "Level 1".to_string(),
            bidang: "Matematika".to_string(),
            language: "Indonesia".to_string(),
            ruang: ruang.to_string(),
        }
    }

    #[test]
    fn csv_round_trips_headers_and_cells() {
        let rows = vec![
            participant(1, "Budi, Santoso", "Ruang 1 Mekkah"),
            participant(2, "Sinta Dewi", "Ruang 2 Jeddah"),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peserta_terfilter.csv");

        assert!(write_csv(&rows, &path).unwrap());

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADERS);

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "Budi, Santoso");
        assert_eq!(&records[0][2], "SDS Plus 2 \"AlMuhajirin\"");
        assert_eq!(&records[1][6], "Ruang 2 Jeddah");
    }

    #[test]
    fn csv_quotes_every_field_and_escapes_quotes() {
        let rows = vec![participant(1, "Budi", "")];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        assert!(data_line.starts_with("\"1\",\"Budi\""));
        assert!(data_line.contains("\"\"AlMuhajirin\"\""));
    }

    #[test]
    fn empty_exports_are_no_ops() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("empty.csv");
        let pdf_path = dir.path().join("empty.pdf");

        assert!(!write_csv(&[], &csv_path).unwrap());
        assert!(!csv_path.exists());

        assert!(!write_pdf(&[], "", "", "", &pdf_path).unwrap());
        assert!(!pdf_path.exists());
    }

    #[test]
    fn pdf_title_reflects_active_filters() {
        assert_eq!(pdf_title("", ""), "Daftar Peserta");
        assert_eq!(pdf_title("Sains", ""), "Daftar Peserta Sains");
        assert_eq!(
            pdf_title("Matematika", "Level 2"),
            "Daftar Peserta Matematika Level 2"
        );
    }

    #[test]
    fn pdf_export_writes_a_pdf_file() {
        let rows: Vec<Participant> = (1..=60)
            .map(|no| participant(no, "Peserta Panjang Sekali Namanya", "Ruang 1 Mekkah"))
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peserta_terfilter.pdf");

        assert!(write_pdf(&rows, "Matematika", "Level 1", "Ruang 1 Mekkah", &path).unwrap());

        let mut header = [0u8; 5];
        File::open(&path).unwrap().read_exact(&mut header).unwrap();
        assert_eq!(&header, b"%PDF-");
    }

    #[test]
    fn long_cells_are_truncated_to_the_column_width() {
        let text = "X".repeat(200);
        let fitted = fit_cell(&text, 70.0, BODY_SIZE);
        assert!(fitted.chars().count() < 60);
        assert!(text.starts_with(&fitted));
    }
}
