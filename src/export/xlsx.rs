use std::path::Path;

use rust_xlsxwriter::{
    Chart, ChartAxisCrossing, ChartAxisLabelPosition, ChartAxisTickType, ChartFont, ChartFormat,
    ChartLayout, ChartLine, ChartMarker, ChartType, Color, ColNum, Format, FormatBorder, RowNum,
    Workbook, XlsxError,
};
use thiserror::Error;

use crate::data::model::Spectrum;
use crate::profile::{ChartProfile, YRange};

// ---------------------------------------------------------------------------
// Sheet layout
// ---------------------------------------------------------------------------

pub const SHEET_NAME: &str = "Data";

/// Column of the first file's X values (`L`).
pub const FIRST_COLUMN: ColNum = 11;

/// Columns used per file: X, Y, display Y and one spacer.
pub const BLOCK_WIDTH: ColNum = 4;

/// First data row (0-based); rows above hold the name and headers.
pub const FIRST_DATA_ROW: RowNum = 2;

/// Top-left cell of the chart (`A4`).
pub const CHART_ANCHOR: (RowNum, ColNum) = (3, 0);

const SERIES_COLOR: &str = "#008EC0";
const LINE_WIDTH: f64 = 1.5;
const CELL_FONT: &str = "Times New Roman";
const CELL_FONT_SIZE: u32 = 11;
const ROW_HEIGHT: u32 = 20;
const AXIS_FONT: &str = "Arial";
const AXIS_FONT_SIZE: u32 = 16;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no spectra to export")]
    NoSpectra,

    #[error("too many files for one worksheet ({0})")]
    TooManyFiles(usize),

    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

/// Excel column letters for a 0-based index: 0 → `A`, 25 → `Z`, 27 → `AB`.
pub fn column_label(index: u32) -> String {
    let mut n = index as i64;
    let mut label = Vec::new();
    while n >= 0 {
        label.push(b'A' + (n % 26) as u8);
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// First column of file `index`'s block.
pub fn block_column(index: usize) -> Result<ColNum, ExportError> {
    u16::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(BLOCK_WIDTH))
        .and_then(|off| off.checked_add(FIRST_COLUMN))
        .filter(|col| u32::from(*col) + 2 < 16_384)
        .ok_or(ExportError::TooManyFiles(index + 1))
}

/// Display formula for the point on 0-based `row` of the block at `col`:
/// `Y * scale + offset`, with scale and offset in rows 1 and 2.
pub fn display_formula(col: ColNum, row: RowNum) -> String {
    let y = column_label(u32::from(col) + 1);
    let calc = column_label(u32::from(col) + 2);
    format!("={y}{}*${calc}$1+${calc}$2", row + 1)
}

// ---------------------------------------------------------------------------
// Workbook construction
// ---------------------------------------------------------------------------

/// Build the `Data` sheet for `spectra` with the chart styled by `profile`.
pub fn build_workbook(spectra: &[Spectrum], profile: &ChartProfile) -> Result<Workbook, ExportError> {
    if spectra.is_empty() {
        return Err(ExportError::NoSpectra);
    }

    let cell_format = Format::new()
        .set_font_name(CELL_FONT)
        .set_font_size(CELL_FONT_SIZE);
    let border_format = cell_format.clone().set_border(FormatBorder::Thin);
    let name_format = cell_format.clone().set_font_color(Color::Blue);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let longest = spectra.iter().map(Spectrum::len).max().unwrap_or(0) as RowNum;
    for row in 0..longest + 3 {
        worksheet.set_row_height(row, ROW_HEIGHT)?;
        worksheet.set_row_format(row, &cell_format)?;
    }

    let mut chart = Chart::new(ChartType::ScatterSmooth);
    let count = spectra.len();

    for (k, sp) in spectra.iter().enumerate() {
        let col = block_column(k)?;
        let offset = profile.overlay_offset(k, count);

        worksheet.write_string_with_format(0, col, &sp.name, &name_format)?;
        worksheet.write_string_with_format(1, col, &profile.x_header, &cell_format)?;
        worksheet.write_string_with_format(1, col + 1, &profile.y_header, &cell_format)?;
        worksheet.write_number_with_format(0, col + 2, 1.0, &border_format)?;
        worksheet.write_number_with_format(1, col + 2, offset, &border_format)?;

        for (i, (x, y)) in sp.points().enumerate() {
            let row = FIRST_DATA_ROW + i as RowNum;
            worksheet.write_number_with_format(row, col, x, &cell_format)?;
            worksheet.write_number_with_format(row, col + 1, y, &cell_format)?;
            worksheet.write_formula_with_format(
                row,
                col + 2,
                display_formula(col, row).as_str(),
                &cell_format,
            )?;
        }

        let last_row = FIRST_DATA_ROW + (sp.len() as RowNum).saturating_sub(1);
        chart
            .add_series()
            .set_categories((SHEET_NAME, FIRST_DATA_ROW, col, last_row, col))
            .set_values((SHEET_NAME, FIRST_DATA_ROW, col + 2, last_row, col + 2))
            .set_name(sp.stem())
            .set_marker(ChartMarker::new().set_none())
            .set_format(
                ChartFormat::new().set_line(
                    ChartLine::new()
                        .set_color(SERIES_COLOR)
                        .set_width(LINE_WIDTH),
                ),
            );

        log::debug!("{}: {} rows at column {}", sp.name, sp.len(), column_label(col.into()));
    }

    style_chart(&mut chart, spectra, profile);
    worksheet.insert_chart(CHART_ANCHOR.0, CHART_ANCHOR.1, &chart)?;

    Ok(workbook)
}

fn style_chart(chart: &mut Chart, spectra: &[Spectrum], profile: &ChartProfile) {
    let (width, height) = profile.chart_size(spectra.len());
    chart.set_width(width).set_height(height);

    chart
        .chart_area()
        .set_format(ChartFormat::new().set_no_border().set_no_fill());
    chart.plot_area().set_format(
        ChartFormat::new()
            .set_border(ChartLine::new().set_color(Color::Black).set_width(LINE_WIDTH))
            .set_no_fill(),
    );
    if let Some(layout) = &profile.plot_area_layout {
        chart.plot_area().set_layout(
            &ChartLayout::new()
                .set_offset(layout.x, layout.y)
                .set_dimensions(layout.width, layout.height),
        );
    }
    chart.legend().set_hidden();
    chart.title().set_hidden();

    let mut axis_line = ChartFormat::new()
        .set_line(ChartLine::new().set_color(Color::Black).set_width(LINE_WIDTH))
        .clone();
    let num_font = ChartFont::new()
        .set_name(AXIS_FONT)
        .set_size(AXIS_FONT_SIZE)
        .set_color(Color::Black)
        .clone();
    let name_font = num_font.clone().unset_bold().clone();

    let (x_min, x_max) = profile.x_range(spectra);
    let x_axis = chart.x_axis();
    x_axis
        .set_name(profile.x_axis_name.as_str())
        .set_name_font(&name_font)
        .set_font(&num_font)
        .set_format(&mut axis_line)
        .set_min(x_min)
        .set_max(x_max)
        .set_major_unit(profile.x_major_unit)
        .set_major_tick_type(ChartAxisTickType::Inside);
    if profile.x_reversed {
        x_axis.set_reverse().set_crossing(ChartAxisCrossing::Max);
    }

    let bounds = profile.y_range(spectra);
    let y_axis = chart.y_axis();
    y_axis
        .set_name(profile.y_axis_name.as_str())
        .set_name_font(&name_font)
        .set_font(&num_font)
        .set_format(&mut axis_line)
        .set_major_gridlines(false);
    if let Some(min) = bounds.min {
        y_axis.set_min(min);
    }
    if let Some(max) = bounds.max {
        y_axis.set_max(max);
    }
    match profile.y_range {
        // Offsets make the tick values meaningless for stacked traces.
        YRange::Stacked { .. } => {
            y_axis
                .set_major_tick_type(ChartAxisTickType::None)
                .set_minor_tick_type(ChartAxisTickType::None)
                .set_label_position(ChartAxisLabelPosition::None)
                .set_crossing(ChartAxisCrossing::AxisValue(-1000.0));
        }
        YRange::FromZero => {
            y_axis.set_major_tick_type(ChartAxisTickType::Inside);
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Render the workbook into memory.
pub fn write_to_buffer(spectra: &[Spectrum], profile: &ChartProfile) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(spectra, profile)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to `path`.
pub fn save(spectra: &[Spectrum], profile: &ChartProfile, path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(spectra, profile)?;
    workbook.save(path)?;
    log::info!("Wrote {} spectra to {}", spectra.len(), path.display());
    Ok(())
}
