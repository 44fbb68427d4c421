use std::io::{Cursor, Read};

use spectra_formatter::export;
use spectra_formatter::profile::{ChartProfile, PlotAreaLayout};
use spectra_formatter::Spectrum;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open xlsx zip");
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {name}"))
        .read_to_string(&mut xml)
        .expect("read part");
    xml
}

/// The `<c r="...">...</c>` element for one cell reference.
fn cell<'a>(sheet: &'a str, reference: &str) -> &'a str {
    let start = sheet
        .find(&format!("<c r=\"{reference}\""))
        .unwrap_or_else(|| panic!("no cell {reference}"));
    let len = sheet[start..].find("</c>").expect("unterminated cell");
    &sheet[start..start + len]
}

fn pair() -> Vec<Spectrum> {
    vec![
        Spectrum::new("a.txt", vec![4000.0, 3998.0, 3996.0], vec![55.0, 60.0, 65.0]),
        Spectrum::new("b.txt", vec![4000.0, 3998.0, 3996.0], vec![70.0, 75.0, 80.0]),
    ]
}

#[test]
fn ir_sheet_cells_match_block_layout() {
    let bytes = export::write_to_buffer(&pair(), &ChartProfile::ir()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    let strings = read_part(&bytes, "xl/sharedStrings.xml");

    assert!(strings.contains("<t>a.txt</t>"));
    assert!(strings.contains("<t>b.txt</t>"));

    // Scale and offset of the first block (L:N) and the second (P:R).
    assert!(cell(&sheet, "N1").contains("<v>1</v>"));
    assert!(cell(&sheet, "N2").contains("<v>40</v>"));
    assert!(cell(&sheet, "R1").contains("<v>1</v>"));
    assert!(cell(&sheet, "R2").contains("<v>0</v>"));

    assert!(cell(&sheet, "L3").contains("<v>4000</v>"));
    assert!(cell(&sheet, "M5").contains("<v>65</v>"));
    assert!(cell(&sheet, "N3").contains("<f>M3*$N$1+$N$2</f>"));
    assert!(cell(&sheet, "R5").contains("<f>Q5*$R$1+$R$2</f>"));
}

#[test]
fn ir_chart_is_reversed_and_stacked() {
    let bytes = export::write_to_buffer(&pair(), &ChartProfile::ir()).unwrap();
    let chart = read_part(&bytes, "xl/charts/chart1.xml");

    assert!(chart.contains("<c:scatterStyle val=\"smoothMarker\"/>"));
    for range in ["Data!$L$3:$L$5", "Data!$N$3:$N$5", "Data!$P$3:$P$5", "Data!$R$3:$R$5"] {
        assert!(chart.contains(range), "series range {range} missing");
    }
    assert!(chart.contains("<c:orientation val=\"maxMin\"/>"));
    assert!(chart.contains("<c:crosses val=\"max\"/>"));
    assert!(chart.contains("<c:crossesAt val=\"-1000\"/>"));
    assert!(chart.contains("<c:tickLblPos val=\"none\"/>"));
    // Floor from min Y 55, headroom 110 above one overlay step.
    assert!(chart.contains("<c:min val=\"40\"/>"));
    assert!(chart.contains("<c:max val=\"150\"/>"));
    assert!(!chart.contains("<c:manualLayout>"));
}

#[test]
fn uv_sheet_has_no_offsets_and_default_crossing() {
    let bytes = export::write_to_buffer(&pair(), &ChartProfile::uv_vis()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    let chart = read_part(&bytes, "xl/charts/chart1.xml");

    assert!(cell(&sheet, "N2").contains("<v>0</v>"));
    assert!(cell(&sheet, "R2").contains("<v>0</v>"));
    assert!(!chart.contains("<c:crossesAt"));
    assert!(!chart.contains("<c:orientation val=\"maxMin\"/>"));
    assert!(chart.contains("<c:min val=\"0\"/>"));
}

#[test]
fn plot_area_layout_reaches_chart() {
    let mut profile = ChartProfile::ir();
    profile.plot_area_layout = Some(PlotAreaLayout {
        x: 0.1,
        y: 0.05,
        width: 0.8,
        height: 0.8,
    });
    let bytes = export::write_to_buffer(&pair(), &profile).unwrap();
    let chart = read_part(&bytes, "xl/charts/chart1.xml");

    assert!(chart.contains("<c:manualLayout>"));
    assert!(chart.contains("<c:x val=\"0.1\"/>"));
    assert!(chart.contains("<c:w val=\"0.8\"/>"));
}
