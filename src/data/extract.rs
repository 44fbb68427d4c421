use std::ops::Range;

use thiserror::Error;

/// Line that opens the numeric block (compared after trimming).
pub const XYDATA_MARKER: &str = "XYDATA";

/// Header of the trailing metadata section some exports carry.
pub const EXTENDED_INFO_MARKER: &str = "##### Extended Information";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    #[error("not a JASCO spectrum file: no `XYDATA` line")]
    MissingMarker,

    #[error("the XYDATA block is empty")]
    EmptyBlock,

    #[error("line {line}: expected two numbers, got `{content}`")]
    MalformedLine { line: usize, content: String },
}

// ---------------------------------------------------------------------------
// Block detection
// ---------------------------------------------------------------------------

/// Which rule closed the data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// Two lines above `##### Extended Information`.
    ExtendedInfo,
    /// One line above the first blank line.
    BlankLine,
    /// Last line of the file.
    EndOfFile,
}

/// Location of the numeric block inside a file's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Half-open range of 0-based line indices.
    pub lines: Range<usize>,
    pub end: BlockEnd,
}

impl DataBlock {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Locate the XYDATA block.
///
/// The end rules are checked in order: Extended Information marker, then
/// blank line, then end of file. Both searches cover the whole file, so a
/// boundary found before the marker yields an empty block.
pub fn find_block(lines: &[&str]) -> Result<DataBlock, ExtractError> {
    let marker = lines
        .iter()
        .position(|l| l.trim() == XYDATA_MARKER)
        .ok_or(ExtractError::MissingMarker)?;
    let start = marker + 1;

    let (stop, end) = if let Some(i) = lines.iter().position(|l| l.contains(EXTENDED_INFO_MARKER)) {
        (i.saturating_sub(1), BlockEnd::ExtendedInfo)
    } else if let Some(i) = lines.iter().position(|l| l.trim().is_empty()) {
        (i, BlockEnd::BlankLine)
    } else {
        (lines.len(), BlockEnd::EndOfFile)
    };

    Ok(DataBlock {
        lines: start..stop.max(start),
        end,
    })
}

// ---------------------------------------------------------------------------
// Pair parsing
// ---------------------------------------------------------------------------

/// Parse every non-blank line of `block` as a whitespace-separated number pair.
pub fn parse_pairs(lines: &[&str], block: &DataBlock) -> Result<(Vec<f64>, Vec<f64>), ExtractError> {
    let mut x = Vec::with_capacity(block.lines.len());
    let mut y = Vec::with_capacity(block.lines.len());

    for idx in block.lines.clone() {
        let line = lines[idx];
        if line.trim().is_empty() {
            continue;
        }
        let (xi, yi) = parse_pair(line).ok_or_else(|| ExtractError::MalformedLine {
            line: idx + 1,
            content: line.trim().to_string(),
        })?;
        x.push(xi);
        y.push(yi);
    }

    Ok((x, y))
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut tokens = line.split_whitespace();
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x, y))
}

/// Split on `\r\n`, `\n` or a bare `\r`; a trailing terminator adds no line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(i) => {
                lines.push(&rest[..i]);
                let width = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// Extract the X/Y series from the decoded text of one export.
pub fn extract_xy(text: &str) -> Result<(Vec<f64>, Vec<f64>), ExtractError> {
    let lines = split_lines(text);
    let block = find_block(&lines)?;
    log::debug!("XYDATA block {:?} closed by {:?}", block.lines, block.end);
    let (x, y) = parse_pairs(&lines, &block)?;
    if x.is_empty() {
        return Err(ExtractError::EmptyBlock);
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "TITLE\tsample\nDATA TYPE\tINFRARED SPECTRUM\nXUNITS\t1/CM\nYUNITS\t%T\nNPOINTS\t3\n";

    #[test]
    fn ends_at_eof_without_boundaries() {
        let text = format!("{HEADER}XYDATA\n4000\t90.5\n3999\t90.1\n3998\t89.7");
        let lines: Vec<&str> = text.lines().collect();
        let block = find_block(&lines).unwrap();
        assert_eq!(block.end, BlockEnd::EndOfFile);
        assert_eq!(block.lines, 6..9);

        let (x, y) = extract_xy(&text).unwrap();
        assert_eq!(x, vec![4000.0, 3999.0, 3998.0]);
        assert_eq!(y, vec![90.5, 90.1, 89.7]);
    }

    #[test]
    fn ends_above_first_blank_line() {
        let text = format!("{HEADER}XYDATA\n400 0.12\n401 0.13\n\n[Comments]\nfoo bar baz\n");
        let lines: Vec<&str> = text.lines().collect();
        let block = find_block(&lines).unwrap();
        assert_eq!(block.end, BlockEnd::BlankLine);

        let (x, _) = extract_xy(&text).unwrap();
        assert_eq!(x, vec![400.0, 401.0]);
    }

    #[test]
    fn extended_info_wins_over_blank_lines() {
        let text = format!(
            "{HEADER}XYDATA\n400 0.12\n\n401 0.13\n402 0.14\n\n##### Extended Information\n[Comments]\n"
        );
        let lines: Vec<&str> = text.lines().collect();
        let block = find_block(&lines).unwrap();
        assert_eq!(block.end, BlockEnd::ExtendedInfo);

        let (x, y) = extract_xy(&text).unwrap();
        // Blank lines inside the block are skipped.
        assert_eq!(x, vec![400.0, 401.0, 402.0]);
        assert_eq!(y.len(), 3);
    }

    #[test]
    fn extended_info_drops_line_directly_above_separator() {
        let text = format!("{HEADER}XYDATA\n400 0.12\n401 0.13\n-----\n##### Extended Information\n");
        let (x, _) = extract_xy(&text).unwrap();
        assert_eq!(x, vec![400.0, 401.0]);
    }

    #[test]
    fn marker_is_matched_after_trimming() {
        let text = "  XYDATA \r\n1 2\r\n3 4\r\n";
        let (x, y) = extract_xy(text).unwrap();
        assert_eq!(x, vec![1.0, 3.0]);
        assert_eq!(y, vec![2.0, 4.0]);
    }

    #[test]
    fn missing_marker_is_an_error() {
        let err = extract_xy("TITLE\tfoo\n1 2\n").unwrap_err();
        assert_eq!(err, ExtractError::MissingMarker);
    }

    #[test]
    fn malformed_line_reports_file_line_number() {
        let text = "XYDATA\n1 2\n3 abc\n";
        let err = extract_xy(text).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MalformedLine {
                line: 3,
                content: "3 abc".to_string()
            }
        );
    }

    #[test]
    fn wrong_token_count_is_malformed() {
        assert!(matches!(
            extract_xy("XYDATA\n1 2 3\n"),
            Err(ExtractError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            extract_xy("XYDATA\n1\n"),
            Err(ExtractError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn blank_line_before_marker_empties_the_block() {
        let text = "TITLE\n\nXYDATA\n1 2\n";
        let lines: Vec<&str> = text.lines().collect();
        let block = find_block(&lines).unwrap();
        assert_eq!(block.end, BlockEnd::BlankLine);
        assert!(block.is_empty());
        assert_eq!(extract_xy(text).unwrap_err(), ExtractError::EmptyBlock);
    }

    #[test]
    fn row_count_matches_non_blank_block_lines() {
        let text = "XYDATA\n1 1\n\n2 2\n3 3\n\n4 4\n##### Extended Information\n";
        let lines: Vec<&str> = text.lines().collect();
        let block = find_block(&lines).unwrap();
        let non_blank = lines[block.lines.clone()]
            .iter()
            .filter(|l| !l.trim().is_empty())
            .count();
        let (x, _) = parse_pairs(&lines, &block).unwrap();
        assert_eq!(x.len(), non_blank);
        assert_eq!(x, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn line_endings_follow_cr_lf_and_crlf() {
        assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\rb\nc\r"), vec!["a", "b", "c"]);
        assert!(split_lines("").is_empty());

        let (x, y) = extract_xy("XYDATA\r1 2\r3 4\r").unwrap();
        assert_eq!(x, vec![1.0, 3.0]);
        assert_eq!(y, vec![2.0, 4.0]);

        // A bare CR blank line still closes the block.
        let (x, _) = extract_xy("XYDATA\r1 2\r\r[Comments]\r").unwrap();
        assert_eq!(x, vec![1.0]);
    }

    #[test]
    fn non_finite_values_are_malformed() {
        for text in ["XYDATA\nnan inf\n", "XYDATA\n1 2\n3 -inf\n", "XYDATA\nNaN 1\n"] {
            assert!(
                matches!(extract_xy(text), Err(ExtractError::MalformedLine { .. })),
                "{text:?}"
            );
        }
    }

    #[test]
    fn scientific_notation_parses() {
        let (x, y) = extract_xy("XYDATA\n1.5E+03 -2.5e-2\n").unwrap();
        assert_eq!(x, vec![1500.0]);
        assert_eq!(y, vec![-0.025]);
    }
}
