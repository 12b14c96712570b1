//! Geometry data files
//!
//! Plain text, one illumination record per line, columns separated by
//! whitespace. Two record layouts are understood:
//!
//! ```text
//! # day  sza
//! 152    60.0
//!
//! # day  sec    lat    lon    sza
//! 152    25311  28.31  -16.5  80.08686
//! ```
//!
//! Angles are in degrees. Every record of a file must use the same layout.
//! Blank lines and lines starting with `#` are skipped.

use super::{AngleMode, Geometry};
use crate::errors::{SoloError, SoloResult};
use crate::values::{FieldValue, FloatValue};
use log::debug;
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `day sza`
    Short,
    /// `day sec lat lon sza`
    Long,
}

impl Layout {
    fn from_columns(columns: usize) -> Option<Self> {
        match columns {
            2 => Some(Layout::Short),
            5 => Some(Layout::Long),
            _ => None,
        }
    }

    fn columns(self) -> usize {
        match self {
            Layout::Short => 2,
            Layout::Long => 5,
        }
    }
}

fn parse_number(token: &str, line: usize) -> SoloResult<FloatValue> {
    match token.parse::<FloatValue>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SoloError::parse(
            line,
            format!("expected a finite number, found '{token}'"),
        )),
    }
}

fn parse_geometry(text: &str) -> SoloResult<Geometry> {
    let mut layout: Option<(Layout, usize)> = None;
    let mut records: Vec<Vec<FloatValue>> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let record = content
            .split_whitespace()
            .map(|token| parse_number(token, line_number))
            .collect::<SoloResult<Vec<_>>>()?;

        let record_layout = Layout::from_columns(record.len()).ok_or_else(|| {
            SoloError::parse(
                line_number,
                format!("expected 2 or 5 columns, found {}", record.len()),
            )
        })?;

        match layout {
            None => layout = Some((record_layout, line_number)),
            Some((expected, first_line)) if expected != record_layout => {
                return Err(SoloError::parse(
                    line_number,
                    format!(
                        "expected {} columns as on line {first_line}, found {}",
                        expected.columns(),
                        record.len()
                    ),
                ))
            }
            Some(_) => {}
        }

        records.push(record);
    }

    let Some((layout, _)) = layout else {
        return Err(SoloError::parse(
            text.lines().count().max(1),
            "no geometry records found",
        ));
    };

    // One record gives scalar fields, more give arrays in file order
    let column = |index: usize| -> FieldValue {
        let values: Vec<FloatValue> = records.iter().map(|record| record[index]).collect();
        match values.as_slice() {
            [value] => FieldValue::Scalar(*value),
            _ => FieldValue::from(values),
        }
    };

    match layout {
        Layout::Short => Geometry::from_zenith(column(0), column(1), AngleMode::Deg),
        Layout::Long => Geometry::with_location(
            column(0),
            column(1),
            column(2),
            column(3),
            column(4),
            AngleMode::Deg,
        ),
    }
}

impl FromStr for Geometry {
    type Err = SoloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_geometry(s)
    }
}

impl Geometry {
    /// Load a geometry from a data file
    ///
    /// A file holding a single record gives scalar fields, a file holding `n`
    /// records gives fields of shape `(n,)`. The result is the same as calling
    /// [`Geometry::new`] on the parsed columns with [`AngleMode::Deg`].
    ///
    /// # Errors
    ///
    /// * [`SoloError::Io`] if the file cannot be read
    /// * [`SoloError::Parse`] with the offending line for malformed records
    /// * [`SoloError::Domain`] for values outside of their physical range
    pub fn from_file(path: impl AsRef<Path>) -> SoloResult<Self> {
        let path = path.as_ref();
        let geometry = parse_geometry(&fs::read_to_string(path)?)?;
        debug!(
            "Loaded {} geometry record(s) from {}",
            geometry.len(),
            path.display()
        );
        Ok(geometry)
    }

    /// Load a geometry from any reader, see [`Geometry::from_file`]
    pub fn from_reader<R: Read>(mut reader: R) -> SoloResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        parse_geometry(&text)
    }

    /// Write the geometry in the data file format, angles in degrees
    ///
    /// Reading the output back gives a geometry close to `self`, except that a
    /// geometry of shape `(1,)` is written as a single record and so reads
    /// back with scalar fields.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> SoloResult<()> {
        let day = self.day.iter();
        let sza = self.sza.iter().map(FloatValue::to_degrees);

        match &self.location {
            Some(location) => {
                let rows = day
                    .zip(location.sec.iter())
                    .zip(location.lat.iter().map(FloatValue::to_degrees))
                    .zip(location.lon.iter().map(FloatValue::to_degrees))
                    .zip(sza);
                for ((((day, sec), lat), lon), sza) in rows {
                    writeln!(writer, "{day} {sec} {lat} {lon} {sza}")?;
                }
            }
            None => {
                for (day, sza) in day.zip(sza) {
                    writeln!(writer, "{day} {sza}")?;
                }
            }
        }
        Ok(())
    }

    /// Write the geometry to a data file, replacing any existing file
    ///
    /// See [`Geometry::write_to`] for how the written file reads back.
    pub fn save(&self, path: impl AsRef<Path>) -> SoloResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(fs::File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(
            "Wrote {} geometry record(s) to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_short_records() {
        let geo: Geometry = "152 60\n152 50.4\n".parse().unwrap();
        let expected =
            Geometry::from_zenith(vec![152.0, 152.0], vec![60.0, 50.4], AngleMode::Deg).unwrap();

        assert!(geo.is_close(&expected));
        assert!(geo.sec().is_none());
    }

    #[test]
    fn single_record_gives_scalars() {
        let geo: Geometry = "152 25311 28.31 -16.5 80.08686".parse().unwrap();

        assert!(geo.is_scalar());
        assert_eq!(geo.sec(), Some(&FieldValue::Scalar(25311.0)));
        assert_relative_eq!(
            geo.lat().unwrap().as_scalar().unwrap(),
            0.49410271,
            max_relative = 1e-7
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# day sza\n\n152 60\n   \n  # trailing comment\n153 75\n";
        let geo: Geometry = text.parse().unwrap();
        assert_eq!(geo.day(), &FieldValue::from(vec![152.0, 153.0]));
    }

    #[test]
    fn reports_line_of_non_numeric_field() {
        let err = "152 60\n152 abc\n".parse::<Geometry>().unwrap_err();
        match err {
            SoloError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_line_of_wrong_column_count() {
        let err = "152 60 1\n".parse::<Geometry>().unwrap_err();
        assert!(matches!(err, SoloError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_mixed_layouts() {
        let err = "152 60\n152 25311 28.31 -16.5 80.0\n"
            .parse::<Geometry>()
            .unwrap_err();
        assert!(matches!(err, SoloError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_non_finite_fields() {
        let err = "152 nan\n".parse::<Geometry>().unwrap_err();
        assert!(matches!(err, SoloError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = "# only a comment\n".parse::<Geometry>().unwrap_err();
        assert!(matches!(err, SoloError::Parse { .. }));
    }

    #[test]
    fn out_of_range_values_are_domain_errors() {
        let err = "152 120 28.31 -16.5 80.0\n152 25311 128.31 -16.5 80.0\n"
            .parse::<Geometry>()
            .unwrap_err();
        assert!(matches!(err, SoloError::Domain(_)));
    }

    #[test]
    fn from_reader_matches_from_str() {
        let text = "152 43510 28.31 -16.5 14.59047\n";
        let from_reader = Geometry::from_reader(text.as_bytes()).unwrap();
        let from_str: Geometry = text.parse().unwrap();
        assert_eq!(from_reader, from_str);
    }

    #[test]
    fn write_then_read() {
        let geo = Geometry::with_location(
            vec![152.0, 180.0, 235.0],
            vec![25311.0, 5678.0, 47162.0],
            vec![0.49410271, 0.83950337, 0.00872665],
            vec![-0.28797933, 1.31772359, 0.6981317],
            vec![1.39777933, 1.17809272, 0.98533964],
            AngleMode::Rad,
        )
        .unwrap();

        let mut buffer = Vec::new();
        geo.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 3);

        let reread: Geometry = text.parse().unwrap();
        assert!(reread.is_close(&geo));
    }

    #[test]
    fn single_element_arrays_read_back_as_scalars() {
        let geo = Geometry::from_zenith(vec![152.0], vec![60.0], AngleMode::Deg).unwrap();
        assert_eq!(geo.shape(), &[1]);

        let mut buffer = Vec::new();
        geo.write_to(&mut buffer).unwrap();
        let reread: Geometry = String::from_utf8(buffer).unwrap().parse().unwrap();

        assert!(reread.is_scalar());
        assert!(!reread.is_close(&geo));
        let expected = Geometry::from_zenith(152.0, 60.0, AngleMode::Deg).unwrap();
        assert!(reread.is_close(&expected));
    }
}
