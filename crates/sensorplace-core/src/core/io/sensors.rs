use crate::core::models::domain::Domain;
use crate::core::models::sensor::SensorSet;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed sensor record: {0}")]
    Record(#[from] csv::Error),
    #[error("Sensor files in '{0}' format cannot be read back")]
    UnreadableFormat(CoordinateFormat),
    #[error("Unknown coordinate format '{0}', expected 'pixel', 'normalized' or 'cell'")]
    UnknownFormat(String),
}

/// Coordinate system used for the two columns of a sensor-location file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateFormat {
    /// `x * (nx - 1)`, `y * (ny - 1)`.
    #[default]
    Pixel,
    /// Raw `[0, 1]` coordinates.
    Normalized,
    /// Integer grid cell containing the sensor. Lossy.
    Cell,
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pixel => "pixel",
            Self::Normalized => "normalized",
            Self::Cell => "cell",
        };
        f.write_str(name)
    }
}

impl FromStr for CoordinateFormat {
    type Err = SensorFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixel" => Ok(Self::Pixel),
            "normalized" => Ok(Self::Normalized),
            "cell" => Ok(Self::Cell),
            _ => Err(SensorFileError::UnknownFormat(s.to_string())),
        }
    }
}

/// Plain-text sensor-location files: one sensor per line, two space-separated columns.
pub struct SensorFile;

impl SensorFile {
    /// Conventional file name for a domain, e.g. `sensors_Nx127_Ny97.txt`.
    pub fn file_name(domain: &Domain) -> String {
        format!("sensors_Nx{}_Ny{}.txt", domain.nx(), domain.ny())
    }

    pub fn write_to(
        sensors: &SensorSet,
        domain: &Domain,
        format: CoordinateFormat,
        writer: impl Write,
    ) -> Result<(), SensorFileError> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(writer);

        for point in sensors.iter() {
            match format {
                CoordinateFormat::Pixel => {
                    let pixel = domain.to_pixel(point);
                    csv_writer.serialize((pixel.x, pixel.y))?;
                }
                CoordinateFormat::Normalized => {
                    csv_writer.serialize((point.x, point.y))?;
                }
                CoordinateFormat::Cell => {
                    csv_writer.serialize(domain.cell_of(point))?;
                }
            }
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Reads a file written in `Pixel` or `Normalized` format back into normalized coordinates.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn read_from(
        reader: impl Read,
        domain: &Domain,
        format: CoordinateFormat,
    ) -> Result<SensorSet, SensorFileError> {
        if format == CoordinateFormat::Cell {
            return Err(SensorFileError::UnreadableFormat(format));
        }

        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();
        for record in csv_reader.deserialize::<(f64, f64)>() {
            let (x, y) = record?;
            let point = match format {
                CoordinateFormat::Pixel => domain.from_pixel(&Point2::new(x, y)),
                _ => Point2::new(x, y),
            };
            points.push(point);
        }
        Ok(SensorSet::new(points))
    }

    pub fn write_to_path(
        sensors: &SensorSet,
        domain: &Domain,
        format: CoordinateFormat,
        path: impl AsRef<Path>,
    ) -> Result<(), SensorFileError> {
        let file = File::create(path)?;
        Self::write_to(sensors, domain, format, BufWriter::new(file))
    }

    pub fn read_from_path(
        path: impl AsRef<Path>,
        domain: &Domain,
        format: CoordinateFormat,
    ) -> Result<SensorSet, SensorFileError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), domain, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TOLERANCE: f64 = 1e-12;

    fn sample() -> SensorSet {
        SensorSet::new(vec![Point2::new(0.0, 1.0), Point2::new(0.5, 0.25)])
    }

    #[test]
    fn file_name_encodes_domain_extents() {
        let domain = Domain::new(127, 97).unwrap();
        assert_eq!(SensorFile::file_name(&domain), "sensors_Nx127_Ny97.txt");
    }

    #[test]
    fn pixel_format_writes_scaled_columns() {
        let domain = Domain::new(11, 5).unwrap();
        let mut buffer = Vec::new();
        SensorFile::write_to(&sample(), &domain, CoordinateFormat::Pixel, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0.0 4.0", "5.0 1.0"]);
    }

    #[test]
    fn cell_format_writes_integer_cells() {
        let domain = Domain::new(10, 4).unwrap();
        let mut buffer = Vec::new();
        SensorFile::write_to(&sample(), &domain, CoordinateFormat::Cell, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["0 3", "5 1"]);
    }

    #[test]
    fn pixel_file_reads_back_into_normalized_coordinates() {
        let domain = Domain::new(11, 5).unwrap();
        let sensors = SensorFile::read_from(
            Cursor::new("# x y\n0.0 4.0\n5.0 1.0\n"),
            &domain,
            CoordinateFormat::Pixel,
        )
        .unwrap();
        assert_eq!(sensors.len(), 2);
        for (read, expected) in sensors.iter().zip(sample().iter()) {
            assert!((read.x - expected.x).abs() < TOLERANCE);
            assert!((read.y - expected.y).abs() < TOLERANCE);
        }
    }

    #[test]
    fn cell_format_cannot_be_read() {
        let domain = Domain::new(10, 4).unwrap();
        let result = SensorFile::read_from(Cursor::new("0 3\n"), &domain, CoordinateFormat::Cell);
        assert!(matches!(result, Err(SensorFileError::UnreadableFormat(_))));
    }

    #[test]
    fn malformed_line_is_reported() {
        let domain = Domain::new(10, 4).unwrap();
        let result = SensorFile::read_from(
            Cursor::new("0.1 0.2\nnot-a-number 0.3\n"),
            &domain,
            CoordinateFormat::Normalized,
        );
        assert!(matches!(result, Err(SensorFileError::Record(_))));
    }

    #[test]
    fn files_on_disk_survive_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let domain = Domain::new(64, 32).unwrap();
        let path = dir.path().join(SensorFile::file_name(&domain));

        SensorFile::write_to_path(&sample(), &domain, CoordinateFormat::Normalized, &path).unwrap();
        let read = SensorFile::read_from_path(&path, &domain, CoordinateFormat::Normalized).unwrap();
        assert_eq!(read, sample());
    }

    #[test]
    fn coordinate_format_parses_case_insensitively() {
        assert_eq!("Pixel".parse::<CoordinateFormat>().unwrap(), CoordinateFormat::Pixel);
        assert_eq!(" cell ".parse::<CoordinateFormat>().unwrap(), CoordinateFormat::Cell);
        assert!("grid".parse::<CoordinateFormat>().is_err());
        assert_eq!(CoordinateFormat::Normalized.to_string(), "normalized");
    }
}
