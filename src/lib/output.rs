use super::geojson::FeatureCollection;
use super::{Error, Result};
use serde_json::{to_string, to_writer, to_writer_pretty};
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    GeoJson,
    PrettyGeoJson,
    /// One feature per line.
    JsonLines,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "geojson" => Ok(Format::GeoJson),
            "pretty" => Ok(Format::PrettyGeoJson),
            "lines" => Ok(Format::JsonLines),
            _ => Err(Error::InvalidInput(format!("unknown format {}", s))),
        }
    }
}

pub trait Output {
    fn write_geojson(&self, writer: &mut dyn Write, pretty: bool) -> Result<()>;
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<()>;

    fn write_format(&self, writer: &mut dyn Write, format: Format) -> Result<()> {
        match format {
            Format::GeoJson => self.write_geojson(writer, false),
            Format::PrettyGeoJson => self.write_geojson(writer, true),
            Format::JsonLines => self.write_json_lines(writer),
        }
    }
}

impl Output for FeatureCollection {
    fn write_geojson(&self, writer: &mut dyn Write, pretty: bool) -> Result<()> {
        if pretty {
            to_writer_pretty(&mut *writer, self)?;
        } else {
            to_writer(&mut *writer, self)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<()> {
        for feature in self.features.iter() {
            let json = to_string(feature)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::{Feature, Geometry};
    use std::io::Cursor;

    fn collection() -> FeatureCollection {
        let line = |x: f64| Geometry::LineString {
            coordinates: vec![(x, 0.), (x, 1.)],
        };
        FeatureCollection::new(vec![
            Feature::new(None, Some(line(0.).into())),
            Feature::new(None, Some(line(1.).into())),
        ])
    }

    fn written(format: Format) -> String {
        let mut cursor = Cursor::new(Vec::new());
        collection().write_format(&mut cursor, format).unwrap();
        String::from_utf8(cursor.into_inner()).unwrap()
    }

    #[test]
    fn geojson_parses_back() {
        for format in &[Format::GeoJson, Format::PrettyGeoJson] {
            let string = written(*format);
            let parsed: FeatureCollection = string.parse().unwrap();
            assert_eq!(parsed, collection());
        }
    }

    #[test]
    fn compact_geojson_is_a_single_line() {
        let string = written(Format::GeoJson);
        assert_eq!(string.trim().lines().count(), 1);
        assert!(written(Format::PrettyGeoJson).lines().count() > 1);
    }

    #[test]
    fn json_lines_has_a_feature_per_line() {
        let string = written(Format::JsonLines);
        let lines: Vec<&str> = string.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.starts_with('{'));
            assert!(line.contains(r#""type":"Feature""#));
        }
    }

    #[test]
    fn parse_format() {
        assert_eq!("lines".parse::<Format>().unwrap(), Format::JsonLines);
        assert!("xml".parse::<Format>().is_err());
    }
}
