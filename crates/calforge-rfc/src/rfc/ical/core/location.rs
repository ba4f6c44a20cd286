//! Location, geo position and description values.

use serde::{Deserialize, Serialize};

use crate::rfc::ical::build::escape;

/// Geographic position (`GEO`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: f64,
    pub lon: f64,
}

impl Geo {
    /// Renders the `GEO` content line.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("GEO:{};{}\r\n", self.lat, self.lon)
    }
}

/// Structured event location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Radius in meters, used by Apple clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

impl Location {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            address: None,
            radius: None,
            geo: None,
        }
    }

    /// Renders `LOCATION`, the Apple structured location and `GEO`.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let mut text = self.title.clone();
        if let Some(address) = &self.address {
            text.push('\n');
            text.push_str(address);
        }
        let mut out = format!("LOCATION:{}\r\n", escape(&text, false));

        if let (Some(radius), Some(geo)) = (self.radius, self.geo) {
            out.push_str("X-APPLE-STRUCTURED-LOCATION;VALUE=URI;");
            if let Some(address) = &self.address {
                out.push_str(&format!("X-ADDRESS={};", escape(address, false)));
            }
            out.push_str(&format!(
                "X-APPLE-RADIUS={radius};X-TITLE={}:geo:{},{}\r\n",
                escape(&self.title, false),
                geo.lat,
                geo.lon
            ));
        }

        if let Some(geo) = &self.geo {
            out.push_str(&geo.to_line());
        }
        out
    }
}

/// Plain string or structured location input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Text(String),
    Structured(Location),
}

impl From<LocationInput> for Location {
    fn from(input: LocationInput) -> Self {
        match input {
            LocationInput::Text(title) => Self::new(title),
            LocationInput::Structured(location) => location,
        }
    }
}

/// Event description with an optional HTML alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub plain: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Description {
    /// Renders `DESCRIPTION` and `X-ALT-DESC`.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let mut out = format!("DESCRIPTION:{}\r\n", escape(&self.plain, false));
        if let Some(html) = &self.html {
            out.push_str(&format!(
                "X-ALT-DESC;FMTTYPE=text/html:{}\r\n",
                escape(html, false)
            ));
        }
        out
    }
}

/// Plain string or plain + HTML description input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionInput {
    Text(String),
    Rich(Description),
}

impl From<DescriptionInput> for Description {
    fn from(input: DescriptionInput) -> Self {
        match input {
            DescriptionInput::Text(plain) => Self { plain, html: None },
            DescriptionInput::Rich(description) => description,
        }
    }
}

impl From<&str> for Description {
    fn from(plain: &str) -> Self {
        Self {
            plain: plain.to_string(),
            html: None,
        }
    }
}

impl From<&str> for Location {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_location() {
        let location = Location::from("Room 1, 2nd floor");
        assert_eq!(location.to_lines(), "LOCATION:Room 1\\, 2nd floor\r\n");
    }

    #[test]
    fn structured_location_with_geo() {
        let location = Location {
            title: "Apple Store Kurfürstendamm".to_string(),
            address: Some("Kurfürstendamm 26, 10719 Berlin".to_string()),
            radius: Some(141.17),
            geo: Some(Geo {
                lat: 52.503_630,
                lon: 13.328_650,
            }),
        };

        let lines = location.to_lines();
        let lines: Vec<_> = lines.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "LOCATION:Apple Store Kurfürstendamm\\nKurfürstendamm 26\\, 10719 Berlin"
        );
        assert_eq!(
            lines[1],
            "X-APPLE-STRUCTURED-LOCATION;VALUE=URI;X-ADDRESS=Kurfürstendamm 26\\, 10719 Berlin;\
             X-APPLE-RADIUS=141.17;X-TITLE=Apple Store Kurfürstendamm:geo:52.50363,13.32865"
        );
        assert_eq!(lines[2], "GEO:52.50363;13.32865");
    }

    #[test]
    fn radius_without_geo_skips_apple_block() {
        let mut location = Location::new("Somewhere");
        location.radius = Some(10.0);
        assert_eq!(location.to_lines(), "LOCATION:Somewhere\r\n");
    }

    #[test]
    fn description_inputs() {
        let plain: DescriptionInput = serde_json::from_str(r#""a;b""#).unwrap();
        assert_eq!(
            Description::from(plain).to_lines(),
            "DESCRIPTION:a\\;b\r\n"
        );

        let rich: DescriptionInput =
            serde_json::from_str(r#"{"plain":"hi","html":"<p>hi</p>"}"#).unwrap();
        assert_eq!(
            Description::from(rich).to_lines(),
            "DESCRIPTION:hi\r\nX-ALT-DESC;FMTTYPE=text/html:<p>hi</p>\r\n"
        );
    }
}
