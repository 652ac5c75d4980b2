//! # HELD Documents
//!
//! Builds `locationRequest` documents and reads `locationResponse` / `error`
//! documents (RFC 5985). Only the parts the client renders are extracted:
//! location URIs with their expiry, points and circles in WGS84, and error
//! code and message.

use super::held::HeldError;
use crate::repl::models::{
    ErrorRecord, Location, LocationReference, LookupRequest, LookupResult,
};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const HELD_NAMESPACE: &str = "urn:ietf:params:xml:ns:geopriv:held";
pub const HELD_ID_NAMESPACE: &str = "urn:ietf:params:xml:ns:geopriv:held:id";

/// Error code servers use when they cannot determine a location
pub const LOCATION_UNKNOWN: &str = "locationUnknown";

/// Serialize a lookup request. An empty type list leaves out the
/// `locationType` element so the server applies its default.
pub fn encode_request(request: &LookupRequest) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<locationRequest xmlns=\"{HELD_NAMESPACE}\">\n"));

    if !request.location_types().is_empty() {
        let types: Vec<&str> = request
            .location_types()
            .iter()
            .map(|t| t.held_name())
            .collect();
        xml.push_str(&format!(
            "  <locationType exact=\"{}\">{}</locationType>\n",
            request.exact(),
            types.join(" ")
        ));
    }

    xml.push_str(&format!("  <device xmlns=\"{HELD_ID_NAMESPACE}\">\n"));
    xml.push_str(&format!("    <uri>{}</uri>\n", escape(request.identifier())));
    xml.push_str("  </device>\n");
    xml.push_str("</locationRequest>\n");
    xml
}

/// Parse a HELD response body into a lookup result
pub fn parse_response(xml: &str) -> Result<LookupResult, HeldError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut root: Option<String> = None;
    let mut document = ResponseDocument::default();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = local_name(&element);
                root.get_or_insert_with(|| name.clone());
                document.open(&name, &element)?;
                path.push(name);
            }
            Event::Empty(element) => {
                let name = local_name(&element);
                root.get_or_insert_with(|| name.clone());
                document.open(&name, &element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                document.text(&path, &text)?;
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data)
                    .map_err(|_| HeldError::Malformed("CDATA is not valid UTF-8".to_string()))?;
                document.text(&path, text)?;
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let root = root.ok_or_else(|| HeldError::Malformed("empty document".to_string()))?;
    document.into_result(&root)
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, HeldError> {
    let attr = element
        .try_get_attribute(name)
        .map_err(quick_xml::Error::from)?;
    match attr {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Values collected while walking the document
#[derive(Debug, Default)]
struct ResponseDocument {
    expires: Option<DateTime<Utc>>,
    references: Vec<LocationReference>,
    locations: Vec<Location>,
    error_code: Option<String>,
    error_message: Option<String>,
}

impl ResponseDocument {
    fn open(&mut self, name: &str, element: &BytesStart<'_>) -> Result<(), HeldError> {
        match name {
            "locationUriSet" => {
                let expires = attribute(element, "expires")?
                    .ok_or(HeldError::Missing("locationUriSet@expires"))?;
                self.expires = Some(parse_timestamp(&expires)?);
            }
            "error" => {
                self.error_code = attribute(element, "code")?;
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, path: &[String], text: &str) -> Result<(), HeldError> {
        let Some(current) = path.last() else {
            return Ok(());
        };
        let parent = path
            .len()
            .checked_sub(2)
            .map(|i| path[i].as_str())
            .unwrap_or("");

        match (parent, current.as_str()) {
            ("locationUriSet", "locationURI") => {
                let expires = self
                    .expires
                    .ok_or(HeldError::Missing("locationUriSet@expires"))?;
                self.references
                    .push(LocationReference::new(text.trim(), expires));
            }
            ("Point", "pos") | ("Circle", "pos") => {
                self.locations.push(parse_position(text)?);
            }
            ("Circle", "radius") => {
                let radius = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| HeldError::Malformed(format!("invalid radius '{text}'")))?;
                if let Some(location) = self.locations.last_mut() {
                    location.radius = radius;
                }
            }
            ("error", "message") => {
                self.error_message = Some(text.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn into_result(self, root: &str) -> Result<LookupResult, HeldError> {
        match root {
            "locationResponse" => {
                if self.locations.is_empty() && self.references.is_empty() {
                    Ok(LookupResult::NotFound(ErrorRecord::new(
                        LOCATION_UNKNOWN,
                        "response contained no location",
                    )))
                } else {
                    Ok(LookupResult::Found {
                        locations: self.locations,
                        references: self.references,
                    })
                }
            }
            "error" => {
                let code = self.error_code.ok_or(HeldError::Missing("error@code"))?;
                let record = ErrorRecord::new(code, self.error_message.unwrap_or_default());
                if record.code == LOCATION_UNKNOWN {
                    Ok(LookupResult::NotFound(record))
                } else {
                    Ok(LookupResult::Error(record))
                }
            }
            other => Ok(LookupResult::Unknown(other.to_string())),
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, HeldError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| HeldError::Malformed(format!("invalid timestamp '{value}'")))
}

/// `pos` holds "latitude longitude" for EPSG:4326
fn parse_position(text: &str) -> Result<Location, HeldError> {
    let invalid = || HeldError::Malformed(format!("invalid position '{text}'"));
    let mut parts = text.split_whitespace().map(str::parse::<f64>);

    let latitude = parts.next().ok_or_else(invalid)?.map_err(|_| invalid())?;
    let longitude = parts.next().ok_or_else(invalid)?.map_err(|_| invalid())?;
    Ok(Location::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::{LocationType, RequestId};

    const FOUND_RESPONSE: &str = r#"<?xml version="1.0"?>
<locationResponse xmlns="urn:ietf:params:xml:ns:geopriv:held">
  <locationUriSet expires="2026-01-01T13:00:00.0Z">
    <locationURI>https://ls.example.com:9768/357yc6s64ceyoiuy5ax3o</locationURI>
    <locationURI>sip:9769+357yc6s64ceyoiuy5ax3o@ls.example.com</locationURI>
  </locationUriSet>
  <presence xmlns="urn:ietf:params:xml:ns:pidf" entity="pres:3650n87934c@ls.example.com">
    <tuple id="b650sf789nd">
      <status>
        <geopriv xmlns="urn:ietf:params:xml:ns:pidf:geopriv10">
          <location-info>
            <Circle xmlns="http://www.opengis.net/pidflo/1.0" srsName="urn:ogc:def:crs:EPSG::4326">
              <pos xmlns="http://www.opengis.net/gml">42.5463 -73.2512</pos>
              <radius uom="urn:ogc:def:uom:EPSG::9001">850.24</radius>
            </Circle>
            <Point xmlns="http://www.opengis.net/gml" srsName="urn:ogc:def:crs:EPSG::4326">
              <pos>48.2 16.3</pos>
            </Point>
          </location-info>
        </geopriv>
      </status>
    </tuple>
  </presence>
</locationResponse>"#;

    #[test]
    fn encode_request_should_include_types_and_exact_flag() {
        let request = LookupRequest::new(
            RequestId::new(1),
            "abc123",
            vec![LocationType::Geodetic, LocationType::Civic],
            true,
        );
        let xml = encode_request(&request);

        assert!(xml.contains(r#"<locationType exact="true">geodetic civic</locationType>"#));
        assert!(xml.contains("<uri>abc123</uri>"));
        assert!(xml.contains(HELD_ID_NAMESPACE));
    }

    #[test]
    fn encode_request_should_omit_location_type_when_empty() {
        let request = LookupRequest::new(RequestId::new(1), "a<b", vec![], false);
        let xml = encode_request(&request);

        assert!(!xml.contains("locationType"));
        assert!(xml.contains("<uri>a&lt;b</uri>"));
    }

    #[test]
    fn parse_response_should_read_locations_and_references() {
        let result = parse_response(FOUND_RESPONSE).unwrap();

        let LookupResult::Found {
            locations,
            references,
        } = result
        else {
            panic!("expected FOUND, got {result:?}");
        };

        assert_eq!(references.len(), 2);
        assert_eq!(
            references[0].uri,
            "https://ls.example.com:9768/357yc6s64ceyoiuy5ax3o"
        );
        assert_eq!(references[1].expires.to_rfc3339(), "2026-01-01T13:00:00+00:00");

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0], Location::new(42.5463, -73.2512).with_radius(850.24));
        assert_eq!(locations[1], Location::new(48.2, 16.3));
    }

    #[test]
    fn parse_response_should_map_location_unknown_to_not_found() {
        let xml = r#"<error xmlns="urn:ietf:params:xml:ns:geopriv:held" code="locationUnknown">
            <message xml:lang="en">Unable to determine location</message>
        </error>"#;

        assert_eq!(
            parse_response(xml).unwrap(),
            LookupResult::NotFound(ErrorRecord::new(
                "locationUnknown",
                "Unable to determine location"
            ))
        );
    }

    #[test]
    fn parse_response_should_map_other_codes_to_error() {
        let xml = r#"<error xmlns="urn:ietf:params:xml:ns:geopriv:held" code="requestError">
            <message>bad device</message>
        </error>"#;

        assert_eq!(
            parse_response(xml).unwrap(),
            LookupResult::Error(ErrorRecord::new("requestError", "bad device"))
        );
    }

    #[test]
    fn parse_response_should_treat_empty_location_response_as_not_found() {
        let xml = r#"<locationResponse xmlns="urn:ietf:params:xml:ns:geopriv:held"/>"#;
        let result = parse_response(xml).unwrap();

        assert_eq!(result.status_name(), "NOT_FOUND");
    }

    #[test]
    fn parse_response_should_keep_unknown_root_name() {
        let xml = r#"<redirect xmlns="urn:example:other"><target>x</target></redirect>"#;

        assert_eq!(
            parse_response(xml).unwrap(),
            LookupResult::Unknown("redirect".to_string())
        );
    }

    #[test]
    fn test_parse_response_invalid_position() {
        let xml = r#"<locationResponse><Point><pos>north east</pos></Point></locationResponse>"#;
        let err = parse_response(xml).unwrap_err();

        assert!(err.to_string().contains("invalid position"));
    }

    #[test]
    fn test_parse_response_missing_expiry() {
        let xml = r#"<locationResponse><locationUriSet><locationURI>https://x</locationURI></locationUriSet></locationResponse>"#;

        assert!(matches!(
            parse_response(xml),
            Err(HeldError::Missing("locationUriSet@expires"))
        ));
    }

    #[test]
    fn parse_response_should_read_cdata_content() {
        let xml = r#"<locationResponse>
            <locationUriSet expires="2026-01-01T00:00:00Z">
                <locationURI><![CDATA[https://ls.example/loc?a=1&b=2]]></locationURI>
            </locationUriSet>
            <Point><pos><![CDATA[48.2 16.3]]></pos></Point>
        </locationResponse>"#;

        let LookupResult::Found {
            locations,
            references,
        } = parse_response(xml).unwrap()
        else {
            panic!("expected FOUND");
        };

        assert_eq!(references.len(), 1);
        assert_eq!(references[0].uri, "https://ls.example/loc?a=1&b=2");
        assert_eq!(locations, vec![Location::new(48.2, 16.3)]);
    }

    #[test]
    fn test_parse_response_empty_document() {
        assert!(parse_response("").is_err());
    }
}
