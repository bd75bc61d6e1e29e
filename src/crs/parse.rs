//! Grammar of user-supplied spatial reference identifiers
//!
//! ```text
//! identifier := epsg | urn | crs84 | wgs84 | proj
//! epsg       := "EPSG:" digits
//! urn        := "urn:ogc:def:crs:EPSG:" [version] ":" digits
//! crs84      := ["OGC:"] "CRS84" | "urn:ogc:def:crs:OGC:" [version] ":CRS84"
//! wgs84      := "WGS84"
//! proj       := "+proj=" ...
//! ```
//!
//! Keywords are case-insensitive; surrounding whitespace is ignored.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while};
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map, map_res, recognize, rest, value};
use nom::sequence::{preceded, tuple};
use nom::IResult;

/// A parsed identifier, before it is resolved to a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsIdentifier {
    Epsg(u32),
    /// WGS 84 longitude/latitude
    Crs84,
    /// A literal proj4 definition
    Proj(String),
}

fn code(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input)
}

/// Optional version segment of an OGC URN, e.g. `1.3` or empty
fn urn_version(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_digit() || c == '.')(input)
}

fn epsg(input: &str) -> IResult<&str, CrsIdentifier> {
    map(preceded(tag_no_case("EPSG:"), code), CrsIdentifier::Epsg)(input)
}

fn epsg_urn(input: &str) -> IResult<&str, CrsIdentifier> {
    map(
        preceded(
            tuple((tag_no_case("urn:ogc:def:crs:EPSG:"), urn_version, tag(":"))),
            code,
        ),
        CrsIdentifier::Epsg,
    )(input)
}

fn crs84(input: &str) -> IResult<&str, CrsIdentifier> {
    value(
        CrsIdentifier::Crs84,
        alt((
            recognize(tuple((
                tag_no_case("urn:ogc:def:crs:OGC:"),
                urn_version,
                tag_no_case(":CRS84"),
            ))),
            tag_no_case("OGC:CRS84"),
            tag_no_case("CRS84"),
        )),
    )(input)
}

fn wgs84(input: &str) -> IResult<&str, CrsIdentifier> {
    value(CrsIdentifier::Epsg(4326), tag_no_case("WGS84"))(input)
}

fn proj(input: &str) -> IResult<&str, CrsIdentifier> {
    map(recognize(preceded(tag("+proj="), rest)), |s: &str| {
        CrsIdentifier::Proj(s.to_string())
    })(input)
}

/// Parse an identifier; `None` when it matches no accepted form
pub fn parse_identifier(input: &str) -> Option<CrsIdentifier> {
    all_consuming(alt((epsg, epsg_urn, crs84, wgs84, proj)))(input.trim())
        .ok()
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_forms() {
        assert_eq!(parse_identifier("EPSG:31982"), Some(CrsIdentifier::Epsg(31982)));
        assert_eq!(parse_identifier(" epsg:4326 "), Some(CrsIdentifier::Epsg(4326)));
        assert_eq!(
            parse_identifier("urn:ogc:def:crs:EPSG::3857"),
            Some(CrsIdentifier::Epsg(3857))
        );
        assert_eq!(
            parse_identifier("urn:ogc:def:crs:EPSG:6.3:3857"),
            Some(CrsIdentifier::Epsg(3857))
        );
    }

    #[test]
    fn test_named_forms() {
        assert_eq!(parse_identifier("CRS84"), Some(CrsIdentifier::Crs84));
        assert_eq!(parse_identifier("OGC:CRS84"), Some(CrsIdentifier::Crs84));
        assert_eq!(
            parse_identifier("urn:ogc:def:crs:OGC:1.3:CRS84"),
            Some(CrsIdentifier::Crs84)
        );
        assert_eq!(parse_identifier("WGS84"), Some(CrsIdentifier::Epsg(4326)));
    }

    #[test]
    fn test_proj_string() {
        let def = "+proj=utm +zone=22 +south +datum=WGS84 +units=m +no_defs";
        assert_eq!(parse_identifier(def), Some(CrsIdentifier::Proj(def.to_string())));
    }

    #[test]
    fn test_rejected_forms() {
        assert_eq!(parse_identifier(""), None);
        assert_eq!(parse_identifier("EPSG:"), None);
        assert_eq!(parse_identifier("EPSG:abc"), None);
        assert_eq!(parse_identifier("EPSG:4326x"), None);
        assert_eq!(parse_identifier("not a crs"), None);
    }
}
