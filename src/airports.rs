//! Static airport reference data.
//!
//! City and country per airport, nearby-airport groups, the cities that
//! lie "beyond" a destination (hidden-city candidates) and the connecting
//! hubs considered for split tickets.

use crate::types::AirportCode;

/// (code, city, ISO country)
const AIRPORTS: &[(&str, &str, &str)] = &[
    ("FRA", "Frankfurt", "DE"),
    ("MUC", "Munich", "DE"),
    ("STR", "Stuttgart", "DE"),
    ("CGN", "Cologne", "DE"),
    ("DUS", "Düsseldorf", "DE"),
    ("HAM", "Hamburg", "DE"),
    ("BER", "Berlin", "DE"),
    ("VIE", "Vienna", "AT"),
    ("ZRH", "Zurich", "CH"),
    ("JFK", "New York", "US"),
    ("EWR", "Newark", "US"),
    ("LGA", "New York", "US"),
    ("BOS", "Boston", "US"),
    ("YUL", "Montreal", "CA"),
    ("YYZ", "Toronto", "CA"),
    ("LHR", "London", "GB"),
    ("LGW", "London", "GB"),
    ("STN", "London", "GB"),
    ("LTN", "London", "GB"),
    ("LCY", "London", "GB"),
    ("MAN", "Manchester", "GB"),
    ("EDI", "Edinburgh", "GB"),
    ("DUB", "Dublin", "IE"),
    ("CDG", "Paris", "FR"),
    ("ORY", "Paris", "FR"),
    ("AMS", "Amsterdam", "NL"),
    ("BRU", "Brussels", "BE"),
    ("LUX", "Luxembourg", "LU"),
    ("MXP", "Milan", "IT"),
    ("LIN", "Milan", "IT"),
    ("FCO", "Rome", "IT"),
    ("CIA", "Rome", "IT"),
    ("MAD", "Madrid", "ES"),
    ("BCN", "Barcelona", "ES"),
    ("WAW", "Warsaw", "PL"),
    ("IST", "Istanbul", "TR"),
    ("SAW", "Istanbul", "TR"),
    ("DXB", "Dubai", "AE"),
    ("AUH", "Abu Dhabi", "AE"),
    ("DOH", "Doha", "QA"),
    ("MCT", "Muscat", "OM"),
    ("NRT", "Tokyo", "JP"),
    ("HND", "Tokyo", "JP"),
    ("PVG", "Shanghai", "CN"),
    ("EZE", "Buenos Aires", "AR"),
    ("AEP", "Buenos Aires", "AR"),
];

const NEARBY: &[(&str, &[&str])] = &[
    ("FRA", &["MUC", "STR", "CGN", "DUS"]),
    ("MUC", &["FRA", "STR", "VIE"]),
    ("BER", &["HAM", "DUS", "FRA"]),
    ("JFK", &["EWR", "LGA"]),
    ("EWR", &["JFK", "LGA"]),
    ("LGA", &["JFK", "EWR"]),
    ("LHR", &["LGW", "STN", "LTN"]),
    ("LGW", &["LHR", "STN", "LTN"]),
    ("CDG", &["ORY"]),
    ("ORY", &["CDG"]),
    ("DXB", &["AUH"]),
    ("IST", &["SAW"]),
    ("MXP", &["LIN"]),
    ("FCO", &["CIA"]),
    ("NRT", &["HND"]),
    ("HND", &["NRT"]),
    ("EZE", &["AEP"]),
];

const BEYOND: &[(&str, &[&str])] = &[
    ("JFK", &["BOS", "YUL", "YYZ"]),
    ("LHR", &["DUB", "MAN", "EDI"]),
    ("CDG", &["AMS", "BRU", "LUX"]),
    ("FRA", &["MUC", "VIE", "ZRH"]),
    ("DXB", &["DOH", "AUH", "MCT"]),
];

const HUBS: &[&str] = &["FRA", "AMS", "CDG", "LHR", "MUC", "IST", "DXB", "DOH"];

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    AIRPORTS.iter().find(|(c, _, _)| *c == code)
}

fn codes(list: &[&str]) -> Vec<AirportCode> {
    list.iter()
        .filter_map(|c| AirportCode::parse(c).ok())
        .collect()
}

fn table_entry(table: &[(&str, &'static [&'static str])], code: &AirportCode) -> Vec<AirportCode> {
    table
        .iter()
        .find(|(c, _)| *c == code.as_str())
        .map(|(_, list)| codes(list))
        .unwrap_or_default()
}

/// City name for a known airport.
pub fn city(code: &AirportCode) -> Option<&'static str> {
    lookup(code.as_str()).map(|(_, city, _)| *city)
}

/// ISO country of a known airport.
pub fn country(code: &AirportCode) -> Option<&'static str> {
    lookup(code.as_str()).map(|(_, _, country)| *country)
}

/// Whether a flight between two airports crosses a border. Unknown
/// airports count as international.
pub fn is_international(a: &AirportCode, b: &AirportCode) -> bool {
    match (country(a), country(b)) {
        (Some(ca), Some(cb)) => ca != cb,
        _ => true,
    }
}

/// Alternative airports serving the same area.
pub fn nearby(code: &AirportCode) -> Vec<AirportCode> {
    table_entry(NEARBY, code)
}

/// Cities typically reached through `destination` as a layover.
pub fn beyond(destination: &AirportCode) -> Vec<AirportCode> {
    table_entry(BEYOND, destination)
}

/// Connecting hubs usable for a split ticket, excluding both endpoints.
pub fn hubs_between(origin: &AirportCode, destination: &AirportCode) -> Vec<AirportCode> {
    codes(HUBS)
        .into_iter()
        .filter(|h| h != origin && h != destination)
        .collect()
}

/// `Frankfurt (FRA) → New York (JFK)`, falling back to bare codes.
pub fn format_route(origin: &AirportCode, destination: &AirportCode) -> String {
    let label = |code: &AirportCode| match city(code) {
        Some(city) => format!("{city} ({code})"),
        None => code.to_string(),
    };
    format!("{} → {}", label(origin), label(destination))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
