use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::unsync::Lazy;
use regex_lite::Regex;

use crate::error::Error;

// Handles fit in a u8.
const MAX_VALVES: usize = 256;

/// One scan line, before any referential checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValveRecord {
    pub name: String,
    pub rate: u32,
    /// Tunnel destinations, in declared order.
    pub tunnels: Vec<String>,
}

/// Parse a whole scan. Blank lines are skipped; anything else must match the
/// scan format, eg:
///
/// ```text
/// Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
/// ```
pub fn parse_records(s: &str) -> Result<Vec<ValveRecord>, Error> {
    let line_re = Lazy::new(|| {
        Regex::new(r#"Valve ([A-Z]+) has flow rate=(\d+); tunnel(?:s)? lead(?:s)? to valve(?:s)? (.*)"#).unwrap()
    });

    let mut records = Vec::new();
    for line in s.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = line_re.captures(line) else {
            return Err(Error::UnexpectedLine(line.to_string()));
        };
        let rate = caps[2]
            .parse()
            .map_err(|_| Error::UnexpectedLine(line.to_string()))?;
        records.push(ValveRecord {
            name: caps[1].to_string(),
            rate,
            tunnels: caps[3].split(", ").map(str::to_string).collect(),
        });
    }
    Ok(records)
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValveHandle(u8);

impl ValveHandle {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ValveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Valve {
    name: String,
    rate: u32,
    tunnels: Vec<ValveHandle>,
}

/// The valve network: dense storage indexed by handle, plus name lookup.
/// Adjacency is directed as declared; well-formed scans are symmetric but
/// that is not enforced.
pub struct Volcano {
    valves: Vec<Valve>,
    handle_for: HashMap<String, ValveHandle>,
}

impl Volcano {
    /// Assign handles and resolve every tunnel reference, rejecting
    /// duplicate names and tunnels to valves the scan never defines.
    pub fn build(records: Vec<ValveRecord>) -> Result<Self, Error> {
        if records.len() > MAX_VALVES {
            return Err(Error::TooManyValves(records.len()));
        }

        let mut handle_for: HashMap<String, ValveHandle> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            let handle = ValveHandle(i as u8);
            if handle_for.insert(record.name.clone(), handle).is_some() {
                return Err(Error::DuplicateName(record.name.clone()));
            }
        }

        let mut valves = Vec::with_capacity(records.len());
        for record in records {
            let mut tunnels = Vec::with_capacity(record.tunnels.len());
            for name in &record.tunnels {
                match handle_for.get(name) {
                    Some(&dst) => tunnels.push(dst),
                    None => {
                        return Err(Error::UnknownNeighbor {
                            valve: record.name.clone(),
                            neighbor: name.clone(),
                        });
                    }
                }
            }
            valves.push(Valve {
                name: record.name,
                rate: record.rate,
                tunnels,
            });
        }

        Ok(Volcano { valves, handle_for })
    }

    pub fn handle(&self, name: &str) -> Result<ValveHandle, Error> {
        self.handle_for
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownValve(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.valves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valves.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = ValveHandle> {
        (0..self.valves.len()).map(|i| ValveHandle(i as u8))
    }

    pub fn name(&self, h: ValveHandle) -> &str {
        &self.valves[h.as_usize()].name
    }

    pub fn rate(&self, h: ValveHandle) -> u32 {
        self.valves[h.as_usize()].rate
    }

    pub fn tunnels(&self, h: ValveHandle) -> &[ValveHandle] {
        &self.valves[h.as_usize()].tunnels
    }

    pub fn rate_of(&self, name: &str) -> Result<u32, Error> {
        Ok(self.rate(self.handle(name)?))
    }

    pub fn neighbors_of(&self, name: &str) -> Result<Vec<&str>, Error> {
        let h = self.handle(name)?;
        Ok(self.tunnels(h).iter().map(|&dst| self.name(dst)).collect())
    }

    /// The start valve plus every valve worth opening, start first, then
    /// handle order.
    pub fn interesting(&self, start: ValveHandle) -> Vec<ValveHandle> {
        let mut found = vec![start];
        found.extend(self.handles().filter(|&h| h != start && self.rate(h) > 0));
        found
    }
}

impl FromStr for Volcano {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Volcano::build(parse_records(s)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EXAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II";

    #[test]
    fn test_parse_records() {
        let records = parse_records(EXAMPLE).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(
            records[0],
            ValveRecord {
                name: "AA".to_string(),
                rate: 0,
                tunnels: vec!["DD".to_string(), "II".to_string(), "BB".to_string()],
            }
        );
        assert_eq!(records[7].name, "HH");
        assert_eq!(records[7].rate, 22);
        assert_eq!(records[7].tunnels, vec!["GG".to_string()]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let scan = format!("{EXAMPLE}\n\n");
        assert_eq!(parse_records(&scan).unwrap().len(), 10);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let got = parse_records("Valve AA has flow rate=0; tunnels lead\nnope");
        assert!(matches!(got, Err(Error::UnexpectedLine(_))));
    }

    #[test]
    fn test_queries() {
        let volcano = Volcano::from_str(EXAMPLE).unwrap();
        assert_eq!(volcano.rate_of("BB").unwrap(), 13);
        assert_eq!(volcano.rate_of("HH").unwrap(), 22);
        assert_eq!(volcano.neighbors_of("GG").unwrap(), vec!["FF", "HH"]);
        assert_eq!(volcano.neighbors_of("JJ").unwrap(), vec!["II"]);
    }

    #[test]
    fn test_unknown_valve() {
        let volcano = Volcano::from_str(EXAMPLE).unwrap();
        assert!(matches!(volcano.rate_of("QQ"), Err(Error::UnknownValve(_))));
        assert!(matches!(
            volcano.neighbors_of("QQ"),
            Err(Error::UnknownValve(_))
        ));
    }

    #[test]
    fn test_duplicate_name() {
        let scan = format!("{EXAMPLE}\nValve AA has flow rate=9; tunnel leads to valve BB");
        let got = Volcano::from_str(&scan);
        assert!(matches!(got, Err(Error::DuplicateName(name)) if name == "AA"));
    }

    #[test]
    fn test_unknown_neighbor() {
        let scan = format!("{EXAMPLE}\nValve ZZ has flow rate=9; tunnel leads to valve YY");
        let got = Volcano::from_str(&scan);
        assert!(matches!(
            got,
            Err(Error::UnknownNeighbor { valve, neighbor }) if valve == "ZZ" && neighbor == "YY"
        ));
    }

    #[test]
    fn test_too_many_valves() {
        let records: Vec<ValveRecord> = (0..257)
            .map(|i| ValveRecord {
                name: format!("V{i}"),
                rate: 0,
                tunnels: Vec::new(),
            })
            .collect();
        let got = Volcano::build(records);
        assert!(matches!(got, Err(Error::TooManyValves(257))));
    }

    #[test]
    fn test_interesting() {
        let volcano = Volcano::from_str(EXAMPLE).unwrap();
        let start = volcano.handle("AA").unwrap();
        let names: Vec<&str> = volcano
            .interesting(start)
            .into_iter()
            .map(|h| volcano.name(h))
            .collect();
        assert_eq!(names, vec!["AA", "BB", "CC", "DD", "EE", "HH", "JJ"]);
    }
}
