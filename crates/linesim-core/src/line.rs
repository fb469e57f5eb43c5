//! Assembly-line topology: which workstation feeds which.
//!
//! The topology file lists `station | next` links. Building a
//! [`LineTopology`] resolves every name against the loaded stations, wires
//! the `next` links and walks the chain from the single entry station (the
//! one station that is never a `next`). Anything other than one simple chain
//! is a [`ConfigurationError`].

use crate::error::{ConfigurationError, ParseError};
use crate::id::StationId;
use crate::station::Station;
use crate::tokenizer::{RecordCursor, Tokenizer};
use crate::workstation::Workstation;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Topology records
// ---------------------------------------------------------------------------

/// One `station | next` record. `next` is `None` for a terminal station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationLink {
    pub station: String,
    pub next: Option<String>,
}

impl StationLink {
    pub fn new(station: impl Into<String>, next: Option<&str>) -> Self {
        Self {
            station: station.into(),
            next: next.map(str::to_string),
        }
    }

    /// Parse `station[ | next]`. An empty or missing `next` marks the end of
    /// the line.
    pub fn from_record(
        record: &str,
        tokenizer: &mut Tokenizer,
    ) -> Result<Self, ConfigurationError> {
        let wrap = |source: ParseError| ConfigurationError::TopologyRecord {
            record: record.to_string(),
            source,
        };

        let mut cursor = RecordCursor::new(record);
        let station = tokenizer.next_field(&mut cursor).map_err(wrap)?;
        if station.is_empty() {
            return Err(wrap(ParseError::MissingField {
                record: record.to_string(),
                field: "station name",
            }));
        }
        let next = if cursor.has_more() {
            tokenizer.next_field(&mut cursor).map_err(wrap)?
        } else {
            String::new()
        };

        Ok(Self {
            station,
            next: (!next.is_empty()).then_some(next),
        })
    }
}

// ---------------------------------------------------------------------------
// LineTopology
// ---------------------------------------------------------------------------

/// Every loaded workstation plus the active chain through them.
///
/// Stations that no topology record mentions stay loaded but inactive: they
/// never receive orders.
#[derive(Debug)]
pub struct LineTopology {
    pub(crate) stations: SlotMap<StationId, Workstation>,
    pub(crate) chain: Vec<StationId>,
    by_name: HashMap<String, StationId>,
}

impl LineTopology {
    /// Wire `links` over `stations` and validate the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use linesim_core::id::StationNumber;
    /// use linesim_core::line::{LineTopology, StationLink};
    /// use linesim_core::station::Station;
    ///
    /// let stations = vec![
    ///     Station::new(StationNumber(1), "A", 1, 1, ""),
    ///     Station::new(StationNumber(2), "B", 1, 1, ""),
    /// ];
    /// let links = [StationLink::new("A", Some("B")), StationLink::new("B", None)];
    /// let line = LineTopology::build(stations, &links).unwrap();
    /// assert_eq!(line.workstation(line.entry()).unwrap().name(), "A");
    /// assert_eq!(line.chain().len(), 2);
    /// ```
    pub fn build(
        stations: Vec<Station>,
        links: &[StationLink],
    ) -> Result<Self, ConfigurationError> {
        if links.is_empty() {
            return Err(ConfigurationError::EmptyTopology);
        }

        let mut slots: SlotMap<StationId, Workstation> = SlotMap::with_key();
        let mut by_name: HashMap<String, StationId> = HashMap::new();
        for station in stations {
            let name = station.name().to_string();
            if by_name.contains_key(&name) {
                return Err(ConfigurationError::DuplicateStation { name });
            }
            let id = slots.insert(Workstation::new(station));
            by_name.insert(name, id);
        }

        let resolve = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ConfigurationError::UnknownStation {
                    name: name.to_string(),
                })
        };

        // Participating stations in first-mention order, and incoming marks.
        let mut participants: Vec<StationId> = Vec::new();
        let mut linked: SecondaryMap<StationId, ()> = SecondaryMap::new();
        let mut targeted: SecondaryMap<StationId, ()> = SecondaryMap::new();

        for link in links {
            let from = resolve(link.station.as_str())?;
            if linked.insert(from, ()).is_some() {
                return Err(ConfigurationError::DuplicateLink {
                    name: link.station.clone(),
                });
            }
            if !participants.contains(&from) {
                participants.push(from);
            }

            let to = link.next.as_deref().map(resolve).transpose()?;
            if let Some(to) = to {
                targeted.insert(to, ());
                if !participants.contains(&to) {
                    participants.push(to);
                }
            }
            slots[from].set_next(to);
        }

        let entries: Vec<StationId> = participants
            .iter()
            .copied()
            .filter(|id| !targeted.contains_key(*id))
            .collect();
        let entry = match entries.as_slice() {
            [] => return Err(ConfigurationError::NoEntryStation),
            [single] => *single,
            many => {
                return Err(ConfigurationError::MultipleEntryStations {
                    names: many.iter().map(|id| slots[*id].name().to_string()).collect(),
                });
            }
        };

        let mut chain = Vec::with_capacity(participants.len());
        let mut visited: SecondaryMap<StationId, ()> = SecondaryMap::new();
        let mut current = Some(entry);
        while let Some(id) = current {
            if visited.insert(id, ()).is_some() {
                return Err(ConfigurationError::CycleDetected {
                    name: slots[id].name().to_string(),
                });
            }
            chain.push(id);
            current = slots[id].next();
        }

        if let Some(stray) = participants.iter().find(|id| !visited.contains_key(**id)) {
            return Err(ConfigurationError::Unreachable {
                name: slots[*stray].name().to_string(),
                entry: slots[entry].name().to_string(),
            });
        }

        log::info!(
            "assembly line built: {} active of {} stations, entry '{}'",
            chain.len(),
            slots.len(),
            slots[entry].name()
        );

        Ok(Self {
            stations: slots,
            chain,
            by_name,
        })
    }

    /// The station where pending orders are admitted.
    pub fn entry(&self) -> StationId {
        self.chain[0]
    }

    /// Active stations in chain order, entry first.
    pub fn chain(&self) -> &[StationId] {
        &self.chain
    }

    pub fn workstation(&self, id: StationId) -> Option<&Workstation> {
        self.stations.get(id)
    }

    pub fn find(&self, name: &str) -> Option<StationId> {
        self.by_name.get(name).copied()
    }

    /// Active workstations in chain order.
    pub fn active(&self) -> impl Iterator<Item = &Workstation> + '_ {
        self.chain.iter().map(|id| &self.stations[*id])
    }

    /// Every loaded workstation, ordered by station number.
    pub fn all_stations(&self) -> Vec<&Workstation> {
        let mut all: Vec<&Workstation> = self.stations.values().collect();
        all.sort_by_key(|ws| ws.station().number());
        all
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Name of the successor of `id`, if any.
    pub fn next_name(&self, id: StationId) -> Option<&str> {
        let next = self.stations.get(id)?.next()?;
        self.stations.get(next).map(Workstation::name)
    }

    /// Orders currently queued anywhere on the line.
    pub fn orders_in_flight(&self) -> usize {
        self.stations.values().map(Workstation::queue_len).sum()
    }

    /// Longest station name, for aligned station listings.
    pub fn name_width(&self) -> usize {
        self.stations
            .values()
            .map(|ws| ws.name().chars().count())
            .max()
            .unwrap_or(0)
    }

    /// The chain as `NAME --> NEXT` lines.
    pub fn display(&self) -> LineDisplay<'_> {
        LineDisplay { line: self }
    }
}

/// Formatter returned by [`LineTopology::display`].
pub struct LineDisplay<'a> {
    line: &'a LineTopology,
}

impl fmt::Display for LineDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in &self.line.chain {
            let ws = &self.line.stations[*id];
            writeln!(f, "{}", ws.display_link(self.line.next_name(*id)))?;
        }
        Ok(())
    }
}
