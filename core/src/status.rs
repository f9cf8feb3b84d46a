use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::notion::{NamedOption, PropertyValue};


pub const UNKNOWN_STATUS: &str = "Unknown";


/// The shape a status property came back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusValue<'a> {
    Status(&'a str),
    Select(&'a str),
    Missing,
}

impl<'a> StatusValue<'a> {
    /// A `status` name wins over a `select` name. Empty names count as absent.
    pub fn resolve(prop: Option<&'a PropertyValue>) -> Self {
        let Some(prop) = prop else {
            return Self::Missing;
        };
        let named = |opt: &'a Option<NamedOption>| {
            opt.as_ref()
                .and_then(|o| o.name.as_deref())
                .filter(|name| !name.is_empty())
        };

        if let Some(name) = named(&prop.status) {
            Self::Status(name)
        } else if let Some(name) = named(&prop.select) {
            Self::Select(name)
        } else {
            Self::Missing
        }
    }

    pub fn label(&self) -> &'a str {
        match *self {
            Self::Status(name) | Self::Select(name) => name,
            Self::Missing => UNKNOWN_STATUS,
        }
    }
}


/// Per-label tally over a fixed vocabulary. Keys never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts {
    entries: Vec<(String, u64)>,
}

impl StatusCounts {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, u64)> = Vec::new();
        for label in vocabulary {
            let label = label.into();
            if !entries.iter().any(|(existing, _)| *existing == label) {
                entries.push((label, 0));
            }
        }
        Self { entries }
    }

    /// Returns false (and changes nothing) for labels outside the vocabulary.
    pub fn record(&mut self, label: &str) -> bool {
        match self.entries.iter_mut().find(|(known, _)| known == label) {
            Some((_, count)) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(known, _)| known == label)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

// serialized as a JSON object in vocabulary order
impl Serialize for StatusCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}
