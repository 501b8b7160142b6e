//! Group-selection menu as a state machine, independent of any terminal.

use providers::Group;
use std::collections::BTreeSet;
use storage::models::{GroupDescriptor, RequestSetFile};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// 1-based menu number.
    pub index: usize,
    pub group_id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn display(&self) -> String {
        format!("{:>3}: {} ({})", self.index, self.name, self.group_id)
    }
}

/// Postable groups, numbered in case-insensitive name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCatalog {
    entries: Vec<CatalogEntry>,
}

impl GroupCatalog {
    pub fn from_groups(groups: Vec<Group>) -> Self {
        let mut groups: Vec<Group> = groups
            .into_iter()
            .map(|g| Group {
                name: html_escape::decode_html_entities(&g.name).into_owned(),
                id: g.id,
            })
            .collect();
        groups.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        let entries = groups
            .into_iter()
            .enumerate()
            .map(|(i, g)| CatalogEntry {
                index: i + 1,
                group_id: g.id,
                name: g.name,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle(usize),
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Choosing,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{0} is an invalid entry, ignoring and trying again")]
    OutOfRange(i64),
    #[error("{0:?} is not a group number, ignoring and trying again")]
    NotANumber(String),
}

/// Blank line finishes, a number toggles that group.
pub fn parse_command(line: &str) -> Result<Command, SelectionError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Finish);
    }
    let n: i64 = trimmed
        .parse()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;
    usize::try_from(n)
        .ok()
        .filter(|&i| i >= 1)
        .map(Command::Toggle)
        .ok_or(SelectionError::OutOfRange(n))
}

#[derive(Debug, Clone)]
pub struct Selection {
    catalog: GroupCatalog,
    selected: BTreeSet<usize>,
    phase: Phase,
}

impl Selection {
    pub fn new(catalog: GroupCatalog) -> Self {
        Self {
            catalog,
            selected: BTreeSet::new(),
            phase: Phase::Choosing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies one transition. A rejected command leaves the selection as it was.
    pub fn apply(&mut self, command: Command) -> Result<Phase, SelectionError> {
        if self.phase == Phase::Finished {
            return Ok(self.phase);
        }
        match command {
            Command::Finish => self.phase = Phase::Finished,
            Command::Toggle(index) => {
                if self.catalog.get(index).is_none() {
                    return Err(SelectionError::OutOfRange(index as i64));
                }
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
            }
        }
        Ok(self.phase)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.catalog
            .entries()
            .iter()
            .filter(|e| self.selected.contains(&e.index))
    }

    pub fn unselected(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.catalog
            .entries()
            .iter()
            .filter(|e| !self.selected.contains(&e.index))
    }

    pub fn descriptors(&self) -> Vec<GroupDescriptor> {
        self.selected()
            .map(|e| GroupDescriptor::new(e.group_id.clone(), e.name.clone()))
            .collect()
    }

    pub fn into_request_set(self, photo_id: &str) -> RequestSetFile {
        RequestSetFile::single(photo_id, self.descriptors())
    }
}
