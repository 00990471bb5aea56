//! In-memory model of one package's index.
//!
//! The on-disk HTML pages are treated purely as a serialization format for
//! this model; `page` holds the render/parse pair and `writer` the
//! read-modify-write cycle against the index repository.

pub mod page;
pub mod writer;

/// One published version of a package.
///
/// Identity within a package is the version string alone; commit and forge
/// coordinates are payload, replaced wholesale when the same version is
/// written again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    pub commit: String,
    pub forge_user: String,
    pub forge_repo: String,
}

/// A package and its full set of version records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIndex {
    pub name: String,
    records: Vec<VersionRecord>,
}

impl PackageIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    pub fn with_records(name: impl Into<String>, records: Vec<VersionRecord>) -> Self {
        let mut index = Self {
            name: name.into(),
            records,
        };
        index.sort();
        index
    }

    /// Replace-or-insert: at most one record per version string survives,
    /// and the incoming record wins.
    pub fn upsert(&mut self, record: VersionRecord) {
        self.records.retain(|r| r.version != record.version);
        self.records.push(record);
        self.sort();
    }

    /// Records in rendering order.
    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Plain lexicographic order by version string. Deliberately not semantic
    // version order: "0.0.10" sorts before "0.0.2".
    fn sort(&mut self) {
        self.records.sort_by(|a, b| a.version.cmp(&b.version));
    }
}
