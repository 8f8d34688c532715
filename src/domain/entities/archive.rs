use serde::Serialize;

/// One file inside a bulk download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub url: String,
}

/// Everything needed to stream an album archive once access has been granted.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivePlan {
    pub file_name: String,
    pub entries: Vec<ArchiveEntry>,
}
