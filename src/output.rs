//! Request and result types for detect and split.
//!
//! Field names serialise in camelCase so the JSON matches what an upload
//! client exchanges with the service: the detect report is shown to a human,
//! edited, and sent back as a [`SplitSpec`].

use crate::error::SegmentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of pages in the range (0 if reversed).
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, page: usize) -> bool {
        page >= self.start && page <= self.end
    }

    /// Check `1 ≤ start ≤ end ≤ total`.
    pub fn validate(&self, unit: &str, total: usize) -> Result<(), SegmentError> {
        if self.start == 0 || self.start > self.end || self.end > total {
            return Err(SegmentError::SplitRangeInvalid {
                unit: unit.to_string(),
                start: self.start,
                end: self.end,
                total,
            });
        }
        Ok(())
    }
}

// ── Detect ───────────────────────────────────────────────────────────────

/// One proposed unit from detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedUnit {
    pub unit_name: String,
    pub release_date: DateTime<Utc>,
    pub start_page: usize,
    pub end_page: usize,
}

/// Result of a detect request, returned for human confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub units: Vec<DetectedUnit>,
    pub number_of_pages: usize,
    /// Always `false` from detection; the caller opts in at confirmation.
    pub remove_break_slides: bool,
}

impl DetectionReport {
    /// Accept the detected boundaries as-is.
    pub fn into_split_spec(self, remove_break_slides: bool) -> SplitSpec {
        SplitSpec {
            units: self
                .units
                .into_iter()
                .map(|u| UnitSplit {
                    unit_name: u.unit_name,
                    start_page: u.start_page,
                    end_page: u.end_page,
                    release_date: u.release_date,
                })
                .collect(),
            remove_break_slides,
        }
    }
}

// ── Split ────────────────────────────────────────────────────────────────

/// One caller-confirmed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSplit {
    pub unit_name: String,
    pub start_page: usize,
    pub end_page: usize,
    pub release_date: DateTime<Utc>,
}

impl UnitSplit {
    pub fn range(&self) -> PageRange {
        PageRange::new(self.start_page, self.end_page)
    }
}

/// Caller-confirmed split request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSpec {
    pub units: Vec<UnitSplit>,
    #[serde(default)]
    pub remove_break_slides: bool,
}

/// Category of a produced unit. Split always yields files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    #[default]
    File,
}

/// One produced unit: the sub-document bytes plus descriptive metadata.
///
/// The bytes themselves are not serialised; `byteLength` reports their size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitBundle {
    /// 1-based position in the split request.
    pub ordinal: usize,
    pub name: String,
    pub attachment_type: AttachmentType,
    pub release_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub page_count: usize,
    #[serde(rename = "byteLength", serialize_with = "serialize_byte_length")]
    pub bytes: Vec<u8>,
}

fn serialize_byte_length<S: serde::Serializer>(
    bytes: &[u8],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}

impl UnitBundle {
    /// Size of the PDF in bytes.
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// File name used when the bundle is written to disk: `NN-<name>.pdf`.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        let stem = if stem.is_empty() { "unit".to_string() } else { stem };
        format!("{:02}-{}.pdf", self.ordinal, stem)
    }
}

/// Manifest entry written alongside unit files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifestEntry<'a> {
    #[serde(flatten)]
    pub bundle: &'a UnitBundle,
    pub file: PathBuf,
}

/// Write each bundle to `dir` as a PDF file.
///
/// Files are written atomically (temp file in `dir`, then rename), so a
/// failure never leaves a truncated unit behind. Returns the written paths in
/// bundle order.
pub fn write_bundles(
    dir: impl AsRef<Path>,
    bundles: &[UnitBundle],
) -> Result<Vec<PathBuf>, SegmentError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| SegmentError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(bundles.len());
    for bundle in bundles {
        let path = dir.join(bundle.file_name());
        let write_err = |e: std::io::Error| SegmentError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&bundle.bytes).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!("Wrote unit {} to {}", bundle.ordinal, path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(ordinal: usize, name: &str) -> UnitBundle {
        UnitBundle {
            ordinal,
            name: name.to_string(),
            attachment_type: AttachmentType::File,
            release_date: Utc::now(),
            created_at: Utc::now(),
            description: String::new(),
            page_count: 1,
            bytes: b"%PDF-1.4 unit".to_vec(),
        }
    }

    #[test]
    fn page_range_validation() {
        assert!(PageRange::new(1, 5).validate("a", 10).is_ok());
        assert!(PageRange::new(10, 10).validate("a", 10).is_ok());
        assert!(PageRange::new(0, 5).validate("a", 10).is_err());
        assert!(PageRange::new(6, 5).validate("a", 10).is_err());
        assert!(PageRange::new(6, 11).validate("a", 10).is_err());
        assert_eq!(PageRange::new(6, 5).len(), 0);
        assert_eq!(PageRange::new(6, 10).len(), 5);
    }

    #[test]
    fn split_spec_json_uses_camel_case() {
        let json = r#"{
            "units": [
                {"unitName": "Recursion", "startPage": 1, "endPage": 5,
                 "releaseDate": "2024-04-15T10:00:00+02:00"}
            ],
            "removeBreakSlides": true
        }"#;
        let spec: SplitSpec = serde_json::from_str(json).unwrap();
        assert!(spec.remove_break_slides);
        assert_eq!(spec.units[0].unit_name, "Recursion");
        assert_eq!(spec.units[0].range(), PageRange::new(1, 5));
        assert_eq!(
            spec.units[0].release_date.to_rfc3339(),
            "2024-04-15T08:00:00+00:00"
        );
    }

    #[test]
    fn remove_break_slides_defaults_to_false() {
        let spec: SplitSpec = serde_json::from_str(r#"{"units": []}"#).unwrap();
        assert!(!spec.remove_break_slides);
    }

    #[test]
    fn report_converts_to_spec_unchanged() {
        let now = Utc::now();
        let report = DetectionReport {
            units: vec![DetectedUnit {
                unit_name: "Sorting".into(),
                release_date: now,
                start_page: 6,
                end_page: 10,
            }],
            number_of_pages: 10,
            remove_break_slides: false,
        };
        let spec = report.into_split_spec(true);
        assert!(spec.remove_break_slides);
        assert_eq!(
            spec.units,
            vec![UnitSplit {
                unit_name: "Sorting".into(),
                start_page: 6,
                end_page: 10,
                release_date: now,
            }]
        );
    }

    #[test]
    fn bundle_serialises_without_bytes() {
        let json = serde_json::to_value(bundle(1, "Recursion")).unwrap();
        assert_eq!(json["attachmentType"], "FILE");
        assert_eq!(json["description"], "");
        assert!(json.get("bytes").is_none());
        assert_eq!(json["byteLength"], b"%PDF-1.4 unit".len());
    }

    #[test]
    fn manifest_entry_flattens_bundle() {
        let b = bundle(2, "Sorting");
        let entry = BundleManifestEntry {
            bundle: &b,
            file: PathBuf::from("units/02-Sorting.pdf"),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Sorting");
        assert_eq!(json["byteLength"], b.byte_length());
        assert_eq!(json["file"], "units/02-Sorting.pdf");
    }

    #[test]
    fn write_bundles_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = write_bundles(blocker.join("units"), &[bundle(1, "Recursion")]).unwrap_err();

        match err {
            SegmentError::OutputWriteFailed { path, .. } => {
                assert_eq!(path, blocker.join("units"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn file_name_is_sanitised() {
        assert_eq!(bundle(3, "Trees/Graphs").file_name(), "03-Trees_Graphs.pdf");
        assert_eq!(bundle(12, "  ").file_name(), "12-unit.pdf");
    }

    #[test]
    fn write_bundles_creates_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("units");
        let bundles = vec![bundle(1, "Recursion"), bundle(2, "Sorting")];

        let paths = write_bundles(&out, &bundles).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("01-Recursion.pdf"));
        assert!(paths[1].ends_with("02-Sorting.pdf"));
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"%PDF-1.4 unit");
    }
}
