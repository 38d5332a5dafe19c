//! Content fingerprinting for export staleness detection.
//!
//! An export stores a SHA-256 digest over the project's page content at
//! creation time. Recomputing the digest later and comparing detects
//! whether the source pages changed since the artifact was generated.

use serde::Serialize;
use serde_json::Value;

use crate::hashing::sha256_hex;
use crate::types::DbId;

/// The per-page fields that participate in the snapshot digest.
///
/// Field order is part of the digest contract; `updated_at` is the RFC 3339
/// rendering of the page's last-modified timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct PageFingerprint {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub structure: Option<Value>,
    pub updated_at: String,
}

/// Compute the snapshot digest over pages ordered by id.
///
/// The caller is responsible for supplying pages in id order; the digest is
/// the SHA-256 hex of the deterministic JSON serialization of the list.
pub fn snapshot_sha(pages: &[PageFingerprint]) -> String {
    let serialized = serde_json::to_string(pages).expect("fingerprints serialize to JSON");
    sha256_hex(serialized.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fingerprint(id: DbId, title: &str) -> PageFingerprint {
        PageFingerprint {
            id,
            title: title.to_string(),
            slug: "home".to_string(),
            structure: Some(json!({ "version": "1.0", "components": [] })),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn identical_input_identical_digest() {
        let pages = vec![fingerprint(1, "Home"), fingerprint(2, "About")];
        assert_eq!(snapshot_sha(&pages), snapshot_sha(&pages));
        assert_eq!(snapshot_sha(&pages).len(), 64);
    }

    #[test]
    fn title_change_changes_digest() {
        let before = vec![fingerprint(1, "Home")];
        let after = vec![fingerprint(1, "Homepage")];
        assert_ne!(snapshot_sha(&before), snapshot_sha(&after));
    }

    #[test]
    fn structure_change_changes_digest() {
        let before = vec![fingerprint(1, "Home")];
        let mut changed = fingerprint(1, "Home");
        changed.structure = Some(json!({
            "version": "1.0",
            "components": [{ "id": "h", "type": "Hero", "props": {} }]
        }));
        assert_ne!(snapshot_sha(&before), snapshot_sha(&[changed]));
    }

    #[test]
    fn updated_at_change_changes_digest() {
        let before = vec![fingerprint(1, "Home")];
        let mut touched = fingerprint(1, "Home");
        touched.updated_at = "2026-02-01T00:00:00+00:00".to_string();
        assert_ne!(snapshot_sha(&before), snapshot_sha(&[touched]));
    }

    #[test]
    fn page_order_matters() {
        let forward = vec![fingerprint(1, "Home"), fingerprint(2, "About")];
        let backward = vec![fingerprint(2, "About"), fingerprint(1, "Home")];
        assert_ne!(snapshot_sha(&forward), snapshot_sha(&backward));
    }

    #[test]
    fn empty_page_list_hashes() {
        assert_eq!(snapshot_sha(&[]).len(), 64);
    }
}
