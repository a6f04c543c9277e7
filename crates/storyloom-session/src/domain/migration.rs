//! Save schema versions and the ordered migration steps between them.
//!
//! A save document is a JSON object holding the session fields plus a
//! `schemaVersion` tag. Documents without the tag are version 0. Each step
//! upgrades a document from `target - 1` to `target`; steps run in order and
//! only those newer than the document's version apply.

use serde_json::{Map, Value};

/// Version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Name of the version tag inside a save document.
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

type MigrationStep = fn(&mut Map<String, Value>);

/// `(target version, step)` pairs, ascending.
const MIGRATIONS: [(u32, MigrationStep); 2] =
    [(1, rename_legacy_fields), (2, add_missing_collections)];

/// A document brought up to [`CURRENT_SCHEMA_VERSION`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradedDocument {
    /// Session fields, version tag removed.
    pub fields: Map<String, Value>,
    /// Version the document was written with.
    pub from_version: u32,
}

/// Runs every migration step newer than the document's version.
///
/// # Errors
///
/// Returns a description of the problem if the document is not a JSON object
/// or its version tag is not a non-negative integer.
pub fn upgrade(document: Value) -> Result<UpgradedDocument, String> {
    let Value::Object(mut fields) = document else {
        return Err("save document is not a JSON object".to_owned());
    };

    let from_version = match fields.remove(SCHEMA_VERSION_FIELD) {
        None => 0,
        Some(tag) => tag
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| format!("invalid {SCHEMA_VERSION_FIELD}: {tag}"))?,
    };

    if from_version > CURRENT_SCHEMA_VERSION {
        tracing::warn!(
            from_version,
            current = CURRENT_SCHEMA_VERSION,
            "save was written by a newer build; reading it best-effort"
        );
    }

    for (target, step) in MIGRATIONS {
        if target > from_version {
            step(&mut fields);
        }
    }

    Ok(UpgradedDocument {
        fields,
        from_version,
    })
}

/// v0 -> v1: the regional variant stored its fields under other names.
fn rename_legacy_fields(fields: &mut Map<String, Value>) {
    const RENAMES: [(&str, &str); 4] = [
        ("stats", "attributes"),
        ("unlockedStates", "unlockedRegions"),
        ("visitedStates", "visitedRegions"),
        ("overallScore", "aggregateScore"),
    ];
    for (legacy, current) in RENAMES {
        if let Some(value) = fields.remove(legacy) {
            fields.entry(current).or_insert(value);
        }
    }
}

/// v1 -> v2: collections became mandatory.
fn add_missing_collections(fields: &mut Map<String, Value>) {
    for key in ["inventory", "achievements", "unlockedRegions", "visitedRegions"] {
        let slot = fields.entry(key).or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
    }
}
