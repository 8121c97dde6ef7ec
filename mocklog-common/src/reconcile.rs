//! Column reconciler
//!
//! Binds the arbitrary header row of an imported table onto the canonical
//! field schema using the alias table. Every field is required: a single
//! unmatched field rejects the whole table.

use crate::record::RecordDraft;
use crate::taxonomy::{ColumnAliasTable, Field};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// One input column bound to a canonical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBinding {
    pub field: Field,
    /// Header exactly as spelled in the input
    pub header: String,
    /// Zero-based column position in the input
    pub index: usize,
}

/// Result of a successful reconciliation, one binding per field in schema order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    bindings: Vec<ColumnBinding>,
}

impl ColumnMapping {
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// Input header bound to `field`
    pub fn header_for(&self, field: Field) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.field == field)
            .map(|b| b.header.as_str())
    }

    /// Pick the bound cells out of one data row
    ///
    /// Unbound columns are dropped. A short row yields empty strings for the
    /// missing cells.
    pub fn draft_from_row(&self, row: &[String]) -> RecordDraft {
        let mut draft = RecordDraft::default();
        for binding in &self.bindings {
            let value = row.get(binding.index).map(|s| s.as_str()).unwrap_or("");
            draft.set(binding.field, value);
        }
        draft
    }
}

/// Header reconciler over an injected alias table
#[derive(Debug, Clone, Copy)]
pub struct ColumnReconciler<'a> {
    aliases: &'a ColumnAliasTable,
}

impl<'a> ColumnReconciler<'a> {
    pub fn new(aliases: &'a ColumnAliasTable) -> Self {
        Self { aliases }
    }

    /// Map input headers onto canonical fields
    ///
    /// For each field in schema order the first alias present in the input
    /// (compared trimmed and lower-cased) wins. When two input headers
    /// normalise to the same key the later one is used.
    ///
    /// # Errors
    /// `Error::MissingColumns` listing every field with no matching header.
    pub fn reconcile<S: AsRef<str>>(&self, headers: &[S]) -> Result<ColumnMapping> {
        let mut lookup: HashMap<String, (usize, &str)> = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            lookup.insert(normalize(header), (index, header));
        }

        let mut bindings = Vec::with_capacity(Field::ALL.len());
        let mut missing = Vec::new();

        for (field, aliases) in self.aliases.iter() {
            let hit = aliases
                .iter()
                .find_map(|alias| lookup.get(&normalize(alias)));

            match hit {
                Some(&(index, header)) => {
                    debug!(field = %field, header = %header, index, "Bound import column");
                    bindings.push(ColumnBinding {
                        field,
                        header: header.to_string(),
                        index,
                    });
                }
                None => missing.push(field),
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        Ok(ColumnMapping { bindings })
    }
}

fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}
