//! Generation history: a bounded, newest-first ledger with a pluggable
//! persistence store.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::procuracao::models::Procuracao;

/// The ledger never holds more than this many entries.
pub const HISTORY_CAPACITY: usize = 50;

/// One successful generation, with a snapshot of the record used.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryItem {
    pub id: Uuid,
    #[schema(example = "10/01/2024 14:32:05")]
    pub timestamp: String,
    #[schema(example = "procuracao_edificio_x_2024-01-10.docx")]
    pub file_name: String,
    pub data: Procuracao,
}

impl HistoryItem {
    /// Stamp a new entry with the local wall clock.
    pub fn new(file_name: impl Into<String>, data: Procuracao) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now().format("%d/%m/%Y %H:%M:%S").to_string(),
            file_name: file_name.into(),
            data,
        }
    }
}

/// Persistence port: load once at startup, save the whole list on every
/// mutation.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Vec<HistoryItem>;
    fn save(&self, items: &[HistoryItem]);
}

/// JSON-file store. A missing or corrupt file loads as an empty history; a
/// failed save is logged and the in-memory ledger stays authoritative.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Vec<HistoryItem> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "histórico em {} ilegível, começando vazio: {e}",
                    self.path.display()
                );
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    fn save(&self, items: &[HistoryItem]) {
        let serialized = match serde_json::to_string_pretty(items) {
            Ok(s) => s,
            Err(e) => {
                log::error!("falha ao serializar histórico: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            log::error!("falha ao salvar histórico em {}: {e}", self.path.display());
        }
    }
}

/// In-memory store, for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore;

impl HistoryStore for MemoryStore {
    fn load(&self) -> Vec<HistoryItem> {
        Vec::new()
    }

    fn save(&self, _items: &[HistoryItem]) {}
}

/// Bounded newest-first ledger of generated documents.
pub struct HistoryLedger {
    items: Vec<HistoryItem>,
    store: Box<dyn HistoryStore>,
}

impl HistoryLedger {
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        let mut items = store.load();
        items.truncate(HISTORY_CAPACITY);
        Self { items, store }
    }

    /// Prepend an entry, enforce the cap, persist.
    pub fn record(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAPACITY);
        self.store.save(&self.items);
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }
}
