//! Shared application state.
//!
//! Holds the parsed spreadsheet, the single selected-record slot and the
//! history ledger behind `parking_lot` locks, plus the AI collaborator. Only
//! the HTTP handlers write the slot; the pipeline components never do.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::ai::{correct_record, GeminiCorrector, TextCorrector};
use crate::history::{HistoryLedger, HistoryStore, JsonFileStore, MemoryStore};
use crate::procuracao::models::Procuracao;

const DEFAULT_HISTORY_FILE: &str = "./procuracao_history.json";

/// The currently selected record: the raw extraction/form value plus the
/// AI-corrected variant that supersedes it for every downstream read. The
/// raw value stays around so a failed correction costs nothing.
#[derive(Default)]
pub struct SelectedRecord {
    pub raw: Option<Procuracao>,
    pub corrected: Option<Procuracao>,
    pub correcting: bool,
}

impl SelectedRecord {
    pub fn effective(&self) -> Option<&Procuracao> {
        self.corrected.as_ref().or(self.raw.as_ref())
    }
}

pub struct AppState {
    pub parsed: RwLock<Vec<Procuracao>>,
    pub selected: RwLock<SelectedRecord>,
    pub history: RwLock<HistoryLedger>,
    pub corrector: Arc<dyn TextCorrector>,
    /// Monotonic token for in-flight corrections: a result is applied only
    /// while its token is still the latest, so a stale response can never
    /// clobber a newer selection.
    correction_seq: AtomicU64,
}

impl AppState {
    pub fn new(store: Box<dyn HistoryStore>, corrector: Arc<dyn TextCorrector>) -> Self {
        Self {
            parsed: RwLock::new(Vec::new()),
            selected: RwLock::new(SelectedRecord::default()),
            history: RwLock::new(HistoryLedger::new(store)),
            corrector,
            correction_seq: AtomicU64::new(0),
        }
    }

    /// Production wiring: JSON-file history (`PROCURACAO_HISTORY_FILE`) and
    /// the Gemini corrector from the environment.
    pub fn from_env() -> Self {
        let history_file = std::env::var("PROCURACAO_HISTORY_FILE")
            .unwrap_or_else(|_| DEFAULT_HISTORY_FILE.to_string());
        Self::new(
            Box::new(JsonFileStore::new(history_file)),
            Arc::new(GeminiCorrector::from_env()),
        )
    }

    /// Test wiring: nothing persisted, corrections disabled.
    pub fn ephemeral() -> Self {
        Self::new(
            Box::new(MemoryStore),
            Arc::new(GeminiCorrector::new(None, "gemini-2.5-flash")),
        )
    }

    /// Replace the selected record and invalidate any in-flight correction.
    /// Returns the token the next correction run must present.
    pub fn set_selected(&self, record: Option<Procuracao>) -> u64 {
        let token = self.correction_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut slot = self.selected.write();
        slot.correcting = record.is_some();
        slot.raw = record;
        slot.corrected = None;
        token
    }

    /// Apply a finished correction, unless a newer selection made it stale.
    pub fn finish_correction(&self, token: u64, record: Procuracao, was_corrected: bool) {
        if self.correction_seq.load(Ordering::SeqCst) != token {
            log::info!("descartando correção obsoleta (token {token})");
            return;
        }
        let mut slot = self.selected.write();
        slot.correcting = false;
        if was_corrected {
            slot.corrected = Some(record);
        }
    }

    pub fn current_correction_token(&self) -> u64 {
        self.correction_seq.load(Ordering::SeqCst)
    }
}

/// Drive one correction round against the selected slot.
pub async fn run_correction(state: Arc<AppState>, record: Procuracao, token: u64) {
    let (effective, was_corrected) = correct_record(state.corrector.as_ref(), &record).await;
    state.finish_correction(token, effective, was_corrected);
}
