//! Parole : file d’énoncés à consommateur unique + voix.
//!
//! - file.rs : SpeechQueue (FIFO, purge, arrêt borné)
//! - voix.rs : VoiceBackend, JournalVoice, SystemVoice (feature `voix-systeme`)

pub mod file;
pub mod voix;

pub use file::{SpeechEvent, SpeechQueue, Utterance};
pub use voix::{BackendError, JournalVoice, VoiceBackend, DEBIT_NORMAL};

#[cfg(feature = "voix-systeme")]
pub use voix::SystemVoice;
