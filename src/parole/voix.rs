// src/parole/voix.rs
//
// Voix : ressource exclusive du consommateur de la file.
// - JournalVoice : toujours disponible (journal seulement), repli par défaut
// - SystemVoice  : synthèse du système (feature `voix-systeme`, crate `tts`)

use thiserror::Error;
use tracing::info;

/// Débit (mots/minute) considéré comme « normal ».
pub const DEBIT_NORMAL: u32 = 180;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Voix impossible à créer (pilote absent, fil refusé…).
    #[error("voz indisponível: {0}")]
    Unavailable(String),

    /// Échec sur un énoncé précis ; la file continue.
    #[error("falha de síntese: {0}")]
    Synthesis(String),
}

/// Une voix prononce un texte à un débit donné, de façon bloquante.
pub trait VoiceBackend {
    fn speak(&mut self, text: &str, rate: u32) -> Result<(), BackendError>;

    fn name(&self) -> &str {
        "voz"
    }
}

impl<V: VoiceBackend + ?Sized> VoiceBackend for Box<V> {
    fn speak(&mut self, text: &str, rate: u32) -> Result<(), BackendError> {
        (**self).speak(text, rate)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Voix « muette » : chaque énoncé part dans le journal.
#[derive(Clone, Debug, Default)]
pub struct JournalVoice;

impl VoiceBackend for JournalVoice {
    fn speak(&mut self, text: &str, rate: u32) -> Result<(), BackendError> {
        info!(target: "calculatrice_accessible::parole", debit = rate, "« {text} »");
        Ok(())
    }

    fn name(&self) -> &str {
        "journal"
    }
}

#[cfg(feature = "voix-systeme")]
pub use systeme::SystemVoice;

#[cfg(feature = "voix-systeme")]
mod systeme {
    use std::time::{Duration, Instant};

    use tracing::{debug, warn};
    use tts::Tts;

    use super::{BackendError, VoiceBackend, DEBIT_NORMAL};

    /// Attente maximale d’un énoncé (au-delà : on rend la main).
    const ATTENTE_MAX: Duration = Duration::from_secs(60);
    const SONDE: Duration = Duration::from_millis(20);

    pub struct SystemVoice {
        tts: Tts,
    }

    impl SystemVoice {
        /// Voix du système ; `preferee` est cherchée par nom, sinon une voix portugaise.
        pub fn new(preferee: Option<&str>) -> Result<Self, BackendError> {
            let mut tts = Tts::default().map_err(|e| BackendError::Unavailable(e.to_string()))?;

            if tts.supported_features().voice {
                match tts.voices() {
                    Ok(voix) => {
                        let choisie = preferee
                            .and_then(|nom| voix.iter().find(|v| v.name().contains(nom)))
                            .or_else(|| {
                                voix.iter()
                                    .find(|v| v.language().to_string().starts_with("pt"))
                            });
                        if let Some(v) = choisie {
                            debug!(voix = %v.name(), "voix sélectionnée");
                            if let Err(e) = tts.set_voice(v) {
                                warn!(erreur = %e, "voix refusée, voix par défaut conservée");
                            }
                        }
                    }
                    Err(e) => warn!(erreur = %e, "liste des voix indisponible"),
                }
            }

            Ok(Self { tts })
        }

        /// Mots/minute -> échelle du pilote (180 = normal), bornée.
        fn debit_pilote(&self, rate: u32) -> f32 {
            let normal = self.tts.normal_rate();
            let v = normal * rate as f32 / DEBIT_NORMAL as f32;
            v.clamp(self.tts.min_rate(), self.tts.max_rate())
        }
    }

    impl VoiceBackend for SystemVoice {
        fn speak(&mut self, text: &str, rate: u32) -> Result<(), BackendError> {
            let synth = |e: tts::Error| BackendError::Synthesis(e.to_string());

            if self.tts.supported_features().rate {
                let r = self.debit_pilote(rate);
                self.tts.set_rate(r).map_err(synth)?;
            }
            self.tts.speak(text, false).map_err(synth)?;

            if !self.tts.supported_features().is_speaking {
                return Ok(());
            }
            let t0 = Instant::now();
            while self.tts.is_speaking().map_err(synth)? {
                if t0.elapsed() > ATTENTE_MAX {
                    return Err(BackendError::Synthesis("tempo esgotado".to_string()));
                }
                std::thread::sleep(SONDE);
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "sistema"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_toujours_disponible() {
        let mut v = JournalVoice;
        assert!(v.speak("dois vezes três", DEBIT_NORMAL).is_ok());
        assert_eq!(v.name(), "journal");
    }

    #[test]
    fn boite_delegue() {
        let mut v: Box<dyn VoiceBackend> = Box::new(JournalVoice);
        assert!(v.speak("ok", 200).is_ok());
        assert_eq!(v.name(), "journal");
    }
}
