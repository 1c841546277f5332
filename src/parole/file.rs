// src/parole/file.rs
//
// File de parole : un seul consommateur, ordre FIFO strict
// --------------------------------------------------------
// - enqueue / purge_pending / set_default_rate : jamais bloquants
// - le fil consommateur possède la voix (créée DANS le fil)
// - purge : retire tout ce qui n’a pas commencé ; l’énoncé en cours finit
// - shutdown : idempotent, attente bornée (500 ms) puis fil détaché
//
// Un message du canal est reçu par un seul récepteur : un énoncé est soit
// prononcé (consommateur), soit purgé (appelant), jamais les deux.
// Le test « fermée ? » et l’envoi se font sous le même verrou que la fermeture :
// aucun envoi ne peut suivre la dernière purge de `shutdown`.
// Une voix qui panique est traitée comme un échec (FAILED) ; avec
// `panic = "abort"` (profil release) le processus s’arrête, rien n’est perdu en silence.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, select, unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use super::voix::{BackendError, VoiceBackend, DEBIT_NORMAL};

/// Attente maximale du consommateur à l’arrêt.
pub const DELAI_ARRET: Duration = Duration::from_millis(500);

/// Un énoncé : texte + débit propre éventuel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub rate_override: Option<u32>,
}

/// Transitions observables d’un énoncé.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    Speaking(u64),
    Done(u64),
    Failed(u64, String),
    Purged(u64),
}

pub struct SpeechQueue {
    travail: Sender<Utterance>,
    // clone du récepteur : sert uniquement à purger
    en_attente: Receiver<Utterance>,
    arret: Sender<()>,
    fini: Receiver<()>,
    debit: Arc<AtomicU32>,
    // vrai après `shutdown` ; tenu pendant chaque envoi
    ferme: Mutex<bool>,
    prochain_id: AtomicU64,
    evenements: Option<Sender<SpeechEvent>>,
    fil: Mutex<Option<JoinHandle<()>>>,
}

impl SpeechQueue {
    /// Démarre le consommateur ; la voix est construite dans le fil.
    pub fn start<F, V>(creer_voix: F, debit_defaut: u32) -> Result<Self, BackendError>
    where
        F: FnOnce() -> Result<V, BackendError> + Send + 'static,
        V: VoiceBackend + 'static,
    {
        Self::demarrer(creer_voix, debit_defaut, None)
    }

    /// Comme `start`, en publiant chaque transition sur `evenements`.
    pub fn start_with_events<F, V>(
        creer_voix: F,
        debit_defaut: u32,
        evenements: Sender<SpeechEvent>,
    ) -> Result<Self, BackendError>
    where
        F: FnOnce() -> Result<V, BackendError> + Send + 'static,
        V: VoiceBackend + 'static,
    {
        Self::demarrer(creer_voix, debit_defaut, Some(evenements))
    }

    fn demarrer<F, V>(
        creer_voix: F,
        debit_defaut: u32,
        evenements: Option<Sender<SpeechEvent>>,
    ) -> Result<Self, BackendError>
    where
        F: FnOnce() -> Result<V, BackendError> + Send + 'static,
        V: VoiceBackend + 'static,
    {
        let (travail, recu) = unbounded::<Utterance>();
        let (arret, arret_rx) = bounded::<()>(1);
        let (fini_tx, fini) = bounded::<()>(1);
        let (pret_tx, pret_rx) = bounded::<Result<(), BackendError>>(1);

        let debit = Arc::new(AtomicU32::new(debit_valide(debit_defaut)));
        let consommateur = Consommateur {
            recu: recu.clone(),
            arret: arret_rx,
            debit: Arc::clone(&debit),
            evenements: evenements.clone(),
        };

        let fil = std::thread::Builder::new()
            .name("parole".to_string())
            .spawn(move || {
                let voix = match creer_voix() {
                    Ok(v) => {
                        let _ = pret_tx.send(Ok(()));
                        v
                    }
                    Err(e) => {
                        let _ = pret_tx.send(Err(e));
                        return;
                    }
                };
                consommateur.boucle(voix);
                let _ = fini_tx.send(());
            })
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        match pret_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = fil.join();
                return Err(e);
            }
            Err(_) => {
                let _ = fil.join();
                return Err(BackendError::Unavailable(
                    "fil de parole interrompu".to_string(),
                ));
            }
        }

        Ok(Self {
            travail,
            en_attente: recu,
            arret,
            fini,
            debit,
            ferme: Mutex::new(false),
            prochain_id: AtomicU64::new(1),
            evenements,
            fil: Mutex::new(Some(fil)),
        })
    }

    /// Ajoute un énoncé ; renvoie son id (None : texte vide ou file fermée).
    pub fn enqueue(&self, text: impl Into<String>, rate_override: Option<u32>) -> Option<u64> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        let ferme = self.verrou_ferme();
        if *ferme {
            return None;
        }

        let rate_override = match rate_override {
            Some(0) => {
                debug!("débit 0 ignoré (pas de surcharge)");
                None
            }
            r => r,
        };

        let id = self.prochain_id.fetch_add(1, Ordering::Relaxed);
        let u = Utterance {
            id,
            text,
            rate_override,
        };
        debug!(id, texte = %u.text, debit = ?u.rate_override, "énoncé en attente");
        // canal non borné : l’envoi ne bloque pas sous le verrou
        let envoye = self.travail.send(u).ok().map(|_| id);
        drop(ferme);
        envoye
    }

    /// Débit des prochains énoncés sans surcharge.
    pub fn set_default_rate(&self, rate: u32) {
        if rate == 0 {
            warn!("débit 0 refusé");
            return;
        }
        self.debit.store(rate, Ordering::Relaxed);
    }

    pub fn default_rate(&self) -> u32 {
        self.debit.load(Ordering::Relaxed)
    }

    /// Nombre d’énoncés pas encore commencés.
    pub fn pending(&self) -> usize {
        self.en_attente.len()
    }

    /// Retire tout ce qui n’a pas commencé (PENDING -> PURGED).
    pub fn purge_pending(&self) -> Vec<Utterance> {
        let purges: Vec<Utterance> = self.en_attente.try_iter().collect();
        for u in &purges {
            debug!(id = u.id, "énoncé purgé");
            self.publier(SpeechEvent::Purged(u.id));
        }
        purges
    }

    /// Arrête le consommateur : les énoncés en attente sont abandonnés (purgés).
    pub fn shutdown(&self) {
        {
            let mut ferme = self.verrou_ferme();
            if *ferme {
                return;
            }
            *ferme = true;
        }
        self.purge_pending();
        let _ = self.arret.try_send(());

        let fil = self.fil.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(fil) = fil {
            match self.fini.recv_timeout(DELAI_ARRET) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = fil.join();
                    debug!("fil de parole arrêté");
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(delai = ?DELAI_ARRET, "voix toujours occupée, fil de parole détaché");
                }
            }
        }

        // énoncés arrivés pendant l’arrêt
        self.purge_pending();
    }

    pub fn is_shut_down(&self) -> bool {
        *self.verrou_ferme()
    }

    fn verrou_ferme(&self) -> MutexGuard<'_, bool> {
        self.ferme.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publier(&self, ev: SpeechEvent) {
        if let Some(tx) = &self.evenements {
            let _ = tx.send(ev);
        }
    }
}

impl Drop for SpeechQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn debit_valide(rate: u32) -> u32 {
    if rate == 0 {
        DEBIT_NORMAL
    } else {
        rate
    }
}

/* ------------------------ Consommateur ------------------------ */

fn message_panique(panique: &(dyn std::any::Any + Send)) -> String {
    let detail = panique
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panique.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    format!("a voz entrou em pânico: {detail}")
}

struct Consommateur {
    recu: Receiver<Utterance>,
    arret: Receiver<()>,
    debit: Arc<AtomicU32>,
    evenements: Option<Sender<SpeechEvent>>,
}

impl Consommateur {
    fn boucle<V: VoiceBackend>(self, mut voix: V) {
        debug!(voix = voix.name(), "fil de parole démarré");
        loop {
            select! {
                recv(self.arret) -> _ => break,
                recv(self.recu) -> msg => match msg {
                    Ok(u) => self.prononcer(&mut voix, u),
                    Err(_) => break,
                },
            }
        }
    }

    fn prononcer<V: VoiceBackend>(&self, voix: &mut V, u: Utterance) {
        // débit résolu au passage en SPEAKING
        let debit = u
            .rate_override
            .unwrap_or_else(|| self.debit.load(Ordering::Relaxed));

        self.publier(SpeechEvent::Speaking(u.id));
        debug!(id = u.id, debit, "énoncé prononcé");

        let resultat = catch_unwind(AssertUnwindSafe(|| voix.speak(&u.text, debit)))
            .unwrap_or_else(|panique| Err(BackendError::Synthesis(message_panique(&*panique))));

        match resultat {
            Ok(()) => self.publier(SpeechEvent::Done(u.id)),
            Err(e) => {
                warn!(id = u.id, erreur = %e, "échec de la voix, énoncé suivant");
                self.publier(SpeechEvent::Failed(u.id, e.to_string()));
            }
        }
    }

    fn publier(&self, ev: SpeechEvent) {
        if let Some(tx) = &self.evenements {
            let _ = tx.send(ev);
        }
    }
}
