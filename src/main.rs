// src/main.rs
//
// Calculadora Científica Acessível — point d’entrée NATIF
// -------------------------------------------------------
// - journalisation (RUST_LOG, défaut calculatrice_accessible=info)
// - réglages TOML (repli sur les valeurs par défaut)
// - file de parole (voix du système si la feature est active, sinon journal)
// - eframe::run_native + NativeOptions
//
// IMPORTANT (structure projet):
// - `impl eframe::App for AppCalc` vit dans src/app.rs
// - Ici: point d’entrée seulement

use anyhow::Context;
use eframe::egui;
use tracing::{info, warn};

use calculatrice_accessible::parole::{BackendError, JournalVoice, SpeechQueue};
use calculatrice_accessible::reglages::{self, Reglages};
use calculatrice_accessible::signal::TerminalBell;

mod app;

use app::AppCalc;

/// Titre unique.
const TITRE_APP: &str = "Calculadora Científica Acessível";

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("calculatrice_accessible=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .init();
}

/// Réglages du fichier XDG ; toute erreur => valeurs par défaut (signalée).
fn charger_reglages() -> Reglages {
    let chemin = reglages::chemin_defaut();
    match reglages::charger(chemin.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            warn!(erreur = %e, "réglages ignorés, valeurs par défaut");
            Reglages::default()
        }
    }
}

fn demarrer_parole(reglages: &Reglages) -> Result<SpeechQueue, BackendError> {
    #[cfg(feature = "voix-systeme")]
    {
        use calculatrice_accessible::parole::SystemVoice;

        let preferee = reglages.voix.clone();
        match SpeechQueue::start(move || SystemVoice::new(preferee.as_deref()), reglages.debit) {
            Ok(q) => return Ok(q),
            Err(e) => warn!(erreur = %e, "voix du système indisponible, repli sur le journal"),
        }
    }

    SpeechQueue::start(|| Ok(JournalVoice), reglages.debit)
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let reglages = charger_reglages();
    let parole = demarrer_parole(&reglages).context("démarrage de la file de parole")?;
    info!(debit = reglages.debit, mode = ?reglages.mode, "calculatrice prête");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([560.0, 760.0])
            .with_min_inner_size([440.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(AppCalc::new(
                &reglages,
                parole,
                Box::new(TerminalBell),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("interface: {e}"))
}
