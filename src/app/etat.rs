//! src/app/etat.rs
//!
//! État de la calculatrice (sans vue).
//!
//! Rôle : relier l’entrée utilisateur au noyau, à la file de parole et au bip,
//! par des opérations testables sans fenêtre.
//!
//! Contrats :
//! - Chaque touche : bip (si activé) puis annonce vocale de son nom.
//! - C : purge la parole en attente, annonce « limpar », vide l’entrée (ANS intact).
//! - = : évalue ; succès => résultat + historique + annonce ; échec => « erro de cálculo ».

use tracing::{debug, info};

use calculatrice_accessible::noyau::lexique::{nom_chiffre, nom_touche};
use calculatrice_accessible::noyau::{format_display, format_spoken, format_spoken_expression, Engine};
use calculatrice_accessible::parole::SpeechQueue;
use calculatrice_accessible::reglages::{debit_chiffres, Reglages, DEBIT_MAX, DEBIT_MIN};
use calculatrice_accessible::signal::{AudioCue, CueGate};

/// Préfixe du champ résultat.
const PREFIXE_RESULTAT: &str = "Resultado: ";

/// Phrase du bouton « Testar voz ».
pub const PHRASE_TEST: &str = "Teste de voz. Um dois três.";

/// Une ligne d’historique (succès seulement).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub expression: String,
    pub formatted_result: String,
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.expression, self.formatted_result)
    }
}

pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: String,
    pub historique: Vec<HistoryEntry>,

    // --- voix ---
    pub debit: u32,
    pub chiffres_rapides: bool,
    pub multiplicateur: f32,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,

    moteur: Engine,
    parole: SpeechQueue,
    bip: CueGate<Box<dyn AudioCue>>,
}

impl AppCalc {
    pub fn new(reglages: &Reglages, parole: SpeechQueue, bip: Box<dyn AudioCue>) -> Self {
        parole.set_default_rate(reglages.debit);
        Self {
            entree: String::new(),
            resultat: PREFIXE_RESULTAT.to_string(),
            historique: Vec::new(),
            debit: reglages.debit,
            chiffres_rapides: reglages.chiffres_rapides,
            multiplicateur: reglages.multiplicateur_chiffres,
            focus_entree: true,
            moteur: Engine::new(reglages.mode),
            parole,
            bip: CueGate::new(bip, reglages.bip),
        }
    }

    /* ------------------------ Touches ------------------------ */

    /// Bouton du pavé (ou raccourci) : bip, annonce, puis action.
    pub fn press(&mut self, token: &str) {
        self.bip.trigger();

        match token {
            "C" => {
                self.effacer();
                return;
            }
            _ => self.annoncer_touche(token),
        }

        match token {
            "⌫" => self.apagar(),
            "=" => self.evaluer(),
            "π" => self.entree.push_str("pi"),
            t => self.entree.push_str(t),
        }
        self.focus_entree = true;
    }

    /// Touche clavier remplacée avant insertion : `x`/`X` valent `×`.
    /// Renvoie vrai si la touche a été prise en charge.
    pub fn touche_remplacee(&mut self, c: char) -> bool {
        match c {
            'x' | 'X' => {
                self.press("×");
                true
            }
            _ => false,
        }
    }

    /// Caractère tapé au clavier (déjà inséré par le champ) : bip + annonce.
    pub fn touche_clavier(&mut self, c: char) {
        if !"0123456789.+-*/()^".contains(c) {
            return;
        }
        self.bip.trigger();
        self.annoncer_touche(c.encode_utf8(&mut [0; 4]));
    }

    /// Nom parlé de la touche ; chiffres et point au débit rapide.
    pub fn annoncer_touche(&self, token: &str) {
        let (texte, debit) = self.parole_touche(token);
        self.parole.enqueue(texte, debit);
    }

    fn parole_touche(&self, token: &str) -> (String, Option<u32>) {
        let rapide = self
            .chiffres_rapides
            .then(|| debit_chiffres(self.debit, self.multiplicateur));

        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(nom) = nom_chiffre(c) {
                return (nom.to_string(), rapide);
            }
            if c == '.' {
                return ("ponto".to_string(), rapide);
            }
        }

        // "sin(" -> "sin"
        let cle = token.strip_suffix('(').filter(|s| !s.is_empty()).unwrap_or(token);
        let texte = nom_touche(cle).map(str::to_string).unwrap_or_else(|| token.to_string());
        (texte, None)
    }

    /* ------------------------ Actions ------------------------ */

    /// C : la parole en attente est abandonnée avant d’annoncer « limpar ».
    pub fn effacer(&mut self) {
        let purges = self.parole.purge_pending();
        if !purges.is_empty() {
            debug!(n = purges.len(), "annonces abandonnées");
        }
        self.parole.enqueue(nom_touche("C").unwrap_or("limpar"), None);
        self.entree.clear();
        self.resultat = PREFIXE_RESULTAT.to_string();
        self.focus_entree = true;
    }

    /// ⌫ : retire le dernier caractère.
    pub fn apagar(&mut self) {
        self.entree.pop();
        self.focus_entree = true;
    }

    pub fn evaluer(&mut self) {
        let expression = self.entree.trim().to_string();
        if expression.is_empty() {
            self.parole.enqueue("expressão vazia", None);
            return;
        }

        match self.moteur.evaluate(&expression) {
            Ok(Some(valeur)) => {
                let affiche = format_display(&valeur);
                info!(expr = %expression, resultat = %affiche, "calcul");
                self.resultat = format!("{PREFIXE_RESULTAT}{affiche}");
                self.historique.push(HistoryEntry {
                    expression,
                    formatted_result: affiche,
                });
                self.parole
                    .enqueue(format!("resultado: {}", format_spoken(&valeur)), None);
            }
            Ok(None) => {
                self.parole.enqueue("expressão vazia", None);
            }
            Err(e) => {
                info!(expr = %expression, kind = e.kind(), "calcul refusé");
                self.resultat = format!("Erro: {e}");
                self.parole.enqueue("erro de cálculo", None);
            }
        }
        self.focus_entree = true;
    }

    /// F9 : bascule degrés/radians, ANS conservé.
    pub fn basculer_mode(&mut self) {
        let mode = self.moteur.toggle_mode();
        self.parole.enqueue(mode.spoken(), None);
    }

    pub fn libelle_mode(&self) -> String {
        format!("Modo: {}", self.moteur.mode().label())
    }

    pub fn lire_expression(&self) {
        let expression = self.entree.trim();
        if expression.is_empty() {
            self.parole.enqueue("expressão vazia", None);
            return;
        }
        self.parole.enqueue(
            format!("expressão: {}", format_spoken_expression(expression)),
            None,
        );
    }

    /* ------------------------ Réglages voix ------------------------ */

    pub fn set_debit(&mut self, debit: u32) {
        self.debit = debit.clamp(DEBIT_MIN, DEBIT_MAX);
        self.parole.set_default_rate(self.debit);
    }

    pub fn tester_voz(&self) {
        self.parole.enqueue(PHRASE_TEST, None);
    }

    pub fn bip_actif(&self) -> bool {
        self.bip.enabled()
    }

    pub fn set_bip(&mut self, actif: bool) {
        self.bip.set_enabled(actif);
    }

    pub fn ans(&self) -> String {
        format_display(self.moteur.last_result())
    }
}
