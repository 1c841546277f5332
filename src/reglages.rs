//! Réglages (TOML)
//!
//! Fichier : `$XDG_CONFIG_HOME/calculatrice-accessible/reglages.toml`
//! (typiquement `~/.config/calculatrice-accessible/reglages.toml`).
//! Toutes les clés sont optionnelles ; fichier absent => valeurs par défaut.
//!
//! ```toml
//! debit = 180                   # mots/minute (50 à 300)
//! chiffres_rapides = true       # chiffres lus plus vite
//! multiplicateur_chiffres = 2.0 # 1.0 à 3.0
//! bip = true
//! mode = "degrees"              # ou "radians"
//! voix = "Luciana"              # indice de nom de voix (optionnel)
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::noyau::EvaluationMode;
use crate::parole::DEBIT_NORMAL;

pub const DEBIT_MIN: u32 = 50;
pub const DEBIT_MAX: u32 = 300;
pub const MULTIPLICATEUR_MIN: f32 = 1.0;
pub const MULTIPLICATEUR_MAX: f32 = 3.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("impossible de lire {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML invalide: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("réglage invalide: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    pub debit: u32,
    pub chiffres_rapides: bool,
    pub multiplicateur_chiffres: f32,
    pub bip: bool,
    pub mode: EvaluationMode,
    pub voix: Option<String>,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            debit: DEBIT_NORMAL,
            chiffres_rapides: true,
            multiplicateur_chiffres: 2.0,
            bip: true,
            mode: EvaluationMode::Degrees,
            voix: None,
        }
    }
}

impl Reglages {
    pub fn depuis_toml(texte: &str) -> Result<Self, ConfigError> {
        let r: Reglages = toml::from_str(texte)?;
        r.valider()?;
        Ok(r)
    }

    pub fn valider(&self) -> Result<(), ConfigError> {
        if !(DEBIT_MIN..=DEBIT_MAX).contains(&self.debit) {
            return Err(ConfigError::Invalid(format!(
                "debit = {} (attendu {DEBIT_MIN} à {DEBIT_MAX})",
                self.debit
            )));
        }
        if !(MULTIPLICATEUR_MIN..=MULTIPLICATEUR_MAX).contains(&self.multiplicateur_chiffres) {
            return Err(ConfigError::Invalid(format!(
                "multiplicateur_chiffres = {} (attendu {MULTIPLICATEUR_MIN} à {MULTIPLICATEUR_MAX})",
                self.multiplicateur_chiffres
            )));
        }
        Ok(())
    }

    /// Débit de lecture d’un chiffre : None si la lecture rapide est coupée.
    pub fn debit_chiffres(&self) -> Option<u32> {
        self.chiffres_rapides
            .then(|| debit_chiffres(self.debit, self.multiplicateur_chiffres))
    }
}

/// Débit accéléré (arrondi) pour un débit de base donné.
pub fn debit_chiffres(debit: u32, multiplicateur: f32) -> u32 {
    (debit as f32 * multiplicateur).round().max(1.0) as u32
}

/// Chemin par défaut, None si aucun dossier de configuration n’est connu.
pub fn chemin_defaut() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calculatrice-accessible").join("reglages.toml"))
}

/// Charge le fichier s’il existe ; absent => valeurs par défaut.
pub fn charger(chemin: Option<&Path>) -> Result<Reglages, ConfigError> {
    let Some(chemin) = chemin else {
        return Ok(Reglages::default());
    };
    if !chemin.exists() {
        debug!(path = %chemin.display(), "pas de fichier de réglages, valeurs par défaut");
        return Ok(Reglages::default());
    }

    let texte = std::fs::read_to_string(chemin).map_err(|source| ConfigError::Read {
        path: chemin.to_path_buf(),
        source,
    })?;
    let r = Reglages::depuis_toml(&texte)?;
    info!(path = %chemin.display(), "réglages chargés");
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defauts() {
        let r = Reglages::default();
        assert_eq!(r.debit, 180);
        assert!(r.chiffres_rapides);
        assert_eq!(r.mode, EvaluationMode::Degrees);
        assert_eq!(r.debit_chiffres(), Some(360));
        assert!(r.valider().is_ok());
    }

    #[test]
    fn toml_partiel() {
        let r = Reglages::depuis_toml("debit = 220\nmode = \"radians\"\n").unwrap();
        assert_eq!(r.debit, 220);
        assert_eq!(r.mode, EvaluationMode::Radians);
        assert!(r.bip);
        assert_eq!(r.voix, None);
    }

    #[test]
    fn toml_vide() {
        assert_eq!(Reglages::depuis_toml("").unwrap(), Reglages::default());
    }

    #[test]
    fn valeurs_hors_bornes() {
        assert!(matches!(
            Reglages::depuis_toml("debit = 10"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Reglages::depuis_toml("multiplicateur_chiffres = 5.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn toml_mal_forme() {
        assert!(matches!(
            Reglages::depuis_toml("debit = \"vite\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Reglages::depuis_toml("mode = \"grades\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn lecture_rapide_coupee() {
        let r = Reglages {
            chiffres_rapides: false,
            ..Reglages::default()
        };
        assert_eq!(r.debit_chiffres(), None);
        assert_eq!(debit_chiffres(200, 1.5), 300);
    }

    #[test]
    fn fichier_absent() {
        let r = charger(Some(Path::new("/nonexistent/reglages.toml"))).unwrap();
        assert_eq!(r, Reglages::default());
        assert_eq!(charger(None).unwrap(), Reglages::default());
    }

    #[test]
    fn fichier_present() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"bip = false\nvoix = \"Luciana\"\n").unwrap();
        let r = charger(Some(f.path())).unwrap();
        assert!(!r.bip);
        assert_eq!(r.voix.as_deref(), Some("Luciana"));
    }

    #[test]
    fn chemin_xdg() {
        if let Some(p) = chemin_defaut() {
            assert!(p.ends_with("calculatrice-accessible/reglages.toml"));
        }
    }
}
