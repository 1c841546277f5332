//! Calculatrice scientifique accessible.
//!
//! - `noyau`    : moteur d’évaluation (normalisation, analyse, espace fermé, rendu)
//! - `parole`   : file d’énoncés à consommateur unique
//! - `signal`   : bip de touche
//! - `reglages` : configuration TOML

pub mod noyau;
pub mod parole;
pub mod reglages;
pub mod signal;
