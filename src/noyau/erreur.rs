// src/noyau/erreur.rs
//
// Taxonomie des erreurs d’évaluation.
// Toutes sont récupérables : l’appelant corrige l’entrée et réessaie.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Flux de jetons mal formé (parenthèses, opérateur orphelin, arité…).
    #[error("erro de sintaxe: {0}")]
    Syntax(String),

    /// Identifiant hors de l’espace de noms.
    #[error("nome desconhecido: {0}")]
    UnknownName(String),

    /// Argument hors du domaine de la fonction (√-1, asin(2), fact(5.3)…).
    #[error("erro de domínio: {0}")]
    Domain(String),

    /// Division par zéro, dépassement de capacité.
    #[error("erro aritmético: {0}")]
    Arithmetic(String),
}

impl EvalError {
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Catégorie courte (journaux).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "syntax",
            Self::UnknownName(_) => "unknown_name",
            Self::Domain(_) => "domain",
            Self::Arithmetic(_) => "arithmetic",
        }
    }
}
