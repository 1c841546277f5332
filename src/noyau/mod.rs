//! Moteur d’évaluation d’expressions
//!
//! Organisation interne :
//! - normalise.rs : symboles d’affichage -> forme canonique (×, ÷, ^, π, √, log10)
//! - jetons.rs    : tokenisation
//! - rpn.rs       : shunting-yard + construction Expr
//! - expr.rs      : AST
//! - nombre.rs    : entiers exacts / réels f64
//! - trig.rs      : mode degrés/radians + quarts de tour exacts
//! - fonctions.rs : espace de noms fermé (fonctions + constantes)
//! - eval.rs      : pipeline complet + ANS
//! - format.rs    : rendu affiché / parlé
//! - lexique.rs   : vocabulaire parlé

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod lexique;
pub mod nombre;
pub mod normalise;
pub mod rpn;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

pub use erreur::EvalError;
pub use eval::{Engine, SharedEngine};
pub use format::{format_display, format_spoken, format_spoken_expression};
pub use nombre::Number;
pub use normalise::normalize;
pub use trig::EvaluationMode;
