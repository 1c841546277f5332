// src/noyau/trig.rs
//
// Trigonométrie selon le mode (degrés / radians)
// ---------------------------------------------
// - DEGREES : l’argument est converti en radians ; résultat inverse en degrés
// - RADIANS : f64 direct
// - Quarts de tour exacts en degrés : sin(180) = 0, cos(90) = 0,
//   tan(90 + 180k) indéfini (DomainError) au lieu de 1.6e16

use serde::{Deserialize, Serialize};

use super::erreur::EvalError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    #[default]
    Degrees,
    Radians,
}

impl EvaluationMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }

    /// Libellé affiché par la surface.
    pub fn label(self) -> &'static str {
        match self {
            Self::Degrees => "Graus",
            Self::Radians => "Radianos",
        }
    }

    /// Annonce vocale d’un changement de mode.
    pub fn spoken(self) -> &'static str {
        match self {
            Self::Degrees => "modo graus",
            Self::Radians => "modo radianos",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvTrigFn {
    Asin,
    Acos,
    Atan,
}

/// Quart de tour k (mod 4) si x est un multiple EXACT de 90°.
fn quart_de_tour(x: f64) -> Option<u8> {
    if !x.is_finite() || x % 90.0 != 0.0 {
        return None;
    }
    Some((x / 90.0).rem_euclid(4.0) as u8)
}

/// Valeur exacte aux angles 0°, 90°, 180°, 270° (mod 360°).
fn quart_exact(f: TrigFn, k: u8) -> Result<f64, EvalError> {
    let v = match (f, k) {
        (TrigFn::Sin, 0) | (TrigFn::Sin, 2) => 0.0,
        (TrigFn::Sin, 1) => 1.0,
        (TrigFn::Sin, _) => -1.0,

        (TrigFn::Cos, 0) => 1.0,
        (TrigFn::Cos, 2) => -1.0,
        (TrigFn::Cos, _) => 0.0,

        (TrigFn::Tan, 0) | (TrigFn::Tan, 2) => 0.0,
        (TrigFn::Tan, _) => return Err(EvalError::domain("tangente indefinida")),
    };
    Ok(v)
}

pub fn trig(f: TrigFn, x: f64, mode: EvaluationMode) -> Result<f64, EvalError> {
    if !x.is_finite() {
        return Err(EvalError::domain("ângulo inválido"));
    }

    let rad = match mode {
        EvaluationMode::Degrees => {
            if let Some(k) = quart_de_tour(x) {
                return quart_exact(f, k);
            }
            x.to_radians()
        }
        EvaluationMode::Radians => x,
    };

    Ok(match f {
        TrigFn::Sin => rad.sin(),
        TrigFn::Cos => rad.cos(),
        TrigFn::Tan => rad.tan(),
    })
}

pub fn inv_trig(f: InvTrigFn, x: f64, mode: EvaluationMode) -> Result<f64, EvalError> {
    if x.is_nan() {
        return Err(EvalError::domain("argumento inválido"));
    }

    let rad = match f {
        InvTrigFn::Asin | InvTrigFn::Acos if !(-1.0..=1.0).contains(&x) => {
            let nom = if f == InvTrigFn::Asin { "asin" } else { "acos" };
            return Err(EvalError::domain(format!("{nom} exige valor entre -1 e 1")));
        }
        InvTrigFn::Asin => x.asin(),
        InvTrigFn::Acos => x.acos(),
        InvTrigFn::Atan => x.atan(),
    };

    Ok(match mode {
        EvaluationMode::Degrees => rad.to_degrees(),
        EvaluationMode::Radians => rad,
    })
}
