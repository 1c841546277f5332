// src/noyau/nombre.rs
//
// Valeur numérique du noyau : entier exact (BigInt) ou flottant (f64).
//
// Règles :
// - Int (+ - *) Int reste Int ; la division donne toujours Float.
// - Int ** Int (exposant >= 0) reste Int, borné en taille.
// - Tout flottant non fini produit => ArithmeticError (dépassement).

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use super::erreur::EvalError;

/// Taille maximale (en bits) d’un entier produit par `**`.
const MAX_BITS_PUISSANCE: u64 = 100_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(BigInt::zero())
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(BigInt::from(n))
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::Int(n)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl Number {
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(n) => n.is_zero(),
            Number::Float(x) => *x == 0.0,
        }
    }

    /// Conversion vers f64 ; un entier trop grand pour f64 est un dépassement.
    pub fn to_f64(&self) -> Result<f64, EvalError> {
        match self {
            Number::Float(x) => Ok(*x),
            Number::Int(n) => match n.to_f64() {
                Some(x) if x.is_finite() => Ok(x),
                _ => Err(EvalError::arithmetic("inteiro grande demais para um real")),
            },
        }
    }

    /// Entier naturel exigé (fact, comb, perm).
    /// Accepte 5 ou 5.0, refuse 5.3 et les négatifs : pas de troncature silencieuse.
    pub fn to_natural(&self, fonction: &str) -> Result<BigInt, EvalError> {
        let n = match self {
            Number::Int(n) => n.clone(),
            Number::Float(x) => {
                if !x.is_finite() || x.fract() != 0.0 {
                    return Err(EvalError::domain(format!(
                        "{fonction} aceita apenas inteiros"
                    )));
                }
                BigInt::from_f64(*x).ok_or_else(|| {
                    EvalError::domain(format!("{fonction} aceita apenas inteiros"))
                })?
            }
        };
        if n.is_negative() {
            return Err(EvalError::domain(format!(
                "{fonction} não aceita valores negativos"
            )));
        }
        Ok(n)
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Int(n) => Number::Int(-n),
            Number::Float(x) => Number::Float(-x),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a + b)),
            (a, b) => fini(a.to_f64()? + b.to_f64()?),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a - b)),
            (a, b) => fini(a.to_f64()? - b.to_f64()?),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a * b)),
            (a, b) => fini(a.to_f64()? * b.to_f64()?),
        }
    }

    /// Division réelle (toujours Float).
    pub fn div(self, rhs: Number) -> Result<Number, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::arithmetic("divisão por zero"));
        }
        fini(self.to_f64()? / rhs.to_f64()?)
    }

    pub fn pow(self, rhs: Number) -> Result<Number, EvalError> {
        if let (Number::Int(base), Number::Int(exp)) = (&self, &rhs) {
            if !exp.is_negative() {
                return puissance_entiere(base, exp);
            }
            if base.is_zero() {
                return Err(EvalError::arithmetic(
                    "zero não pode ser elevado a uma potência negativa",
                ));
            }
        }

        let b = self.to_f64()?;
        let e = rhs.to_f64()?;
        if b == 0.0 && e < 0.0 {
            return Err(EvalError::arithmetic(
                "zero não pode ser elevado a uma potência negativa",
            ));
        }
        if b < 0.0 && e.fract() != 0.0 {
            return Err(EvalError::domain(
                "base negativa com expoente fracionário",
            ));
        }
        fini(b.powf(e))
    }
}

/// Contrôle de finitude d’un résultat flottant.
pub fn fini(x: f64) -> Result<Number, EvalError> {
    if x.is_nan() {
        return Err(EvalError::domain("resultado indefinido"));
    }
    if x.is_infinite() {
        return Err(EvalError::arithmetic("resultado grande demais"));
    }
    Ok(Number::Float(x))
}

fn puissance_entiere(base: &BigInt, exp: &BigInt) -> Result<Number, EvalError> {
    // |base| <= 1 : résultat trivial, quel que soit l’exposant
    if base.is_zero() {
        return Ok(Number::Int(if exp.is_zero() {
            BigInt::from(1)
        } else {
            BigInt::zero()
        }));
    }
    if base.abs() == BigInt::from(1) {
        let impair = (exp % 2u32) == BigInt::from(1);
        return Ok(Number::Int(if base.is_negative() && impair {
            BigInt::from(-1)
        } else {
            BigInt::from(1)
        }));
    }

    let e = exp
        .to_u32()
        .ok_or_else(|| EvalError::arithmetic("expoente grande demais"))?;
    if base.bits().saturating_mul(u64::from(e)) > MAX_BITS_PUISSANCE {
        return Err(EvalError::arithmetic("resultado grande demais"));
    }
    Ok(Number::Int(base.pow(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Number {
        Number::from(n)
    }

    #[test]
    fn entiers_restent_entiers() {
        assert_eq!(int(2).add(int(3)).unwrap(), int(5));
        assert_eq!(int(2).mul(int(-3)).unwrap(), int(-6));
        assert_eq!(int(2).pow(int(10)).unwrap(), int(1024));
    }

    #[test]
    fn division_toujours_reelle() {
        assert_eq!(int(6).div(int(3)).unwrap(), Number::Float(2.0));
        assert_eq!(
            int(1).div(int(0)),
            Err(EvalError::arithmetic("divisão por zero"))
        );
        assert!(matches!(
            Number::Float(1.0).div(Number::Float(0.0)),
            Err(EvalError::Arithmetic(_))
        ));
    }

    #[test]
    fn puissances_limites() {
        assert_eq!(int(2).pow(int(-1)).unwrap(), Number::Float(0.5));
        assert!(matches!(int(0).pow(int(-1)), Err(EvalError::Arithmetic(_))));
        assert!(matches!(
            int(10).pow(int(1_000_000)),
            Err(EvalError::Arithmetic(_))
        ));
        assert_eq!(int(-1).pow(int(1_000_001)).unwrap(), int(-1));
        assert!(matches!(
            Number::Float(-8.0).pow(Number::Float(0.5)),
            Err(EvalError::Domain(_))
        ));
        assert!(matches!(
            Number::Float(10.0).pow(Number::Float(400.0)),
            Err(EvalError::Arithmetic(_))
        ));
    }

    #[test]
    fn naturels() {
        assert_eq!(Number::Float(5.0).to_natural("fact").unwrap(), BigInt::from(5));
        assert!(matches!(
            Number::Float(5.3).to_natural("fact"),
            Err(EvalError::Domain(_))
        ));
        assert!(matches!(int(-1).to_natural("fact"), Err(EvalError::Domain(_))));
    }
}
