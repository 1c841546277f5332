// src/noyau/format.rs
//
// Présentation : nombre -> texte affiché, nombre -> texte parlé,
// expression saisie -> lecture parlée.

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use super::lexique::{nom_touche, MOT_MOINS};
use super::nombre::Number;

/// Budget de chiffres significatifs des réels non entiers.
pub const CHIFFRES_SIGNIFICATIFS: usize = 12;

/* ------------------------ Affichage ------------------------ */

/// Entiers sans point décimal ; réels mathématiquement entiers comme des entiers ;
/// autres réels sur 12 chiffres significatifs, zéros non significatifs retirés.
pub fn format_display(value: &Number) -> String {
    match value {
        Number::Int(n) => n.to_string(),
        Number::Float(x) => format_reel(*x),
    }
}

fn format_reel(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x.fract() == 0.0 {
        if let Some(n) = BigInt::from_f64(x) {
            return n.to_string();
        }
    }
    format_significatif(x, CHIFFRES_SIGNIFICATIFS)
}

/// Équivalent de `%.{p}g` : notation fixe si -4 <= exposant < p, sinon scientifique.
fn format_significatif(x: f64, p: usize) -> String {
    let p = p.max(1);
    let sci = format!("{:.*e}", p - 1, x);
    let Some((mantisse, exposant)) = sci.split_once('e') else {
        return sci;
    };
    let exposant: i32 = exposant.parse().unwrap_or(0);

    if exposant < -4 || exposant >= p as i32 {
        let signe = if exposant < 0 { '-' } else { '+' };
        return format!(
            "{}e{signe}{:02}",
            sans_zeros_finaux(mantisse),
            exposant.unsigned_abs()
        );
    }

    let decimales = (p as i32 - 1 - exposant).max(0) as usize;
    sans_zeros_finaux(&format!("{:.*}", decimales, x)).to_string()
}

fn sans_zeros_finaux(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

/* ------------------------ Lecture vocale ------------------------ */

/// Même rendu que l’affichage, le signe moins épelé.
pub fn format_spoken(value: &Number) -> String {
    format_display(value).replace('-', &format!("{MOT_MOINS} "))
}

/// Lecture de l’expression telle que saisie (indépendante de l’évaluation) :
/// chaque opérateur / fonction connue remplacé par son nom parlé.
pub fn format_spoken_expression(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut mots: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // nombres : chiffres gardés tels quels (la voix les lit), point épelé
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            mots.push(chars[start..i].iter().collect());
            continue;
        }

        // mots : fonctions / constantes connues, sinon tels quels
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let mot: String = chars[start..i].iter().collect();
            mots.push(nom_touche(&mot).map(str::to_string).unwrap_or(mot));
            continue;
        }

        // ** avant *
        if c == '*' && chars.get(i + 1) == Some(&'*') {
            mots.push(nom_touche("**").unwrap_or("**").to_string());
            i += 2;
            continue;
        }

        let s = c.to_string();
        mots.push(nom_touche(&s).map(str::to_string).unwrap_or(s));
        i += 1;
    }

    mots.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(x: f64) -> String {
        format_display(&Number::Float(x))
    }

    #[test]
    fn entiers_et_reels_entiers() {
        assert_eq!(format_display(&Number::from(120)), "120");
        assert_eq!(format_display(&Number::from(-7)), "-7");
        assert_eq!(f(4.0), "4");
        assert_eq!(f(-0.0), "0");
        assert_eq!(f(1e20), "100000000000000000000");
    }

    #[test]
    fn reel_entier_egal_entier() {
        for n in [0i64, 1, -1, 42, 1_000_000, -987_654_321] {
            assert_eq!(f(n as f64), format_display(&Number::from(n)));
        }
    }

    #[test]
    fn douze_chiffres_significatifs() {
        assert_eq!(f(0.1 + 0.2), "0.3");
        assert_eq!(f(1.0 / 3.0), "0.333333333333");
        assert_eq!(f(2.0 / 3.0), "0.666666666667");
        assert_eq!(f(3.5), "3.5");
        assert_eq!(f(-0.375), "-0.375");
        assert_eq!(f(std::f64::consts::PI), "3.14159265359");
        assert_eq!(f(0.000123), "0.000123");
    }

    #[test]
    fn notation_scientifique() {
        assert_eq!(f(1.2246467991473532e-16), "1.22464679915e-16");
        assert_eq!(f(0.00001234), "1.234e-05");
        assert_eq!(f(1.5e-300), "1.5e-300");
        assert_eq!(f(999_999_999_999.5), "1e+12");
    }

    #[test]
    fn nombre_parle() {
        assert_eq!(format_spoken(&Number::from(-5)), "menos 5");
        assert_eq!(format_spoken(&Number::Float(-2.5)), "menos 2.5");
        assert_eq!(format_spoken(&Number::from(12)), "12");
    }

    #[test]
    fn expression_parlee() {
        assert_eq!(format_spoken_expression("2*3"), "2 vezes 3");
        assert_eq!(
            format_spoken_expression("sin(30)+1.5"),
            "seno abre parênteses 30 fecha parênteses mais 1 ponto 5"
        );
        assert_eq!(format_spoken_expression("2^3 ÷ π"), "2 elevado a 3 dividido pi");
        assert_eq!(format_spoken_expression("2**3"), "2 elevado a 3");
        assert_eq!(format_spoken_expression("nCr(5, 2)"), "combinação abre parênteses 5 vírgula 2 fecha parênteses");
        assert_eq!(format_spoken_expression("ANS - x"), "resultado anterior menos x");
    }
}
