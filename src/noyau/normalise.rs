// src/noyau/normalise.rs
//
// Normalisation des symboles de l’utilisateur avant la lecture en jetons.
// Fonction pure, idempotente, sans erreur : une entrée mal formée sera
// refusée plus loin (jetons / rpn).

use regex::Regex;
use std::sync::OnceLock;

/// Substitutions fixes (ordre sans importance : aucun motif n’en produit un autre).
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("×", "*"),
    ("÷", "/"),
    ("^", "**"),
    ("π", "pi"),
    ("√", "sqrt"),
];

fn log10_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"log10\s*\(").expect("regex log10"))
}

/// `2×3÷4^2` → `2*3/4**2`, `π` → `pi`, `√` → `sqrt`, `log10(` → `log(`.
pub fn normalize(raw: &str) -> String {
    let mut out = raw.to_string();
    for (de, vers) in SUBSTITUTIONS {
        if out.contains(de) {
            out = out.replace(de, vers);
        }
    }
    log10_re().replace_all(&out, "log(").into_owned()
}
