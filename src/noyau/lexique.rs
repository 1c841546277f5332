// src/noyau/lexique.rs
//
// Vocabulaire parlé (pt-BR) : noms des touches, opérateurs, fonctions, chiffres.

/// Nom parlé d’une touche / d’un jeton (None si inconnu : on lit tel quel).
pub fn nom_touche(token: &str) -> Option<&'static str> {
    let nom = match token {
        "+" => "mais",
        "-" => "menos",
        "*" | "×" => "vezes",
        "/" | "÷" => "dividido",
        "^" | "**" => "elevado a",
        "(" => "abre parênteses",
        ")" => "fecha parênteses",
        "," => "vírgula",
        "." => "ponto",
        "=" => "igual",
        "sqrt" | "√" => "raiz quadrada",
        "pi" | "π" => "pi",
        "e" => "e",
        "sin" => "seno",
        "cos" => "cosseno",
        "tan" => "tangente",
        "asin" => "arco seno",
        "acos" => "arco cosseno",
        "atan" => "arco tangente",
        "ln" => "logaritmo natural",
        "log" | "log10" => "logaritmo",
        "exp" => "exponencial",
        "abs" => "módulo",
        "floor" => "piso",
        "ceil" => "teto",
        "round" => "arredondar",
        "pow" => "potência",
        "fact" | "factorial" | "!" => "fatorial",
        "nCr" | "comb" => "combinação",
        "nPr" | "perm" => "permuta",
        "rad" => "para radianos",
        "deg" => "para graus",
        "ANS" => "resultado anterior",
        "C" => "limpar",
        "⌫" => "apagar",
        _ => return None,
    };
    Some(nom)
}

/// Nom parlé d’un chiffre.
pub fn nom_chiffre(c: char) -> Option<&'static str> {
    let nom = match c {
        '0' => "zero",
        '1' => "um",
        '2' => "dois",
        '3' => "três",
        '4' => "quatro",
        '5' => "cinco",
        '6' => "seis",
        '7' => "sete",
        '8' => "oito",
        '9' => "nove",
        _ => return None,
    };
    Some(nom)
}

/// Mot pour le signe moins dans un nombre lu.
pub const MOT_MOINS: &str = "menos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_connues() {
        assert_eq!(nom_touche("×"), Some("vezes"));
        assert_eq!(nom_touche("*"), Some("vezes"));
        assert_eq!(nom_touche("sin"), Some("seno"));
        assert_eq!(nom_touche("nCr"), Some("combinação"));
        assert_eq!(nom_touche("xyz"), None);
    }

    #[test]
    fn chiffres() {
        let noms: Vec<_> = "0123456789".chars().filter_map(nom_chiffre).collect();
        assert_eq!(noms.len(), 10);
        assert_eq!(nom_chiffre('3'), Some("três"));
        assert_eq!(nom_chiffre('x'), None);
    }
}
