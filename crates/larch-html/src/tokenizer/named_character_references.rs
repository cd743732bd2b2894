//! Named character reference lookup table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! The full table defines 2,231 entities. This one carries the legacy
//! (semicolon-optional) Latin-1 set and the entities commonly seen in real
//! documents: punctuation, arrows, math operators, and Greek letters.

use std::collections::HashMap;
use std::sync::LazyLock;

/// [§ 13.5](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
///
/// U+00A0 through U+00FF in code point order. Each of these is also
/// recognised without its trailing semicolon.
const LATIN1: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave", "Eacute",
    "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve", "Oacute",
    "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute",
    "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth", "ntilde",
    "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave", "uacute",
    "ucirc", "uuml", "yacute", "thorn", "yuml",
];

/// Other semicolon-optional legacy references.
const LEGACY: [(&str, &str); 10] = [
    ("amp", "&"),
    ("AMP", "&"),
    ("lt", "<"),
    ("LT", "<"),
    ("gt", ">"),
    ("GT", ">"),
    ("quot", "\""),
    ("QUOT", "\""),
    ("COPY", "\u{00A9}"),
    ("REG", "\u{00AE}"),
];

/// References that require the trailing semicolon.
const WITH_SEMICOLON: &[(&str, &str)] = &[
    ("apos;", "'"),
    ("Tab;", "\t"),
    ("NewLine;", "\n"),
    ("excl;", "!"),
    ("num;", "#"),
    ("dollar;", "$"),
    ("percnt;", "%"),
    ("lpar;", "("),
    ("rpar;", ")"),
    ("ast;", "*"),
    ("plus;", "+"),
    ("comma;", ","),
    ("period;", "."),
    ("sol;", "/"),
    ("colon;", ":"),
    ("semi;", ";"),
    ("equals;", "="),
    ("quest;", "?"),
    ("commat;", "@"),
    ("lsqb;", "["),
    ("bsol;", "\\"),
    ("rsqb;", "]"),
    ("lowbar;", "_"),
    ("grave;", "`"),
    ("lcub;", "{"),
    ("verbar;", "|"),
    ("rcub;", "}"),
    ("OElig;", "\u{0152}"),
    ("oelig;", "\u{0153}"),
    ("Scaron;", "\u{0160}"),
    ("scaron;", "\u{0161}"),
    ("Yuml;", "\u{0178}"),
    ("fnof;", "\u{0192}"),
    ("circ;", "\u{02C6}"),
    ("tilde;", "\u{02DC}"),
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
    ("zwnj;", "\u{200C}"),
    ("zwj;", "\u{200D}"),
    ("lrm;", "\u{200E}"),
    ("rlm;", "\u{200F}"),
    ("ndash;", "\u{2013}"),
    ("mdash;", "\u{2014}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("sbquo;", "\u{201A}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("bdquo;", "\u{201E}"),
    ("dagger;", "\u{2020}"),
    ("Dagger;", "\u{2021}"),
    ("bull;", "\u{2022}"),
    ("hellip;", "\u{2026}"),
    ("permil;", "\u{2030}"),
    ("prime;", "\u{2032}"),
    ("Prime;", "\u{2033}"),
    ("lsaquo;", "\u{2039}"),
    ("rsaquo;", "\u{203A}"),
    ("oline;", "\u{203E}"),
    ("frasl;", "\u{2044}"),
    ("euro;", "\u{20AC}"),
    ("image;", "\u{2111}"),
    ("weierp;", "\u{2118}"),
    ("real;", "\u{211C}"),
    ("trade;", "\u{2122}"),
    ("alefsym;", "\u{2135}"),
    ("larr;", "\u{2190}"),
    ("uarr;", "\u{2191}"),
    ("rarr;", "\u{2192}"),
    ("darr;", "\u{2193}"),
    ("harr;", "\u{2194}"),
    ("crarr;", "\u{21B5}"),
    ("lArr;", "\u{21D0}"),
    ("uArr;", "\u{21D1}"),
    ("rArr;", "\u{21D2}"),
    ("dArr;", "\u{21D3}"),
    ("hArr;", "\u{21D4}"),
    ("forall;", "\u{2200}"),
    ("part;", "\u{2202}"),
    ("exist;", "\u{2203}"),
    ("empty;", "\u{2205}"),
    ("nabla;", "\u{2207}"),
    ("isin;", "\u{2208}"),
    ("notin;", "\u{2209}"),
    ("ni;", "\u{220B}"),
    ("prod;", "\u{220F}"),
    ("sum;", "\u{2211}"),
    ("minus;", "\u{2212}"),
    ("lowast;", "\u{2217}"),
    ("radic;", "\u{221A}"),
    ("prop;", "\u{221D}"),
    ("infin;", "\u{221E}"),
    ("ang;", "\u{2220}"),
    ("and;", "\u{2227}"),
    ("or;", "\u{2228}"),
    ("cap;", "\u{2229}"),
    ("cup;", "\u{222A}"),
    ("int;", "\u{222B}"),
    ("there4;", "\u{2234}"),
    ("sim;", "\u{223C}"),
    ("cong;", "\u{2245}"),
    ("asymp;", "\u{2248}"),
    ("ne;", "\u{2260}"),
    ("equiv;", "\u{2261}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("sub;", "\u{2282}"),
    ("sup;", "\u{2283}"),
    ("nsub;", "\u{2284}"),
    ("sube;", "\u{2286}"),
    ("supe;", "\u{2287}"),
    ("oplus;", "\u{2295}"),
    ("otimes;", "\u{2297}"),
    ("perp;", "\u{22A5}"),
    ("sdot;", "\u{22C5}"),
    ("lceil;", "\u{2308}"),
    ("rceil;", "\u{2309}"),
    ("lfloor;", "\u{230A}"),
    ("rfloor;", "\u{230B}"),
    ("lang;", "\u{27E8}"),
    ("rang;", "\u{27E9}"),
    ("loz;", "\u{25CA}"),
    ("spades;", "\u{2660}"),
    ("clubs;", "\u{2663}"),
    ("hearts;", "\u{2665}"),
    ("diams;", "\u{2666}"),
    ("Alpha;", "\u{0391}"),
    ("Beta;", "\u{0392}"),
    ("Gamma;", "\u{0393}"),
    ("Delta;", "\u{0394}"),
    ("Epsilon;", "\u{0395}"),
    ("Zeta;", "\u{0396}"),
    ("Eta;", "\u{0397}"),
    ("Theta;", "\u{0398}"),
    ("Iota;", "\u{0399}"),
    ("Kappa;", "\u{039A}"),
    ("Lambda;", "\u{039B}"),
    ("Mu;", "\u{039C}"),
    ("Nu;", "\u{039D}"),
    ("Xi;", "\u{039E}"),
    ("Omicron;", "\u{039F}"),
    ("Pi;", "\u{03A0}"),
    ("Rho;", "\u{03A1}"),
    ("Sigma;", "\u{03A3}"),
    ("Tau;", "\u{03A4}"),
    ("Upsilon;", "\u{03A5}"),
    ("Phi;", "\u{03A6}"),
    ("Chi;", "\u{03A7}"),
    ("Psi;", "\u{03A8}"),
    ("Omega;", "\u{03A9}"),
    ("alpha;", "\u{03B1}"),
    ("beta;", "\u{03B2}"),
    ("gamma;", "\u{03B3}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("zeta;", "\u{03B6}"),
    ("eta;", "\u{03B7}"),
    ("theta;", "\u{03B8}"),
    ("iota;", "\u{03B9}"),
    ("kappa;", "\u{03BA}"),
    ("lambda;", "\u{03BB}"),
    ("mu;", "\u{03BC}"),
    ("nu;", "\u{03BD}"),
    ("xi;", "\u{03BE}"),
    ("omicron;", "\u{03BF}"),
    ("pi;", "\u{03C0}"),
    ("rho;", "\u{03C1}"),
    ("sigmaf;", "\u{03C2}"),
    ("sigma;", "\u{03C3}"),
    ("tau;", "\u{03C4}"),
    ("upsilon;", "\u{03C5}"),
    ("phi;", "\u{03C6}"),
    ("chi;", "\u{03C7}"),
    ("psi;", "\u{03C8}"),
    ("omega;", "\u{03C9}"),
    ("thetasym;", "\u{03D1}"),
    ("upsih;", "\u{03D2}"),
    ("piv;", "\u{03D6}"),
    ("fjlig;", "fj"),
];

/// Entity name (without the leading `&`) to replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for (offset, name) in (0u32..).zip(LATIN1) {
        let Some(c) = char::from_u32(0xA0 + offset) else {
            continue;
        };
        let replacement: &'static str = String::from(c).leak();
        let with_semicolon: &'static str = format!("{name};").leak();
        let _ = table.insert(name, replacement);
        let _ = table.insert(with_semicolon, replacement);
    }
    for (name, replacement) in LEGACY {
        let with_semicolon: &'static str = format!("{name};").leak();
        let _ = table.insert(name, replacement);
        let _ = table.insert(with_semicolon, replacement);
    }
    for &(name, replacement) in WITH_SEMICOLON {
        let _ = table.insert(name, replacement);
    }
    table
});

/// Length in characters of the longest entity name.
static LONGEST_NAME: LazyLock<usize> =
    LazyLock::new(|| NAMED_ENTITIES.keys().map(|k| k.len()).max().unwrap_or(0));

/// Look up a named character reference.
///
/// The `name` should NOT include the leading '&'.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Find the longest entity name that `input` starts with.
///
/// Returns the matched name (as stored in the table) and its replacement.
#[must_use]
pub fn longest_match(input: &[char]) -> Option<(&'static str, &'static str)> {
    let limit = input.len().min(*LONGEST_NAME);
    let mut candidate = String::with_capacity(limit);
    let mut best = None;
    for &c in &input[..limit] {
        if !c.is_ascii_alphanumeric() && c != ';' {
            break;
        }
        candidate.push(c);
        if let Some((&name, &replacement)) = NAMED_ENTITIES.get_key_value(candidate.as_str()) {
            best = Some((name, replacement));
        }
        if c == ';' {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_offsets() {
        assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
        assert_eq!(lookup_entity("times"), Some("\u{00D7}"));
        assert_eq!(lookup_entity("yuml;"), Some("\u{00FF}"));
    }

    #[test]
    fn test_longest_match_prefers_semicolon() {
        let input: Vec<char> = "notin;x".chars().collect();
        assert_eq!(longest_match(&input), Some(("notin;", "\u{2209}")));
        let input: Vec<char> = "notx".chars().collect();
        assert_eq!(longest_match(&input), Some(("not", "\u{00AC}")));
        let input: Vec<char> = "zzz;".chars().collect();
        assert_eq!(longest_match(&input), None);
    }
}
