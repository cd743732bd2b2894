//! DOCTYPE-driven document mode selection.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use larch_dom::QuirksMode;

/// Public identifiers that put the document in quirks mode when equal.
const QUIRKS_PUBLIC_ID_EQ: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// System identifiers that put the document in quirks mode when equal.
const QUIRKS_SYSTEM_ID_EQ: &[&str] = &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

/// Public identifier prefixes that put the document in quirks mode.
const QUIRKS_PUBLIC_ID_PREFIX: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// HTML 4.01 frameset/transitional: quirks without a system identifier,
/// limited quirks with one.
const HTML401_PUBLIC_ID_PREFIX: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// Public identifier prefixes that put the document in limited-quirks mode.
const LIMITED_QUIRKS_PUBLIC_ID_PREFIX: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

fn has_prefix(id: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| id.starts_with(prefix))
}

/// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// Mode selected by a DOCTYPE token in a document that is not an `iframe`
/// `srcdoc` document. Identifier comparisons are ASCII case-insensitive.
#[must_use]
pub fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    // "The force-quirks flag is set to on. The name is not "html"."
    if force_quirks || name != Some("html") {
        return QuirksMode::Quirks;
    }
    let public_id = public_id.map(str::to_ascii_lowercase);
    let system_id = system_id.map(str::to_ascii_lowercase);

    if let Some(public_id) = public_id.as_deref() {
        if QUIRKS_PUBLIC_ID_EQ.contains(&public_id) || has_prefix(public_id, QUIRKS_PUBLIC_ID_PREFIX) {
            return QuirksMode::Quirks;
        }
        if has_prefix(public_id, HTML401_PUBLIC_ID_PREFIX) {
            return if system_id.is_none() {
                QuirksMode::Quirks
            } else {
                QuirksMode::LimitedQuirks
            };
        }
    }
    if let Some(system_id) = system_id.as_deref()
        && QUIRKS_SYSTEM_ID_EQ.contains(&system_id)
    {
        return QuirksMode::Quirks;
    }
    if let Some(public_id) = public_id.as_deref()
        && has_prefix(public_id, LIMITED_QUIRKS_PUBLIC_ID_PREFIX)
    {
        return QuirksMode::LimitedQuirks;
    }
    QuirksMode::NoQuirks
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
#[must_use]
pub fn is_doctype_error(name: Option<&str>, public_id: Option<&str>, system_id: Option<&str>) -> bool {
    name != Some("html") || public_id.is_some() || system_id.is_some_and(|id| id != "about:legacy-compat")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        assert_eq!(quirks_mode_for_doctype(Some("html"), None, None, false), QuirksMode::NoQuirks);
        assert!(!is_doctype_error(Some("html"), None, Some("about:legacy-compat")));
    }

    #[test]
    fn test_missing_or_forced() {
        assert_eq!(quirks_mode_for_doctype(None, None, None, false), QuirksMode::Quirks);
        assert_eq!(quirks_mode_for_doctype(Some("html"), None, None, true), QuirksMode::Quirks);
        assert_eq!(quirks_mode_for_doctype(Some("svg"), None, None, false), QuirksMode::Quirks);
    }

    #[test]
    fn test_public_identifier_tables() {
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD HTML 4.0 Transitional//EN"), None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
                Some("http://www.w3.org/TR/html4/loose.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD XHTML 1.0 Strict//EN"), None, false),
            QuirksMode::NoQuirks
        );
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None, false),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_system_identifier_table() {
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                None,
                Some("http://www.IBM.com/data/dtd/v11/ibmxhtml1-transitional.dtd"),
                false
            ),
            QuirksMode::Quirks
        );
    }
}
