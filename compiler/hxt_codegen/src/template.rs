//! Placeholder substitution for replacement text.
//!
//! A placeholder is a sigil followed by an identifier (`@args`,
//! `$mainClass`). Each use site passes its own fixed set of names; any other
//! sigil sequence is copied through untouched.

/// Substitutes `sigil`-prefixed placeholders in `text` with `values`.
///
/// The identifier after the sigil is read greedily (`[A-Za-z0-9_]*`) and
/// must match a name exactly; unknown names stay verbatim.
pub fn substitute(text: &str, sigil: char, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(sigil) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + sigil.len_utf8()..];
        let ident_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let ident = &after[..ident_len];
        match values.iter().find(|(name, _)| *name == ident) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push(sigil);
                out.push_str(ident);
            }
        }
        rest = &after[ident_len..];
    }
    out.push_str(rest);
    out
}
