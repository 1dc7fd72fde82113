use std::fmt::{Display, Formatter, Result as FmtResult};

use regex::Regex;

use crate::consts;

/// A `PKGBUILD` declaration recognised by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Upstream version string (`pkgver=`)
    Pkgver,
    /// Package release number (`pkgrel=`)
    Pkgrel,
    /// Version epoch (`epoch=`)
    Epoch,
    /// Quoted one-line description (`pkgdesc=`)
    Pkgdesc,
}
impl Field {
    /// All recognised fields, in the order they are matched against a line.
    pub const ALL: [Field; 4] = [Field::Pkgver, Field::Pkgrel, Field::Epoch, Field::Pkgdesc];

    /// Returns the variable name as written in the recipe.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Pkgver => "pkgver",
            Field::Pkgrel => "pkgrel",
            Field::Epoch => "epoch",
            Field::Pkgdesc => "pkgdesc",
        }
    }

    pub(crate) fn pattern(&self) -> &'static Regex {
        match self {
            Field::Pkgver => &consts::PKGVER_REGEX,
            Field::Pkgrel => &consts::PKGREL_REGEX,
            Field::Epoch => &consts::EPOCH_REGEX,
            Field::Pkgdesc => &consts::PKGDESC_REGEX,
        }
    }

    /// Returns the captured value if `line` declares this field.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern().captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
    }
}
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Field::Pkgver, "pkgver=1.2.3", Some("1.2.3"))]
    #[case(Field::Pkgver, "pkgver=r123.abcdef0", Some("r123.abcdef0"))]
    #[case(Field::Pkgver, "pkgver=1.2_beta", Some("1.2"))]
    #[case(Field::Pkgver, " pkgver=1.2.3", None)]
    #[case(Field::Pkgver, "PKGVER=1.2.3", None)]
    #[case(Field::Pkgver, "pkgver=", None)]
    #[case(Field::Pkgrel, "pkgrel=4", Some("4"))]
    #[case(Field::Pkgrel, "pkgrel=4.1", Some("4.1"))]
    #[case(Field::Epoch, "epoch=2", Some("2"))]
    #[case(Field::Epoch, "epoch=two", None)]
    #[case(Field::Pkgdesc, r#"pkgdesc="A printer driver""#, Some(r#""A printer driver""#))]
    #[case(Field::Pkgdesc, "pkgdesc=", None)]
    #[case(Field::Pkgdesc, "_pkgdesc='nope'", None)]
    fn test_capture(#[case] field: Field, #[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(field.capture(line), expected);
    }

    #[test]
    fn test_names_match_patterns() {
        for field in Field::ALL {
            assert_eq!(field.to_string(), field.as_str());
            assert!(field.capture(&format!("{field}=1")).is_some());
        }
    }
}
