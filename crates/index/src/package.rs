use rpkg_recipe::models::Fields;
use serde::{Deserialize, Serialize};

/// Placeholder vote count reported for every package.
pub const NUM_VOTES: u32 = 42;

/// One indexed package: a directory in an overlay with a readable `PKGBUILD`.
///
/// Only `description` and `version` are ever known (they come from the
/// recipe); the remaining optional fields exist so the protocol projection
/// has somewhere to read from and are reported as placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package directory name, unique within the overlay.
    pub name: String,
    /// Name of the overlay the package was indexed from.
    pub overlay: String,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Full `[epoch:]pkgver[-pkgrel]` version.
    pub version: Option<String>,
    pub license: Option<String>,
    pub id: Option<String>,
    pub last_modified: Option<String>,
    pub maintainer: Option<String>,
    pub category_id: Option<u32>,
}
impl Package {
    pub fn new(name: impl Into<String>, overlay: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overlay: overlay.into(),
            url: None,
            description: None,
            version: None,
            license: None,
            id: None,
            last_modified: None,
            maintainer: None,
            category_id: None,
        }
    }

    pub fn from_fields(name: impl Into<String>, overlay: impl Into<String>, fields: &Fields) -> Self {
        Self {
            description: fields.description(),
            version: fields.version(),
            ..Self::new(name, overlay)
        }
    }

    /// Path, relative to the overlay's RPC base, that clients download the
    /// package from. The file name is only cosmetic; the archive endpoint
    /// ignores it.
    pub fn url_path(&self) -> String {
        format!("/packages/{}/source.tar.gz", self.name)
    }

    /// Case-insensitive substring match against the name, or the description
    /// when there is one.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.as_ref().is_some_and(|d| d.to_lowercase().contains(&query))
    }

    /// AUR RPC representation of this package.
    ///
    /// Unknown values are filled with placeholder tokens rather than omitted
    /// or `null`, which older AUR helpers choke on.
    pub fn to_protocol(&self, url_path: impl Into<String>) -> ProtocolRecord {
        fn or(value: &Option<String>, placeholder: &str) -> String {
            value.as_deref().filter(|v| !v.is_empty()).unwrap_or(placeholder).to_string()
        }
        ProtocolRecord {
            name: self.name.clone(),
            url_path: url_path.into(),
            url: or(&self.url, "none"),
            description: or(&self.description, "@desc"),
            version: or(&self.version, "@version"),
            first_submitted: "@FirstSubmitted".to_string(),
            license: or(&self.license, "@license"),
            id: or(&self.id, "@id"),
            out_of_date: 0,
            last_modified: or(&self.last_modified, "@lastmodified"),
            maintainer: or(&self.maintainer, "@maintainer"),
            category_id: self.category_id.unwrap_or(0),
            num_votes: NUM_VOTES,
        }
    }
}

/// A package as it appears in the `results` of an RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URLPath")]
    pub url_path: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "FirstSubmitted")]
    pub first_submitted: String,
    #[serde(rename = "License")]
    pub license: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "OutOfDate")]
    pub out_of_date: u32,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
    #[serde(rename = "Maintainer")]
    pub maintainer: String,
    #[serde(rename = "CategoryID")]
    pub category_id: u32,
    #[serde(rename = "NumVotes")]
    pub num_votes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpkg_recipe::models::Field;
    use rstest::rstest;
    use serde_json::json;

    fn cups_xerox() -> Package {
        let fields = Fields::new()
            .with(Field::Pkgver, "1.2.3")
            .with(Field::Pkgrel, "4")
            .with(Field::Pkgdesc, "\"Xerox printer drivers\"");
        Package::from_fields("cups-xerox", "main", &fields)
    }

    #[test]
    fn test_from_fields() {
        let package = cups_xerox();
        assert_eq!(package.version.as_deref(), Some("1.2.3-4"));
        assert_eq!(package.description.as_deref(), Some("Xerox printer drivers"));
        assert_eq!(package.overlay, "main");
        assert_eq!(package.license, None);
    }

    #[rstest]
    #[case("CUPS", true)]
    #[case("cups", true)]
    #[case("XeRoX", true)]
    #[case("printer", true)]
    #[case("", true)]
    #[case("canon", false)]
    fn test_matches(#[case] query: &str, #[case] expected: bool) {
        assert_eq!(cups_xerox().matches(query), expected);
    }

    #[test]
    fn test_matches_without_description() {
        let foo = Package::new("foo", "main");
        assert!(!foo.matches("cups"));
        assert!(foo.matches("FO"));
    }

    #[test]
    fn test_protocol_shape() {
        let package = cups_xerox();
        let value = serde_json::to_value(package.to_protocol(package.url_path())).unwrap();
        assert_eq!(
            value,
            json!({
                "Name": "cups-xerox",
                "URLPath": "/packages/cups-xerox/source.tar.gz",
                "URL": "none",
                "Description": "Xerox printer drivers",
                "Version": "1.2.3-4",
                "FirstSubmitted": "@FirstSubmitted",
                "License": "@license",
                "ID": "@id",
                "OutOfDate": 0,
                "LastModified": "@lastmodified",
                "Maintainer": "@maintainer",
                "CategoryID": 0,
                "NumVotes": 42,
            })
        );
    }

    #[test]
    fn test_protocol_placeholders() {
        let record = Package::new("bare", "main").to_protocol("/x");
        assert_eq!(record.description, "@desc");
        assert_eq!(record.version, "@version");
        assert_eq!(record.url_path, "/x");
        // An empty description (`pkgdesc=""`) is reported as unknown.
        let fields = Fields::new().with(Field::Pkgdesc, "\"\"");
        let record = Package::from_fields("empty", "main", &fields).to_protocol("/x");
        assert_eq!(record.description, "@desc");
    }

    #[test]
    fn test_protocol_known_values() {
        let package = Package {
            url: Some("https://example.org".to_string()),
            license: Some("MIT".to_string()),
            id: Some("1123".to_string()),
            last_modified: Some("1400000000".to_string()),
            maintainer: Some("someone".to_string()),
            category_id: Some(7),
            ..Package::new("full", "main")
        };
        let record = package.to_protocol(package.url_path());
        assert_eq!(record.url, "https://example.org");
        assert_eq!(record.license, "MIT");
        assert_eq!(record.id, "1123");
        assert_eq!(record.last_modified, "1400000000");
        assert_eq!(record.maintainer, "someone");
        assert_eq!(record.category_id, 7);
        assert_eq!(record.out_of_date, 0);
        assert_eq!(record.num_votes, NUM_VOTES);
    }
}
