use super::Field;

/// Values extracted from the head of a `PKGBUILD`, one slot per [`Field`].
///
/// Values are stored exactly as captured; use [`version`](Self::version) and
/// [`description`](Self::description) for the derived forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pkgver: Option<String>,
    pkgrel: Option<String>,
    epoch: Option<String>,
    pkgdesc: Option<String>,
}
impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Pkgver => &mut self.pkgver,
            Field::Pkgrel => &mut self.pkgrel,
            Field::Epoch => &mut self.epoch,
            Field::Pkgdesc => &mut self.pkgdesc,
        }
    }

    /// Raw captured value for a field.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Pkgver => self.pkgver.as_deref(),
            Field::Pkgrel => self.pkgrel.as_deref(),
            Field::Epoch => self.epoch.as_deref(),
            Field::Pkgdesc => self.pkgdesc.as_deref(),
        }
    }

    /// Stores `value` unless the field already holds one. Returns `false` when
    /// the value was discarded.
    pub fn set_once(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set_once(field, value);
        self
    }

    /// Full version in `makepkg`'s `get_full_version` form.
    ///
    /// - `epoch:pkgver-pkgrel` when all three are present,
    /// - `pkgver-pkgrel` without an epoch,
    /// - `pkgver` on its own,
    /// - nothing otherwise; `pkgrel` or `epoch` alone never make a version.
    pub fn version(&self) -> Option<String> {
        match (&self.epoch, &self.pkgver, &self.pkgrel) {
            (Some(epoch), Some(pkgver), Some(pkgrel)) => Some(format!("{epoch}:{pkgver}-{pkgrel}")),
            (_, Some(pkgver), Some(pkgrel)) => Some(format!("{pkgver}-{pkgrel}")),
            (_, Some(pkgver), None) => Some(pkgver.clone()),
            _ => None,
        }
    }

    /// Description with the surrounding quote characters removed.
    ///
    /// Exactly one leading and one trailing character are dropped whatever they
    /// are, so unquoted values lose their first and last letters.
    pub fn description(&self) -> Option<String> {
        let raw = self.pkgdesc.as_deref()?;
        let mut chars = raw.chars();
        chars.next();
        chars.next_back();
        Some(chars.as_str().to_string())
    }
}
