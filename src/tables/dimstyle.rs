//! Dimension style table entry

use super::TableEntry;

/// A dimension style table entry, limited to the variables linear
/// dimensions use
#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    /// Style name
    pub name: String,
    /// Overall scale (DIMSCALE, code 40)
    pub dimscale: f64,
    /// Arrow size (DIMASZ, code 41)
    pub dimasz: f64,
    /// Extension line offset (DIMEXO, code 42)
    pub dimexo: f64,
    /// Extension line extension (DIMEXE, code 44)
    pub dimexe: f64,
    /// Text height (DIMTXT, code 140)
    pub dimtxt: f64,
    /// Dimension line gap (DIMGAP, code 147)
    pub dimgap: f64,
    /// Dimension line colour (DIMCLRD, code 176)
    pub dimclrd: i16,
    /// Extension line colour (DIMCLRE, code 177)
    pub dimclre: i16,
    /// Dimension text colour (DIMCLRT, code 178)
    pub dimclrt: i16,
    /// Decimal places (DIMDEC, code 271)
    pub dimdec: i16,
}

impl DimStyle {
    /// Create a new dimension style with the standard values
    pub fn new(name: impl Into<String>) -> Self {
        DimStyle {
            name: name.into(),
            dimscale: 1.0,
            dimasz: 0.18,
            dimexo: 0.0625,
            dimexe: 0.18,
            dimtxt: 0.18,
            dimgap: 0.09,
            dimclrd: 0,
            dimclre: 0,
            dimclrt: 0,
            dimdec: 4,
        }
    }

    /// Create the standard "Standard" dimension style
    pub fn standard() -> Self {
        Self::new("Standard")
    }
}

impl TableEntry for DimStyle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_standard(&self) -> bool {
        self.name.eq_ignore_ascii_case("Standard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimstyle_standard() {
        let style = DimStyle::standard();
        assert!(style.is_standard());
        assert_eq!(style.dimscale, 1.0);
        assert_eq!(style.dimdec, 4);
    }
}
