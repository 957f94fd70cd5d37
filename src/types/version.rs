//! DXF file format versions

use std::fmt;

/// Version written to / read from the `$ACADVER` header variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DxfVersion {
    /// Unrecognised `$ACADVER` value
    Unknown,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// 2000
    #[default]
    AC1015,
    /// 2004
    AC1018,
    /// 2007
    AC1021,
    /// 2010
    AC1024,
    /// 2013
    AC1027,
    /// 2018
    AC1032,
}

impl DxfVersion {
    /// Parse an `$ACADVER` value
    pub fn from_version_string(value: &str) -> Self {
        match value.trim() {
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// The `$ACADVER` string
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::Unknown => "AC1015",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Whether text in files of this version is always UTF-8
    pub fn is_utf8(&self) -> bool {
        *self >= DxfVersion::AC1021
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
