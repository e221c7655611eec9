//! Year/semester slot

use std::fmt;
use std::str::FromStr;

/// A (year, semester) pairing, ordered by year then semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    /// School year
    pub year: u8,
    /// Semester within the year
    pub semester: u8,
}

impl Slot {
    /// Create a new slot
    #[must_use]
    pub const fn new(year: u8, semester: u8) -> Self {
        Self { year, semester }
    }

    /// Configuration key in the form `Y{year}S{semester}` (e.g., "Y2S1")
    #[must_use]
    pub fn key(&self) -> String {
        format!("Y{}S{}", self.year, self.semester)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} semester {}", self.year, self.semester)
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid slot key: '{s}' (expected e.g. Y2S1)");
        let upper = s.trim().to_ascii_uppercase();
        let rest = upper.strip_prefix('Y').ok_or_else(invalid)?;
        let (year, semester) = rest.split_once('S').ok_or_else(invalid)?;
        let year = year.parse::<u8>().map_err(|_| invalid())?;
        let semester = semester.parse::<u8>().map_err(|_| invalid())?;
        Ok(Self::new(year, semester))
    }
}
