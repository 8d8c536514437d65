use serde::{Deserialize, Serialize};

/// Required work experience, from the `experience_id` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Experience {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
    /// Code outside the known set; kept verbatim for display.
    Other(String),
}

impl Experience {
    pub fn from_code(code: &str) -> Self {
        match code {
            "noExperience" => Experience::NoExperience,
            "between1And3" => Experience::Between1And3,
            "between3And6" => Experience::Between3And6,
            "moreThan6" => Experience::MoreThan6,
            other => Experience::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Experience::NoExperience => "noExperience",
            Experience::Between1And3 => "between1And3",
            Experience::Between3And6 => "between3And6",
            Experience::MoreThan6 => "moreThan6",
            Experience::Other(code) => code,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Experience::NoExperience => "Нет опыта",
            Experience::Between1And3 => "От 1 года до 3 лет",
            Experience::Between3And6 => "От 3 до 6 лет",
            Experience::MoreThan6 => "Более 6 лет",
            Experience::Other(code) => code,
        }
    }

    /// Position in the natural "least to most" ordering used for sorting.
    pub fn ordinal(&self) -> u8 {
        match self {
            Experience::NoExperience => 0,
            Experience::Between1And3 => 1,
            Experience::Between3And6 => 2,
            Experience::MoreThan6 => 3,
            Experience::Other(_) => 4,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.code() == text || self.display_name() == text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Experience::from_code("between3And6"), Experience::Between3And6);
        assert_eq!(Experience::from_code("moreThan6").display_name(), "Более 6 лет");
    }

    #[test]
    fn test_unknown_code_is_kept() {
        let exp = Experience::from_code("someday");
        assert_eq!(exp, Experience::Other("someday".to_string()));
        assert_eq!(exp.code(), "someday");
        assert_eq!(exp.ordinal(), 4);
    }

    #[test]
    fn test_ordinals_ascend() {
        let ordered = [
            Experience::NoExperience,
            Experience::Between1And3,
            Experience::Between3And6,
            Experience::MoreThan6,
        ];
        assert!(ordered.windows(2).all(|w| w[0].ordinal() < w[1].ordinal()));
    }
}
