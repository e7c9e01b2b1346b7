/// Account age bucket used by the demographic breakdown.
///
/// Upper bounds are inclusive: 30, 90 and 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountAgeSegment {
    New,
    Active,
    Established,
    LongTerm,
}

impl AccountAgeSegment {
    pub fn from_age_days(days: i64) -> Self {
        match days {
            d if d <= 30 => AccountAgeSegment::New,
            d if d <= 90 => AccountAgeSegment::Active,
            d if d <= 365 => AccountAgeSegment::Established,
            _ => AccountAgeSegment::LongTerm,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountAgeSegment::New => "New (< 30 days)",
            AccountAgeSegment::Active => "Active (1-3 months)",
            AccountAgeSegment::Established => "Established (3-12 months)",
            AccountAgeSegment::LongTerm => "Long-term (> 1 year)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(AccountAgeSegment::from_age_days(0), AccountAgeSegment::New);
        assert_eq!(AccountAgeSegment::from_age_days(30), AccountAgeSegment::New);
        assert_eq!(AccountAgeSegment::from_age_days(31), AccountAgeSegment::Active);
        assert_eq!(AccountAgeSegment::from_age_days(90), AccountAgeSegment::Active);
        assert_eq!(
            AccountAgeSegment::from_age_days(91),
            AccountAgeSegment::Established
        );
        assert_eq!(
            AccountAgeSegment::from_age_days(365),
            AccountAgeSegment::Established
        );
        assert_eq!(
            AccountAgeSegment::from_age_days(366),
            AccountAgeSegment::LongTerm
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(AccountAgeSegment::New.label(), "New (< 30 days)");
        assert_eq!(AccountAgeSegment::LongTerm.label(), "Long-term (> 1 year)");
    }
}
