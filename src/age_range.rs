// 🗓️ Age Range Resolver
// Maps (indicator, age in months) to the catalog bracket key

use crate::indicators::{AgeRange, Indicator};

/// Resolve the catalog age bracket for an indicator.
///
/// Total over all ages, negative ones included. Brackets follow how WHO
/// partitions each standard:
/// - weight-for-height has no 0-13-weeks table
/// - head circumference switches at 13 months, inclusive
pub fn resolve(indicator: Indicator, age_months: i32) -> AgeRange {
    match indicator {
        Indicator::WeightForAge => {
            if age_months < 3 {
                AgeRange::ZeroToThirteenWeeks
            } else {
                AgeRange::ZeroToFiveYears
            }
        }
        Indicator::HeightForAge | Indicator::BmiForAge => {
            if age_months < 3 {
                AgeRange::ZeroToThirteenWeeks
            } else if age_months < 24 {
                AgeRange::ZeroToTwoYears
            } else {
                AgeRange::TwoToFiveYears
            }
        }
        Indicator::WeightForHeight => {
            if age_months < 24 {
                AgeRange::ZeroToTwoYears
            } else {
                AgeRange::TwoToFiveYears
            }
        }
        Indicator::HeadCircumferenceForAge => {
            if age_months <= 13 {
                AgeRange::ZeroToThirteenMonths
            } else {
                AgeRange::ZeroToFiveYears
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newborn_bracket_for_age_based_indicators() {
        for indicator in [Indicator::WeightForAge, Indicator::HeightForAge, Indicator::BmiForAge] {
            assert_eq!(resolve(indicator, 0), AgeRange::ZeroToThirteenWeeks);
            assert_eq!(resolve(indicator, 2), AgeRange::ZeroToThirteenWeeks);
        }
    }

    #[test]
    fn test_step_at_three_months() {
        assert_eq!(resolve(Indicator::WeightForAge, 3), AgeRange::ZeroToFiveYears);
        assert_eq!(resolve(Indicator::HeightForAge, 3), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::BmiForAge, 3), AgeRange::ZeroToTwoYears);
    }

    #[test]
    fn test_step_at_two_years() {
        assert_eq!(resolve(Indicator::HeightForAge, 23), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::BmiForAge, 23), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::WeightForAge, 23), AgeRange::ZeroToFiveYears);

        assert_eq!(resolve(Indicator::HeightForAge, 24), AgeRange::TwoToFiveYears);
        assert_eq!(resolve(Indicator::BmiForAge, 24), AgeRange::TwoToFiveYears);
        assert_eq!(resolve(Indicator::WeightForAge, 24), AgeRange::ZeroToFiveYears);
    }

    #[test]
    fn test_weight_for_height_skips_weeks_bracket() {
        assert_eq!(resolve(Indicator::WeightForHeight, 0), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::WeightForHeight, 2), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::WeightForHeight, 23), AgeRange::ZeroToTwoYears);
        assert_eq!(resolve(Indicator::WeightForHeight, 24), AgeRange::TwoToFiveYears);
    }

    #[test]
    fn test_head_circumference_inclusive_at_thirteen() {
        assert_eq!(resolve(Indicator::HeadCircumferenceForAge, 0), AgeRange::ZeroToThirteenMonths);
        assert_eq!(resolve(Indicator::HeadCircumferenceForAge, 13), AgeRange::ZeroToThirteenMonths);
        assert_eq!(resolve(Indicator::HeadCircumferenceForAge, 14), AgeRange::ZeroToFiveYears);
    }

    #[test]
    fn test_negative_age_is_total() {
        assert_eq!(resolve(Indicator::HeightForAge, -1), AgeRange::ZeroToThirteenWeeks);
        assert_eq!(resolve(Indicator::HeadCircumferenceForAge, -5), AgeRange::ZeroToThirteenMonths);
    }
}
