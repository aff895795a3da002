//! Daily aggregation, achievement evaluation and the streak/pet mapping.
//! Every cap and threshold the app uses lives in this module.

use serde::Serialize;
use time::Date;

/// Calorie total a day must reach to count as an achievement day.
pub const CALORIE_GOAL: f64 = 1000.0;
/// Display cap for the protein progress ring.
pub const PROTEIN_DISPLAY_CAP_G: f64 = 100.0;
/// Display cap for the fat progress ring.
pub const FAT_DISPLAY_CAP_G: f64 = 65.0;
/// Glasses of water tracked per day.
pub const WATER_GLASSES_MAX: i32 = 8;

/// Nutritional contribution of a single logged food entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Macros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Totals for one calendar day. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl DailyTotals {
    /// Clamp protein and fat to the display caps. Calories and carbs are
    /// never clamped. The underlying sums stay intact; this is what the
    /// progress rings show, not what the store holds.
    pub fn display(self) -> DailyTotals {
        DailyTotals {
            calories: self.calories,
            protein_g: self.protein_g.min(PROTEIN_DISPLAY_CAP_G),
            carbs_g: self.carbs_g,
            fat_g: self.fat_g.min(FAT_DISPLAY_CAP_G),
        }
    }

    pub fn meets_goal(&self) -> bool {
        self.calories >= CALORIE_GOAL
    }
}

/// Sum a day's entries across all meal slots. An empty day is all zeros.
pub fn daily_totals<I>(entries: I) -> DailyTotals
where
    I: IntoIterator<Item = Macros>,
{
    let mut totals = DailyTotals::default();
    for m in entries {
        totals.calories += m.calories;
        totals.protein_g += m.protein_g;
        totals.carbs_g += m.carbs_g;
        totals.fat_g += m.fat_g;
    }
    totals
}

/// Required change to the achievement list for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementChange {
    Add,
    Remove,
}

/// Decide whether a date's achievement membership must change given its
/// freshly recomputed totals. Returns `None` when membership already matches
/// the totals, so re-running on an unchanged day never toggles anything.
pub fn evaluate_achievement(totals: &DailyTotals, already_achieved: bool) -> Option<AchievementChange> {
    match (totals.meets_goal(), already_achieved) {
        (true, false) => Some(AchievementChange::Add),
        (false, true) => Some(AchievementChange::Remove),
        _ => None,
    }
}

/// Length of the consecutive-day run ending at the most recent achievement
/// day. Days may arrive in any order; duplicates cannot occur (the store
/// keys achievement days by date).
pub fn streak_length(days: &[Date]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let mut sorted: Vec<Date> = days.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 1;
    for pair in sorted.windows(2) {
        if (pair[0] - pair[1]).whole_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Map a streak length onto the four pet levels.
pub fn pet_level(streak: u32) -> u8 {
    match streak {
        0..=6 => 1,
        7..=13 => 2,
        14..=29 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn entry(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Macros {
        Macros {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    #[test]
    fn empty_day_sums_to_zero() {
        let totals = daily_totals(Vec::<Macros>::new());
        assert_eq!(totals, DailyTotals::default());
    }

    #[test]
    fn sums_are_exact_for_calories_and_carbs() {
        let totals = daily_totals([
            entry(250.0, 10.0, 30.0, 5.0),
            entry(400.0, 20.0, 55.5, 12.0),
            entry(120.0, 3.0, 14.5, 2.0),
        ]);
        assert_eq!(totals.calories, 770.0);
        assert_eq!(totals.carbs_g, 100.0);
        assert_eq!(totals.protein_g, 33.0);
        assert_eq!(totals.fat_g, 19.0);
    }

    #[test]
    fn display_clamps_protein_and_fat_only() {
        let totals = daily_totals([entry(1000.0, 150.0, 300.0, 70.0)]).display();
        assert_eq!(totals.calories, 1000.0);
        assert_eq!(totals.protein_g, 100.0);
        assert_eq!(totals.carbs_g, 300.0);
        assert_eq!(totals.fat_g, 65.0);
    }

    #[test]
    fn display_leaves_small_totals_alone() {
        let totals = daily_totals([entry(300.0, 40.0, 20.0, 10.0)]).display();
        assert_eq!(totals.protein_g, 40.0);
        assert_eq!(totals.fat_g, 10.0);
    }

    #[test]
    fn achievement_added_exactly_at_goal() {
        let totals = daily_totals([entry(1000.0, 0.0, 0.0, 0.0)]);
        assert_eq!(
            evaluate_achievement(&totals, false),
            Some(AchievementChange::Add)
        );
    }

    #[test]
    fn achievement_removed_when_total_drops_below_goal() {
        let totals = daily_totals([entry(999.0, 0.0, 0.0, 0.0)]);
        assert_eq!(
            evaluate_achievement(&totals, true),
            Some(AchievementChange::Remove)
        );
    }

    #[test]
    fn achievement_evaluation_is_idempotent() {
        let above = daily_totals([entry(1500.0, 0.0, 0.0, 0.0)]);
        let below = daily_totals([entry(200.0, 0.0, 0.0, 0.0)]);

        // Applying the decision leaves membership in a state where a second
        // evaluation asks for no further change.
        assert_eq!(evaluate_achievement(&above, true), None);
        assert_eq!(evaluate_achievement(&below, false), None);
    }

    #[test]
    fn streak_of_empty_list_is_zero() {
        assert_eq!(streak_length(&[]), 0);
    }

    #[test]
    fn streak_counts_consecutive_days_from_most_recent() {
        let days = [
            date!(2024 - 06 - 03),
            date!(2024 - 06 - 01),
            date!(2024 - 06 - 04),
            date!(2024 - 06 - 02),
        ];
        assert_eq!(streak_length(&days), 4);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let days = [
            date!(2024 - 06 - 10),
            date!(2024 - 06 - 09),
            date!(2024 - 06 - 06),
            date!(2024 - 06 - 05),
        ];
        assert_eq!(streak_length(&days), 2);
    }

    #[test]
    fn single_achievement_day_is_a_streak_of_one() {
        assert_eq!(streak_length(&[date!(2024 - 06 - 01)]), 1);
    }

    #[test]
    fn pet_level_breakpoints() {
        assert_eq!(pet_level(0), 1);
        assert_eq!(pet_level(6), 1);
        assert_eq!(pet_level(7), 2);
        assert_eq!(pet_level(13), 2);
        assert_eq!(pet_level(14), 3);
        assert_eq!(pet_level(29), 3);
        assert_eq!(pet_level(30), 4);
        assert_eq!(pet_level(45), 4);
    }

    #[test]
    fn pet_level_is_monotonic() {
        let mut prev = pet_level(0);
        for streak in 1..200 {
            let level = pet_level(streak);
            assert!(level >= prev);
            prev = level;
        }
    }
}
