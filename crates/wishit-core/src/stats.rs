//! Aggregate statistics derived from the fetched collections
//!
//! Everything here is a pure function of the records and of `today`, so the
//! loader can pass the current date and tests can pin it.

use crate::{
    types::{GiftList, Post, User},
    utils::{age_on, months_between, trailing_month_labels},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Number of trailing months in the activity series, current month included
pub const TRAILING_MONTHS: usize = 6;

/// Inclusive age ranges, checked in order; the first match wins
pub const AGE_RANGES: [AgeRange; 5] = [
    AgeRange::new("0-18", 0, Some(18)),
    AgeRange::new("19-25", 19, Some(25)),
    AgeRange::new("26-35", 26, Some(35)),
    AgeRange::new("36-50", 36, Some(50)),
    AgeRange::new("51+", 51, None),
];

/// One age bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    /// Display label
    pub label: &'static str,
    /// Lowest age included
    pub min: i32,
    /// Highest age included; `None` for open-ended
    pub max: Option<i32>,
}

impl AgeRange {
    const fn new(label: &'static str, min: i32, max: Option<i32>) -> Self {
        Self { label, min, max }
    }

    /// Whether `age` falls in this range
    #[must_use]
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }
}

/// Gender distribution of users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderTally {
    /// `sexe == "Homme"`
    pub men: usize,
    /// `sexe == "Femme"`
    pub women: usize,
    /// Missing or any other value
    pub unspecified: usize,
}

impl GenderTally {
    /// Share of men and women among users who declared a gender, in percent
    ///
    /// Both are zero when nobody declared one.
    #[must_use]
    pub fn specified_percentages(&self) -> [f64; 2] {
        let specified = self.men + self.women;
        if specified == 0 {
            return [0.0, 0.0];
        }
        #[allow(clippy::cast_precision_loss)]
        let share = |count: usize| (count as f64 / specified as f64) * 100.0;
        [share(self.men), share(self.women)]
    }
}

/// Classify each user by `sexe` into exactly one bucket
#[must_use]
pub fn gender_tally(users: &[User]) -> GenderTally {
    users
        .iter()
        .fold(GenderTally::default(), |mut tally, user| {
            match user.sexe.as_deref() {
                Some("Homme") => tally.men += 1,
                Some("Femme") => tally.women += 1,
                _ => tally.unspecified += 1,
            }
            tally
        })
}

/// Index into [`AGE_RANGES`] for an age, if any range contains it
#[must_use]
pub fn age_bucket(age: i32) -> Option<usize> {
    AGE_RANGES.iter().position(|range| range.contains(age))
}

/// Count users with a birth date into [`AGE_RANGES`]
///
/// Users without a birth date, or born after `today`, are not counted.
#[must_use]
pub fn age_tally(users: &[User], today: NaiveDate) -> [usize; AGE_RANGES.len()] {
    let mut tally = [0; AGE_RANGES.len()];
    let buckets = users
        .iter()
        .filter_map(|user| user.birth_date)
        .filter_map(|birth| age_bucket(age_on(birth, today)));
    for bucket in buckets {
        if let Some(count) = tally.get_mut(bucket) {
            *count += 1;
        }
    }
    tally
}

/// Bucket creation timestamps into the trailing months
///
/// Slot 0 is five months ago, slot 5 the current month; anything older or in
/// the future is ignored.
#[must_use]
pub fn monthly_series<'a, I>(timestamps: I, today: NaiveDate) -> [usize; TRAILING_MONTHS]
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
{
    let mut series = [0; TRAILING_MONTHS];
    let last = TRAILING_MONTHS - 1;
    for timestamp in timestamps {
        let diff = months_between(timestamp.date_naive(), today);
        let Ok(diff) = usize::try_from(diff) else {
            continue;
        };
        if let Some(count) = last.checked_sub(diff).and_then(|slot| series.get_mut(slot)) {
            *count += 1;
        }
    }
    series
}

/// Every aggregate the statistics screens display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    /// Number of users
    pub user_count: usize,
    /// Number of posts
    pub post_count: usize,
    /// Number of gift lists
    pub gift_count: usize,
    /// Gender distribution
    pub gender: GenderTally,
    /// Users per [`AGE_RANGES`] bucket
    pub age_buckets: [usize; AGE_RANGES.len()],
    /// Posts per trailing month, oldest first
    pub monthly_posts: [usize; TRAILING_MONTHS],
    /// Gift lists per trailing month, oldest first
    pub monthly_gifts: [usize; TRAILING_MONTHS],
    /// Labels of the trailing months, oldest first
    pub month_labels: [&'static str; TRAILING_MONTHS],
}

impl Aggregates {
    /// Derive all aggregates as of `today`
    #[must_use]
    pub fn compute(users: &[User], posts: &[Post], gifts: &[GiftList], today: NaiveDate) -> Self {
        Self {
            user_count: users.len(),
            post_count: posts.len(),
            gift_count: gifts.len(),
            gender: gender_tally(users),
            age_buckets: age_tally(users, today),
            monthly_posts: monthly_series(posts.iter().filter_map(|p| p.created_at.as_ref()), today),
            monthly_gifts: monthly_series(gifts.iter().filter_map(|g| g.created_at.as_ref()), today),
            month_labels: trailing_month_labels::<TRAILING_MONTHS>(today),
        }
    }

    /// Chart-ready datasets for the statistics screen
    #[must_use]
    pub fn charts(&self) -> ChartSet {
        ChartSet {
            content: Chart {
                labels: vec!["Cadeaux", "Publications", "Utilisateurs"],
                datasets: vec![Dataset::counts(
                    "Éléments",
                    &[self.gift_count, self.post_count, self.user_count],
                )],
            },
            monthly: Chart {
                labels: self.month_labels.to_vec(),
                datasets: vec![
                    Dataset::counts("Cadeaux", &self.monthly_gifts),
                    Dataset::counts("Publications", &self.monthly_posts),
                ],
            },
            gender: Chart {
                labels: vec!["Hommes", "Femmes", "Non spécifié"],
                datasets: vec![Dataset::counts(
                    "Utilisateurs",
                    &[self.gender.men, self.gender.women, self.gender.unspecified],
                )],
            },
            gender_percent: Chart {
                labels: vec!["Hommes", "Femmes"],
                datasets: vec![Dataset {
                    label: "Pourcentage",
                    data: self.gender.specified_percentages().to_vec(),
                }],
            },
            age: Chart {
                labels: AGE_RANGES.iter().map(|range| range.label).collect(),
                datasets: vec![Dataset::counts("Utilisateurs", &self.age_buckets)],
            },
        }
    }
}

/// A labelled chart with one or more series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Category labels
    pub labels: Vec<&'static str>,
    /// Series, each aligned with `labels`
    pub datasets: Vec<Dataset>,
}

/// One chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Series name
    pub label: &'static str,
    /// Values aligned with the chart labels
    pub data: Vec<f64>,
}

impl Dataset {
    #[allow(clippy::cast_precision_loss)]
    fn counts(label: &'static str, counts: &[usize]) -> Self {
        Self {
            label,
            data: counts.iter().map(|&count| count as f64).collect(),
        }
    }
}

/// All charts of the statistics screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    /// Gift lists, posts and users side by side
    pub content: Chart,
    /// Gift lists and posts per trailing month
    pub monthly: Chart,
    /// Users by gender
    pub gender: Chart,
    /// Men and women as a share of declared genders
    pub gender_percent: Chart,
    /// Users by age range
    pub age: Chart,
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn user(value: serde_json::Value) -> User {
        let mut value = value;
        value["_id"] = json!("u");
        serde_json::from_value(value).unwrap()
    }

    fn months_ago(n: u32) -> DateTime<Utc> {
        let base = today();
        let total = base.year() * 12 + i32::try_from(base.month0()).unwrap() - i32::try_from(n).unwrap();
        Utc.with_ymd_and_hms(total.div_euclid(12), u32::try_from(total.rem_euclid(12)).unwrap() + 1, 15, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_gender_tally() {
        let users = vec![
            user(json!({"sexe": "Homme"})),
            user(json!({"sexe": "Femme"})),
            user(json!({"sexe": "Femme"})),
            user(json!({})),
        ];

        assert_eq!(
            gender_tally(&users),
            GenderTally {
                men: 1,
                women: 2,
                unspecified: 1
            }
        );
    }

    #[test]
    fn test_unknown_gender_value_is_unspecified() {
        let users = vec![user(json!({"sexe": "homme"})), user(json!({"sexe": null}))];
        assert_eq!(gender_tally(&users).unspecified, 2);
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(18, Some(0))]
    #[case(19, Some(1))]
    #[case(25, Some(1))]
    #[case(26, Some(2))]
    #[case(35, Some(2))]
    #[case(36, Some(3))]
    #[case(50, Some(3))]
    #[case(51, Some(4))]
    #[case(104, Some(4))]
    #[case(-1, None)]
    fn test_age_bucket_edges(#[case] age: i32, #[case] expected: Option<usize>) {
        assert_eq!(age_bucket(age), expected);
    }

    #[test]
    fn test_age_tally_uses_completed_birthdays() {
        let users = vec![
            // 25 years and one day
            user(json!({"dateDeNaiss": "2001-10-17"})),
            // turns 26 tomorrow, still 25
            user(json!({"dateDeNaiss": "2000-10-19"})),
            // 26 today
            user(json!({"dateDeNaiss": "2000-10-18T00:00:00.000Z"})),
            user(json!({"dateDeNaiss": "1960-01-01"})),
            user(json!({})),
            user(json!({"dateDeNaiss": "2030-01-01"})),
        ];

        assert_eq!(age_tally(&users, today()), [0, 2, 1, 0, 1]);
    }

    #[test]
    fn test_monthly_series_drops_out_of_window() {
        let stamps: Vec<_> = [0, 1, 5, 6, 7].into_iter().map(months_ago).collect();

        assert_eq!(monthly_series(&stamps, today()), [1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_monthly_series_ignores_future() {
        let next_month = Utc.with_ymd_and_hms(2026, 11, 2, 0, 0, 0).unwrap();
        assert_eq!(monthly_series([&next_month], today()), [0; TRAILING_MONTHS]);
    }

    #[test]
    fn test_aggregates_and_charts() {
        let users = vec![user(json!({"sexe": "Homme"})), user(json!({"sexe": "Femme"}))];
        let posts: Vec<Post> = serde_json::from_value(json!([
            {"_id": "p1", "createdAt": months_ago(0).to_rfc3339()},
            {"_id": "p2"}
        ]))
        .unwrap();
        let gifts: Vec<GiftList> = serde_json::from_value(json!([
            {"_id": "g1", "createdAt": months_ago(2).to_rfc3339()},
            {"_id": "g2", "createdAt": months_ago(2).to_rfc3339()},
            {"_id": "g3", "createdAt": months_ago(9).to_rfc3339()}
        ]))
        .unwrap();

        let aggregates = Aggregates::compute(&users, &posts, &gifts, today());

        assert_eq!(aggregates.user_count, 2);
        assert_eq!(aggregates.post_count, 2);
        assert_eq!(aggregates.gift_count, 3);
        assert_eq!(aggregates.monthly_posts, [0, 0, 0, 0, 0, 1]);
        assert_eq!(aggregates.monthly_gifts, [0, 0, 0, 2, 0, 0]);
        assert_eq!(aggregates.month_labels, ["Mai", "Juin", "Juil", "Août", "Sep", "Oct"]);

        let charts = aggregates.charts();
        assert_eq!(charts.content.labels, ["Cadeaux", "Publications", "Utilisateurs"]);
        assert_eq!(charts.content.datasets[0].data, [3.0, 2.0, 2.0]);
        assert_eq!(charts.monthly.datasets[0].label, "Cadeaux");
        assert_eq!(charts.gender_percent.datasets[0].data, [50.0, 50.0]);
        assert_eq!(charts.age.labels.len(), AGE_RANGES.len());
    }

    #[test]
    fn test_gender_percentages_without_declarations() {
        assert_eq!(GenderTally::default().specified_percentages(), [0.0, 0.0]);
        let tally = GenderTally {
            men: 5,
            women: 3,
            unspecified: 1,
        };
        assert_eq!(tally.specified_percentages(), [62.5, 37.5]);
    }
}
