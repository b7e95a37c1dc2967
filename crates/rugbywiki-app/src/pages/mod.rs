// Per-page orchestrators.
//
// Each page owns its filter criteria, its raw fetched collection, and the
// generation counter for its requests. Pages are synchronous: they return
// the `FetchRequest` to issue and accept the matching `FetchEvent` payload
// later, so the event loop decides how requests actually run.

pub mod fixtures;
pub mod stats;
pub mod teams;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use rugbywiki_core::model::{Fixture, League};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn fixture(id: i64, home: &str, away: &str, played: NaiveDate, league_id: i64) -> Fixture {
        Fixture {
            id,
            home: home.into(),
            away: away.into(),
            home_score: None,
            away_score: None,
            date_played: played.and_hms_opt(15, 0, 0).unwrap(),
            league_id,
            league_name: None,
        }
    }

    pub fn leagues() -> Vec<League> {
        vec![
            League {
                id: 1,
                name: "United Rugby Championship".into(),
            },
            League {
                id: 4,
                name: "Gallagher Premiership".into(),
            },
        ]
    }
}
