//! Random development data.
//!
//! Generators take the RNG as a parameter so tests can use a seeded one.
//! The output is drafts only; the server inserts them in dependency order.

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::domain::{NewsDraft, PlayerDraft, TeamDraft};

const FIRST_NAMES: &[&str] = &[
    "James", "Kevin", "Stephen", "Luka", "Nikola", "Giannis", "Jayson", "Devin", "Anthony",
    "Joel", "Damian", "Jimmy", "Kawhi", "Chris", "Paul", "Trae", "Zion", "Ja", "Bam", "Jrue",
];

const LAST_NAMES: &[&str] = &[
    "Walker", "Brooks", "Hayes", "Turner", "Carter", "Mitchell", "Parker", "Collins", "Reed",
    "Morgan", "Bell", "Murphy", "Rivera", "Cooper", "Ward", "Foster", "Howard", "Gray", "Price",
    "Bennett",
];

const CITIES: &[&str] = &[
    "Harbor City", "Red Valley", "Northport", "Stonebridge", "Lakeside", "Westfield",
    "Granite Falls", "Silver Bay", "Oakmont", "Riverside",
];

const MASCOTS: &[&str] = &[
    "Hawks", "Wolves", "Comets", "Titans", "Falcons", "Storm", "Rangers", "Pilots", "Bears",
    "Knights",
];

const WORDS: &[&str] = &[
    "season", "court", "defense", "rebound", "assist", "clutch", "rookie", "veteran", "playoff",
    "trade", "coach", "streak", "record", "overtime", "buzzer", "roster", "injury", "comeback",
    "rivalry", "fans", "arena", "dunk", "three", "bench", "draft",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

/// A generated account before its password is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub member_since: DateTime<Utc>,
}

/// A generated comment on one of the caller's news items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeComment {
    pub body: String,
    pub author_id: i64,
    pub news_id: i64,
    pub timestamp: DateTime<Utc>,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

/// A sentence of `min..=max` words, capitalized and ending with a period.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> String {
    let count = rng.random_range(min.max(1)..=max.max(min.max(1)));
    let text = (0..count)
        .map(|_| pick(rng, WORDS))
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn paragraph<R: Rng + ?Sized>(rng: &mut R, sentences: usize) -> String {
    (0..sentences)
        .map(|_| sentence(rng, 6, 14))
        .collect::<Vec<_>>()
        .join(" ")
}

fn recent<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::minutes(rng.random_range(0..days.max(1) * 24 * 60))
}

pub fn fake_users<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<FakeUser> {
    (0..count)
        .map(|_| {
            let first = pick(rng, FIRST_NAMES).to_lowercase();
            let last = pick(rng, LAST_NAMES).to_lowercase();
            let n: u16 = rng.random_range(1..1000);
            let username = format!("{first}.{last}{n}");
            FakeUser {
                email: format!("{username}@{}", pick(rng, EMAIL_DOMAINS)),
                username,
                password: pick(rng, WORDS).to_string(),
                member_since: recent(rng, now, 365),
            }
        })
        .collect()
}

pub fn fake_teams<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<TeamDraft> {
    (0..count)
        .map(|_| {
            let name = format!("{} {}", pick(rng, CITIES), pick(rng, MASCOTS));
            TeamDraft::new(name).with_introduction(paragraph(rng, 3))
        })
        .collect()
}

/// Players spread randomly over `team_ids`; team-less when there are no teams.
pub fn fake_players<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    team_ids: &[i64],
) -> Vec<PlayerDraft> {
    (0..count)
        .map(|_| {
            let mut draft = PlayerDraft::new(full_name(rng)).with_introduction(sentence(rng, 8, 16));
            if let Some(team_id) = team_ids.choose(rng) {
                draft = draft.on_team(*team_id);
            }
            draft
        })
        .collect()
}

/// News published over the last year, each linked to at most one player and one team.
pub fn fake_news<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    player_ids: &[i64],
    team_ids: &[i64],
    now: DateTime<Utc>,
) -> Vec<NewsDraft> {
    (0..count)
        .map(|_| {
            let title = sentence(rng, 3, 8);
            let content = (0..rng.random_range(2..5))
                .map(|_| paragraph(rng, 4))
                .collect::<Vec<_>>()
                .join("\n\n");
            let timestamp = recent(rng, now, 365);
            let player = player_ids.choose(rng).copied();
            let team = team_ids.choose(rng).copied();
            NewsDraft::new(title, content)
                .with_players(player)
                .with_teams(team)
                .at(timestamp)
        })
        .collect()
}

/// Comments by random users on random news; empty unless both id lists are non-empty.
pub fn fake_comments<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    user_ids: &[i64],
    news_ids: &[i64],
    now: DateTime<Utc>,
) -> Vec<FakeComment> {
    if user_ids.is_empty() || news_ids.is_empty() {
        return Vec::new();
    }

    let mut comments = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(author_id), Some(news_id)) = (user_ids.choose(rng), news_ids.choose(rng)) else {
            break;
        };
        comments.push(FakeComment {
            body: sentence(rng, 3, 20),
            author_id: *author_id,
            news_id: *news_id,
            timestamp: recent(rng, now, 30),
        });
    }
    comments
}
