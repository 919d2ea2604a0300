use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "brisk", "calm", "clever", "eager", "gentle", "happy", "keen", "lively", "quiet", "swift",
    "bold", "bright", "merry", "proud", "witty",
];

const NOUNS: &[&str] = &[
    "falcon", "otter", "maple", "harbor", "meadow", "comet", "ridge", "willow", "ember", "drift",
    "badger", "heron", "cedar", "summit", "brook",
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carla", "Derek", "Elena", "Farid", "Greta", "Hugo", "Irene", "Jonas",
    "Katya", "Liam", "Mona", "Nils", "Olga", "Pavel",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Berger", "Costa", "Dietrich", "Eriksen", "Fischer", "Garcia", "Hansen",
    "Ivanov", "Jensen", "Keller", "Lindqvist", "Moreau", "Novak",
];

const COUNTRIES: &[&str] = &[
    "Portugal", "Germany", "Norway", "Spain", "Poland", "France", "Denmark", "Austria",
    "Netherlands", "Czechia",
];

const CITIES: &[&str] = &[
    "Lisbon", "Berlin", "Oslo", "Madrid", "Warsaw", "Lyon", "Aarhus", "Graz", "Utrecht", "Brno",
];

const GENDERS: &[&str] = &["female", "male", "nonbinary"];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "amet", "tempor", "incidunt", "labore", "magna", "aliqua",
    "veniam", "nostrud", "ullamco", "laboris", "aliquip", "commodo", "consequat", "voluptate",
    "cupidatat", "proident", "mollit",
];

pub const FRIEND_STATUSES: &[&str] = &["pending", "accepted"];

fn pick<'a>(words: &[&'a str]) -> &'a str {
    words.choose(&mut rand::thread_rng()).copied().unwrap_or("")
}

pub fn username() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..100_000);
    format!("{}_{}{}", pick(ADJECTIVES), pick(NOUNS), n)
}

pub fn email(username: &str) -> String {
    format!("{username}@example.net")
}

pub fn first_name() -> String {
    pick(FIRST_NAMES).to_string()
}

pub fn last_name() -> String {
    pick(LAST_NAMES).to_string()
}

pub fn country() -> String {
    pick(COUNTRIES).to_string()
}

pub fn city() -> String {
    pick(CITIES).to_string()
}

pub fn gender() -> String {
    pick(GENDERS).to_string()
}

pub fn phone() -> String {
    let mut rng = rand::thread_rng();
    format!("+{}{:09}", rng.gen_range(1..100), rng.gen_range(0..1_000_000_000u32))
}

pub fn street_address() -> String {
    let n: u32 = rand::thread_rng().gen_range(1..300);
    format!("{} {} street", n, pick(NOUNS))
}

pub fn friend_status() -> String {
    pick(FRIEND_STATUSES).to_string()
}

/// A lorem-style run of `count` words.
pub fn sentence(count: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        words.push(*WORDS.choose(&mut rng).unwrap_or(&"lorem"));
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_has_adjective_noun_and_number() {
        let name = username();
        let parts: Vec<&str> = name.splitn(2, '_').collect();
        assert_eq!(parts.len(), 2);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(parts[1].chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn email_embeds_the_username() {
        let email = email("brisk_otter42");
        assert_eq!(email, "brisk_otter42@example.net");
    }

    #[test]
    fn sentence_has_requested_word_count() {
        let s = sentence(5);
        assert_eq!(s.split_whitespace().count(), 5);
    }

    #[test]
    fn friend_status_is_recognized() {
        assert!(FRIEND_STATUSES.contains(&friend_status().as_str()));
    }
}
