//! Placeholder usernames for profiles created without an explicit name.

use rand::Rng;
use rand::seq::SliceRandom;

pub const ADJECTIVES: [&str; 10] = [
    "Sparky", "Funky", "Vibrant", "Playful", "Brave", "Bright", "Clever", "Witty", "Curious",
    "Cheerful",
];

pub const NOUNS: [&str; 10] = [
    "Fox", "Lion", "Panda", "Owl", "Dolphin", "Eagle", "Koala", "Tiger", "Rabbit", "Wolf",
];

/// `{Adjective}{Noun}{10..=99}`, e.g. `BraveOwl42`. Not for anything secret.
pub fn generate() -> String {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or(ADJECTIVES[0]);
    let noun = NOUNS.choose(rng).copied().unwrap_or(NOUNS[0]);
    let number: u8 = rng.gen_range(10..=99);
    format!("{adjective}{noun}{number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn split(name: &str) -> (&str, u32) {
        let idx = name.find(|c: char| c.is_ascii_digit()).unwrap();
        (&name[..idx], name[idx..].parse().unwrap())
    }

    #[test]
    fn test_shape_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let name = generate_with(&mut rng);
            let (letters, number) = split(&name);
            assert!(letters.chars().all(|c| c.is_ascii_alphabetic()), "{name}");
            assert_eq!(name.len() - letters.len(), 2, "{name}");
            assert!((10..=99).contains(&number), "{name}");
        }
    }

    #[test]
    fn test_words_come_from_lists() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let name = generate_with(&mut rng);
            let (letters, _) = split(&name);
            let adjective = ADJECTIVES.iter().find(|a| letters.starts_with(*a)).unwrap();
            let rest = &letters[adjective.len()..];
            assert!(NOUNS.contains(&rest), "{name}");
        }
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let a = generate_with(&mut StdRng::seed_from_u64(3));
        let b = generate_with(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
