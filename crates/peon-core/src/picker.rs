//! Sound selection with anti-repetition.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::category::Category;
use crate::storage::{PersistentState, SoundPack};

/// Pick a sound file for `category`, avoiding the one played last time.
///
/// Returns `None` when the pack has no sounds for the category, or when every
/// entry of a multi-sound category names the last file played. On success the
/// choice is recorded in `state.last_played`; the caller owns persisting it.
pub fn pick_sound<R: Rng + ?Sized>(
    category: Category,
    state: &mut PersistentState,
    pack: &SoundPack,
    rng: &mut R,
) -> Option<String> {
    let sounds = pack.sounds(category);
    if sounds.is_empty() {
        return None;
    }

    let last = state.last_played(category);
    let candidates: Vec<_> = sounds
        .iter()
        .filter(|s| sounds.len() == 1 || Some(s.file.as_str()) != last)
        .collect();

    let file = candidates.choose(rng)?.file.clone();
    state.set_last_played(category, file.clone());
    tracing::debug!(%category, file = %file, "picked sound");
    Some(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{PackCategory, SoundEntry};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn pack_with(category: Category, files: &[&str]) -> SoundPack {
        let mut pack = SoundPack::default();
        pack.categories.insert(
            category.as_str().to_string(),
            PackCategory {
                sounds: files
                    .iter()
                    .map(|f| SoundEntry {
                        file: f.to_string(),
                        line: None,
                    })
                    .collect(),
            },
        );
        pack
    }

    #[test]
    fn empty_category_yields_none_and_leaves_state() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let mut state = PersistentState::default();
        let pack = pack_with(Category::Complete, &[]);
        assert_eq!(pick_sound(Category::Complete, &mut state, &pack, &mut rng), None);
        assert_eq!(pick_sound(Category::Error, &mut state, &pack, &mut rng), None);
        assert_eq!(state, PersistentState::default());
    }

    #[test]
    fn single_sound_always_chosen() {
        let mut rng = Mcg128Xsl64::seed_from_u64(2);
        let mut state = PersistentState::default();
        let pack = pack_with(Category::Greeting, &["Hello.wav"]);
        for _ in 0..5 {
            assert_eq!(
                pick_sound(Category::Greeting, &mut state, &pack, &mut rng).as_deref(),
                Some("Hello.wav")
            );
        }
        assert_eq!(state.last_played(Category::Greeting), Some("Hello.wav"));
    }

    #[test]
    fn two_sounds_alternate() {
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        let mut state = PersistentState::default();
        state.set_last_played(Category::Complete, "a.wav");
        let pack = pack_with(Category::Complete, &["a.wav", "b.wav"]);
        let picks: Vec<_> = (0..4)
            .map(|_| pick_sound(Category::Complete, &mut state, &pack, &mut rng).unwrap())
            .collect();
        assert_eq!(picks, vec!["b.wav", "a.wav", "b.wav", "a.wav"]);
    }

    #[test]
    fn stale_last_played_does_not_restrict() {
        let mut rng = Mcg128Xsl64::seed_from_u64(4);
        let mut state = PersistentState::default();
        state.set_last_played(Category::Error, "removed.wav");
        let pack = pack_with(Category::Error, &["x.wav", "y.wav"]);
        let file = pick_sound(Category::Error, &mut state, &pack, &mut rng).unwrap();
        assert!(file == "x.wav" || file == "y.wav");
    }

    #[test]
    fn duplicate_entries_of_last_file_are_not_repeated() {
        let mut rng = Mcg128Xsl64::seed_from_u64(5);
        let mut state = PersistentState::default();
        state.set_last_played(Category::Error, "same.wav");
        let pack = pack_with(Category::Error, &["same.wav", "same.wav"]);
        assert_eq!(pick_sound(Category::Error, &mut state, &pack, &mut rng), None);
        assert_eq!(state.last_played(Category::Error), Some("same.wav"));
    }

    #[test]
    fn categories_track_last_played_independently() {
        let mut rng = Mcg128Xsl64::seed_from_u64(6);
        let mut state = PersistentState::default();
        let mut pack = pack_with(Category::Complete, &["a.wav", "b.wav"]);
        pack.categories.extend(pack_with(Category::Error, &["e.wav"]).categories);
        let first = pick_sound(Category::Complete, &mut state, &pack, &mut rng).unwrap();
        pick_sound(Category::Error, &mut state, &pack, &mut rng).unwrap();
        let second = pick_sound(Category::Complete, &mut state, &pack, &mut rng).unwrap();
        assert_ne!(first, second);
        assert_eq!(state.last_played(Category::Error), Some("e.wav"));
    }

    proptest! {
        #[test]
        fn never_repeats_back_to_back(seed in any::<u64>(), count in 2usize..8, rounds in 2usize..30) {
            let files: Vec<String> = (0..count).map(|i| format!("s{i}.wav")).collect();
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let pack = pack_with(Category::Permission, &refs);
            let mut rng = Mcg128Xsl64::seed_from_u64(seed);
            let mut state = PersistentState::default();

            let mut previous = None;
            for _ in 0..rounds {
                let file = pick_sound(Category::Permission, &mut state, &pack, &mut rng).unwrap();
                prop_assert!(files.contains(&file));
                prop_assert_ne!(Some(file.clone()), previous);
                previous = Some(file);
            }
        }
    }
}
