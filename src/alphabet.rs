//! Substitute characters used to obscure display cells.

use std::sync::Arc;

use rand::Rng;

use crate::error::ConfigError;

/// Uppercase letters, digits and a few symbols.
pub const DEFAULT_GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Immutable pool of substitute characters.
///
/// Clones share the same backing slice, so one alphabet can feed any number
/// of engines without copying or locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    glyphs: Arc<[char]>,
}

impl Alphabet {
    /// Builds an alphabet from `glyphs`, dropping repeated characters.
    pub fn new(glyphs: &str) -> Result<Self, ConfigError> {
        let mut unique: Vec<char> = Vec::with_capacity(glyphs.len());
        for ch in glyphs.chars() {
            if !unique.contains(&ch) {
                unique.push(ch);
            }
        }

        if unique.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        Ok(Self {
            glyphs: unique.into(),
        })
    }

    /// Uniformly random member.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.chars().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn default_pool_has_letters_digits_and_symbols() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 44);
        assert!(alphabet.contains('Z'));
        assert!(alphabet.contains('7'));
        assert!(alphabet.contains('&'));
        assert!(!alphabet.contains('a'));
    }

    #[test]
    fn new_drops_duplicates_in_order() {
        let alphabet = Alphabet::new("xyxzy").unwrap();
        assert_eq!(alphabet.as_slice(), &['x', 'y', 'z']);
    }

    #[test]
    fn new_rejects_empty_input() {
        assert_eq!(Alphabet::new(""), Err(ConfigError::EmptyAlphabet));
    }

    #[test]
    fn pick_stays_in_pool() {
        let alphabet = Alphabet::new("#*").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(alphabet.contains(alphabet.pick(&mut rng)));
        }
    }
}
