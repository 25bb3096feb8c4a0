//! Save-file parser
//!
//! Heroes III saves (`.GM1`..`.GM6`) are gzip containers around the binary
//! game data. Full binary decoding is out of scope; [`SaveParser`] validates
//! the container and yields a placeholder extraction of the visible state.
//! [`ParseSave`] is the seam where a real decoder plugs in.

use std::fs;
use std::path::Path;

use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{ArmySlot, GameState, Hero, MapPos, PrimaryStats, Tile};

/// Gzip stream magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parse step invoked by the watcher for each accepted save file
pub trait ParseSave: Send + Sync {
    /// Extract the visible game state from a save file.
    ///
    /// May fail for any unreadable, malformed or unsupported input; the
    /// caller logs and drops the event.
    fn parse(&self, path: &Path) -> AdvisorResult<GameState>;
}

/// Default parser: container validation plus placeholder extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveParser;

impl SaveParser {
    pub fn new() -> Self {
        Self
    }

    // TODO: replace with real .GMx decoding (heroes, towns, fog of war)
    // once a save-format decoder lands behind ParseSave.
    fn extract_game_state(&self) -> GameState {
        GameState {
            turn: 28,
            current_player: 0,
            visible_tiles: vec![
                Tile {
                    x: 34,
                    y: 17,
                    obj: "GoldMine".to_string(),
                    owner: None,
                },
                Tile {
                    x: 35,
                    y: 17,
                    obj: "CrystalCavern".to_string(),
                    owner: Some(0),
                },
            ],
            heroes: vec![Hero {
                name: "Ivor".to_string(),
                location: MapPos { x: 34, y: 17 },
                army: vec![ArmySlot {
                    creature_id: 17,
                    count: 87,
                }],
                movement_left: 578,
                primary_stats: PrimaryStats {
                    attack: 9,
                    defense: 10,
                    spell_power: 4,
                    knowledge: 4,
                },
                mana: None,
                experience: None,
                level: None,
                skills: None,
                spells: None,
                artifacts: None,
            }],
            towns: vec![],
            resources: None,
        }
    }
}

impl ParseSave for SaveParser {
    fn parse(&self, path: &Path) -> AdvisorResult<GameState> {
        let data = fs::read(path).map_err(|e| AdvisorError::ParseFailed {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if data.len() < 2 || data[..2] != GZIP_MAGIC {
            return Err(AdvisorError::ParseFailed {
                file: path.to_path_buf(),
                message: "not a gzip container".to_string(),
            });
        }

        Ok(self.extract_game_state())
    }
}

/// Minimal gzip header; enough to pass the container check in test fixtures
#[cfg(test)]
pub(crate) const GZIP_STUB: &[u8] = &[0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_valid_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game1.gm1");
        fs::write(&path, GZIP_STUB).unwrap();

        let state = SaveParser::new().parse(&path).unwrap();
        assert_eq!(state.turn, 28);
        assert_eq!(state.current_player, 0);
        assert!(!state.heroes.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_gzip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game1.gm1");
        fs::write(&path, b"plain text, not a save").unwrap();

        let result = SaveParser::new().parse(&path);
        assert!(matches!(result, Err(AdvisorError::ParseFailed { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let result = SaveParser::new().parse(&dir.path().join("gone.gm1"));
        assert!(matches!(result, Err(AdvisorError::ParseFailed { .. })));
    }

    #[test]
    fn test_parse_rejects_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game1.gm1");
        fs::write(&path, [0x1f]).unwrap();

        assert!(SaveParser::new().parse(&path).is_err());
    }
}
