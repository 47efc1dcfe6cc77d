use loam_world::{ChunkCoord, LocalPos};

/// Which of the eight neighbors mirror a cell written during a pass. Bit `i`
/// corresponds to `ChunkCoord::NEIGHBOR_OFFSETS[i]`.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct BorderFlags(u8);

impl BorderFlags {
    pub fn mark(&mut self, pos: LocalPos) {
        for (off, _) in pos.mirror_targets() {
            if let Some(i) = ChunkCoord::NEIGHBOR_OFFSETS.iter().position(|o| *o == off) {
                self.0 |= 1 << i;
            }
        }
    }

    #[inline]
    pub fn any(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub fn contains(self, offset: (i32, i32)) -> bool {
        ChunkCoord::NEIGHBOR_OFFSETS
            .iter()
            .position(|o| *o == offset)
            .is_some_and(|i| self.0 & (1 << i) != 0)
    }

    pub fn offsets(self) -> impl Iterator<Item = (i32, i32)> {
        ChunkCoord::NEIGHBOR_OFFSETS
            .into_iter()
            .enumerate()
            .filter(move |(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, o)| o)
    }
}

impl std::fmt::Debug for BorderFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.offsets()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_write_flags_three_neighbors() {
        let mut f = BorderFlags::default();
        assert!(!f.any());
        f.mark(LocalPos::new(1, 4, 16));
        let mut got: Vec<_> = f.offsets().collect();
        got.sort();
        assert_eq!(got, vec![(-1, 0), (-1, 1), (0, 1)]);
        assert!(f.contains((-1, 1)));
        assert!(!f.contains((1, 0)));
    }

    #[test]
    fn inner_write_flags_nothing() {
        let mut f = BorderFlags::default();
        f.mark(LocalPos::new(8, 4, 8));
        assert!(!f.any());
    }
}
