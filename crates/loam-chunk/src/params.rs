use hashbrown::HashMap;
use loam_blocks::ParamKind;
use loam_world::LocalPos;

/// A voxel may hold one value per `ParamKind` at the same time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKey {
    pub pos: LocalPos,
    pub kind: ParamKind,
}

impl ParamKey {
    #[inline]
    pub const fn new(pos: LocalPos, kind: ParamKind) -> Self {
        Self { pos, kind }
    }
}

/// Sparse per-voxel parameter store; most voxels have no entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockParams {
    map: HashMap<ParamKey, u8>,
}

impl BlockParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, pos: LocalPos, kind: ParamKind) -> Option<u8> {
        self.map.get(&ParamKey::new(pos, kind)).copied()
    }

    /// Stored value or the kind's documented default (full source for liquids).
    #[inline]
    pub fn get_or_default(&self, pos: LocalPos, kind: ParamKind) -> u8 {
        self.get(pos, kind).unwrap_or(kind.default_value())
    }

    #[inline]
    pub fn set(&mut self, pos: LocalPos, kind: ParamKind, value: u8) {
        self.map.insert(ParamKey::new(pos, kind), value);
    }

    #[inline]
    pub fn remove(&mut self, pos: LocalPos, kind: ParamKind) -> Option<u8> {
        self.map.remove(&ParamKey::new(pos, kind))
    }

    /// Drops every kind stored at `pos`.
    pub fn remove_all(&mut self, pos: LocalPos) {
        for kind in ParamKind::ALL {
            self.map.remove(&ParamKey::new(pos, kind));
        }
    }

    /// Replaces everything stored at `dst` with what `src` holds at `src_pos`.
    pub fn copy_cell(&mut self, dst: LocalPos, src: &BlockParams, src_pos: LocalPos) {
        for kind in ParamKind::ALL {
            match src.get(src_pos, kind) {
                Some(v) => self.set(dst, kind, v),
                None => {
                    self.remove(dst, kind);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, u8)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_all_clears_every_kind() {
        let mut p = BlockParams::new();
        let at = LocalPos::new(3, 4, 5);
        p.set(at, ParamKind::LiquidSource, 6);
        p.set(at, ParamKind::Rotation, 2);
        p.set(at, ParamKind::PlantVariant, 1);
        p.set(LocalPos::new(3, 5, 5), ParamKind::Rotation, 1);
        assert_eq!(p.len(), 4);
        p.remove_all(at);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(at, ParamKind::Rotation), None);
    }

    #[test]
    fn missing_liquid_source_defaults_to_full() {
        let p = BlockParams::new();
        let at = LocalPos::new(1, 1, 1);
        assert_eq!(p.get(at, ParamKind::LiquidSource), None);
        assert_eq!(p.get_or_default(at, ParamKind::LiquidSource), loam_blocks::LIQUID_FULL);
        assert_eq!(p.get_or_default(at, ParamKind::Rotation), 0);
    }
}
