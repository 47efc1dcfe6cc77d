use loam_blocks::BlockType;
use loam_world::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, GRID_LEN, GRID_X, GRID_Z, LocalPos, to_index};

/// One chunk's blocks plus its mirrored one-cell border, and the biome index
/// of every column (border columns included).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    pub coord: ChunkCoord,
    pub blocks: Vec<BlockType>,
    pub biomes: Vec<u8>,
}

impl ChunkGrid {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockType::Air; GRID_LEN],
            biomes: vec![0; (GRID_X * GRID_Z) as usize],
        }
    }

    /// Reuses the allocation for another coordinate.
    pub fn reset(&mut self, coord: ChunkCoord) {
        self.coord = coord;
        self.blocks.fill(BlockType::Air);
        self.biomes.fill(0);
    }

    #[inline]
    pub fn idx(x: i32, y: i32, z: i32) -> usize {
        to_index(x, y, z)
    }

    /// Unchecked in the sense of the grid contract: out-of-grid positions panic.
    #[inline]
    pub fn get(&self, pos: LocalPos) -> BlockType {
        self.blocks[pos.index()]
    }

    #[inline]
    pub fn get_xyz(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks[to_index(x, y, z)]
    }

    #[inline]
    pub fn get_checked(&self, pos: LocalPos) -> Option<BlockType> {
        pos.in_grid().then(|| self.blocks[pos.index()])
    }

    #[inline]
    pub fn set(&mut self, pos: LocalPos, block: BlockType) {
        self.blocks[pos.index()] = block;
    }

    #[inline]
    fn column(x: i32, z: i32) -> usize {
        (x + GRID_X * z) as usize
    }

    #[inline]
    pub fn biome_at(&self, x: i32, z: i32) -> u8 {
        self.biomes[Self::column(x, z)]
    }

    #[inline]
    pub fn set_biome(&mut self, x: i32, z: i32, biome: u8) {
        self.biomes[Self::column(x, z)] = biome;
    }

    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// Interior cells only; mirrored border cells belong to neighbors.
    pub fn count_interior(&self, block: BlockType) -> usize {
        let mut n = 0;
        for z in 1..=CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                for x in 1..=CHUNK_WIDTH {
                    if self.get_xyz(x, y, z) == block {
                        n += 1;
                    }
                }
            }
        }
        n
    }

    /// Fills the border ring with `block`. Used when a border's true contents
    /// are unknown until neighbors sync.
    pub fn fill_border(&mut self, block: BlockType) {
        for z in 0..GRID_Z {
            for x in 0..GRID_X {
                if LocalPos::new(x, 0, z).is_interior() {
                    continue;
                }
                for y in 0..CHUNK_HEIGHT {
                    self.blocks[to_index(x, y, z)] = block;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access_rejects_out_of_grid() {
        let g = ChunkGrid::new(ChunkCoord::new(0, 0));
        assert_eq!(g.get_checked(LocalPos::new(0, 0, 0)), Some(BlockType::Air));
        assert_eq!(g.get_checked(LocalPos::new(18, 0, 0)), None);
        assert_eq!(g.get_checked(LocalPos::new(1, CHUNK_HEIGHT, 1)), None);
        assert_eq!(g.get_checked(LocalPos::new(1, -1, 1)), None);
    }

    #[test]
    fn fill_border_leaves_interior() {
        let mut g = ChunkGrid::new(ChunkCoord::new(0, 0));
        g.fill_border(BlockType::Stone);
        assert_eq!(g.get_xyz(0, 5, 5), BlockType::Stone);
        assert_eq!(g.get_xyz(17, 5, 17), BlockType::Stone);
        assert_eq!(g.get_xyz(1, 5, 1), BlockType::Air);
        assert_eq!(g.count_interior(BlockType::Stone), 0);
    }
}
