//! Per-block-type listener registries and the command buffer listeners write
//! into.
//!
//! Listeners never see the world directly. They read the block data handed
//! to them and push [`Command`]s; the world applies those on the control
//! thread once dispatch for the current event is over.

use std::panic::{AssertUnwindSafe, catch_unwind};

use hashbrown::HashMap;
use loam_blocks::{BlockType, Face, ParamKind};
use loam_world::WorldPos;
use thiserror::Error;

use crate::world::SetBlockSettings;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listener failed: {0}")]
    Failed(String),
}

impl From<&str> for ListenerError {
    fn from(value: &str) -> Self {
        ListenerError::Failed(value.to_string())
    }
}

/// One voxel as seen by a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockData {
    pub pos: WorldPos,
    pub block: BlockType,
    params: [Option<u8>; ParamKind::ALL.len()],
}

impl BlockData {
    pub fn new(pos: WorldPos, block: BlockType) -> Self {
        Self {
            pos,
            block,
            params: [None; ParamKind::ALL.len()],
        }
    }

    pub fn with_param(mut self, kind: ParamKind, value: Option<u8>) -> Self {
        self.params[kind as usize] = value;
        self
    }

    #[inline]
    pub fn param(&self, kind: ParamKind) -> Option<u8> {
        self.params[kind as usize]
    }
}

/// Face-adjacent voxels in `Face::ALL` order; `None` past the world's
/// vertical extent or inside an unloaded chunk.
pub type Neighbors = [Option<BlockData>; 6];

#[inline]
pub fn neighbor(neighbors: &Neighbors, face: Face) -> Option<&BlockData> {
    neighbors[face.index()].as_ref()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetBlock {
        pos: WorldPos,
        block: BlockType,
        params: Vec<(ParamKind, u8)>,
        /// Handed to the destroy and place listeners of this edit.
        args: Vec<i32>,
        settings: SetBlockSettings,
    },
    Schedule {
        pos: WorldPos,
        delay: u32,
        args: Vec<i32>,
    },
}

#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, pos: WorldPos, block: BlockType, settings: SetBlockSettings) {
        self.set_block_with_args(pos, block, &[], &[], settings);
    }

    pub fn set_block_with(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        params: &[(ParamKind, u8)],
        settings: SetBlockSettings,
    ) {
        self.set_block_with_args(pos, block, params, &[], settings);
    }

    pub fn set_block_with_args(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        params: &[(ParamKind, u8)],
        args: &[i32],
        settings: SetBlockSettings,
    ) {
        self.queue.push(Command::SetBlock {
            pos,
            block,
            params: params.to_vec(),
            args: args.to_vec(),
            settings,
        });
    }

    pub fn schedule(&mut self, pos: WorldPos, delay: u32, args: &[i32]) {
        self.queue.push(Command::Schedule {
            pos,
            delay,
            args: args.to_vec(),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

pub type UpdateListener =
    Box<dyn FnMut(&mut Commands, &BlockData, &Neighbors, &[i32]) -> Result<(), ListenerError>>;
pub type BlockListener =
    Box<dyn FnMut(&mut Commands, &BlockData, &[i32]) -> Result<(), ListenerError>>;

/// Listeners for one event kind. A listener may be keyed by several types;
/// it is stored once and invoked in registration order.
struct Registry<L> {
    listeners: Vec<L>,
    by_type: HashMap<BlockType, Vec<usize>>,
}

impl<L> Default for Registry<L> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            by_type: HashMap::new(),
        }
    }
}

impl<L> Registry<L> {
    fn register(&mut self, types: &[BlockType], listener: L) {
        let id = self.listeners.len();
        self.listeners.push(listener);
        for ty in types {
            let ids = self.by_type.entry(*ty).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    fn count(&self, ty: BlockType) -> usize {
        self.by_type.get(&ty).map_or(0, Vec::len)
    }

    /// Invokes every listener keyed by `ty`; returns how many failed.
    fn dispatch(
        &mut self,
        ty: BlockType,
        event: &'static str,
        mut call: impl FnMut(&mut L) -> Result<(), ListenerError>,
    ) -> usize {
        let Some(ids) = self.by_type.get(&ty) else {
            return 0;
        };
        let mut failures = 0;
        for &id in ids {
            let listener = &mut self.listeners[id];
            match catch_unwind(AssertUnwindSafe(|| call(listener))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    log::warn!(target: "events", "{} listener #{} for {:?}: {}", event, id, ty, e);
                }
                Err(_) => {
                    failures += 1;
                    log::warn!(target: "events", "{} listener #{} for {:?} panicked", event, id, ty);
                }
            }
        }
        failures
    }
}

#[derive(Default)]
pub struct BlockEvents {
    update: Registry<UpdateListener>,
    place: Registry<BlockListener>,
    destroy: Registry<BlockListener>,
}

impl BlockEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update<F>(&mut self, types: &[BlockType], f: F)
    where
        F: FnMut(&mut Commands, &BlockData, &Neighbors, &[i32]) -> Result<(), ListenerError>
            + 'static,
    {
        self.update.register(types, Box::new(f));
    }

    pub fn on_place<F>(&mut self, types: &[BlockType], f: F)
    where
        F: FnMut(&mut Commands, &BlockData, &[i32]) -> Result<(), ListenerError> + 'static,
    {
        self.place.register(types, Box::new(f));
    }

    pub fn on_destroy<F>(&mut self, types: &[BlockType], f: F)
    where
        F: FnMut(&mut Commands, &BlockData, &[i32]) -> Result<(), ListenerError> + 'static,
    {
        self.destroy.register(types, Box::new(f));
    }

    pub fn update_listeners(&self, ty: BlockType) -> usize {
        self.update.count(ty)
    }

    pub(crate) fn dispatch_update(
        &mut self,
        cmds: &mut Commands,
        this: &BlockData,
        neighbors: &Neighbors,
        args: &[i32],
    ) -> usize {
        self.update
            .dispatch(this.block, "update", |l| l(cmds, this, neighbors, args))
    }

    pub(crate) fn dispatch_place(
        &mut self,
        cmds: &mut Commands,
        this: &BlockData,
        args: &[i32],
    ) -> usize {
        self.place.dispatch(this.block, "place", |l| l(cmds, this, args))
    }

    pub(crate) fn dispatch_destroy(
        &mut self,
        cmds: &mut Commands,
        this: &BlockData,
        args: &[i32],
    ) -> usize {
        self.destroy
            .dispatch(this.block, "destroy", |l| l(cmds, this, args))
    }
}
