use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Receives the resident byte footprint of each texture resource.
pub trait MemoryAccounting: Send + Sync {
    fn set_graphics_memory_size(&self, id: Uuid, bytes: u64);
}

/// Owns cached framebuffers that may reference render target textures.
pub trait RenderTargetCache: Send + Sync {
    /// Called before the driver objects of render target `id` are released.
    fn cleanup_render_texture(&self, id: Uuid);
}

/// Collaborators a texture reports to.
#[derive(Clone, Default)]
pub struct ResourceHooks {
    pub memory: Option<Arc<dyn MemoryAccounting>>,
    pub render_targets: Option<Arc<dyn RenderTargetCache>>,
}

impl ResourceHooks {
    pub fn with_memory(mut self, memory: Arc<dyn MemoryAccounting>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_render_targets(mut self, render_targets: Arc<dyn RenderTargetCache>) -> Self {
        self.render_targets = Some(render_targets);
        self
    }
}

impl std::fmt::Debug for ResourceHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHooks")
            .field("memory", &self.memory.is_some())
            .field("render_targets", &self.render_targets.is_some())
            .finish()
    }
}

/// Per-resource footprint table.
#[derive(Debug, Default)]
pub struct GraphicsMemoryStats {
    sizes: Mutex<FxHashMap<Uuid, u64>>,
}

impl GraphicsMemoryStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn size_of(&self, id: Uuid) -> u64 {
        self.sizes
            .lock()
            .map(|sizes| sizes.get(&id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.sizes
            .lock()
            .map(|sizes| sizes.values().sum())
            .unwrap_or(0)
    }
}

impl MemoryAccounting for GraphicsMemoryStats {
    fn set_graphics_memory_size(&self, id: Uuid, bytes: u64) {
        let Ok(mut sizes) = self.sizes.lock() else {
            log::error!("Graphics memory table is poisoned");
            return;
        };
        if bytes == 0 {
            sizes.remove(&id);
        } else {
            sizes.insert(id, bytes);
        }
    }
}
