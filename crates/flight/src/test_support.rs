//! Shared fakes for collaborator tests.

use renderer::{MeshData, MeshId, MeshStore};

/// Hands out sequential ids and remembers what was uploaded.
#[derive(Default)]
pub struct CountingStore {
    pub uploaded: Vec<MeshData>,
}

impl MeshStore for CountingStore {
    fn upload_mesh(&mut self, data: &MeshData) -> MeshId {
        self.uploaded.push(data.clone());
        MeshId(self.uploaded.len() as u32 - 1)
    }
}
