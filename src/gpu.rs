// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! GPU residency capability
//!
//! The mesh never owns GPU resources. A renderer that uploads a mesh
//! registers itself through [`Mesh::bind_gpu`](crate::geometry::Mesh::bind_gpu)
//! and is called back on [`GpuBackend::unload_mesh`] when the mesh is
//! dropped while still resident. The backref is a `Weak` so a renderer
//! torn down before its meshes is simply skipped.

use std::rc::{Rc, Weak};

/// Opaque identifier for a mesh's GPU-side storage, issued by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuMeshHandle(pub u64);

/// Capability a renderer provides so meshes can release GPU-side storage.
///
/// Single-threaded by design; meshes hold the backend through `Rc`/`Weak`.
pub trait GpuBackend {
    /// Release the GPU-side storage identified by `handle`.
    fn unload_mesh(&self, handle: GpuMeshHandle);
}

/// A mesh's record of being uploaded: who uploaded it and under which handle.
#[derive(Clone)]
pub struct GpuResidency {
    backend: Weak<dyn GpuBackend>,
    handle: GpuMeshHandle,
}

impl GpuResidency {
    pub fn new(backend: &Rc<dyn GpuBackend>, handle: GpuMeshHandle) -> Self {
        Self {
            backend: Rc::downgrade(backend),
            handle,
        }
    }

    pub fn handle(&self) -> GpuMeshHandle {
        self.handle
    }

    /// Invoke the backend's unload hook if the backend is still alive.
    pub fn unload(&self) {
        if let Some(backend) = self.backend.upgrade() {
            backend.unload_mesh(self.handle);
        }
    }
}

impl std::fmt::Debug for GpuResidency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuResidency")
            .field("handle", &self.handle)
            .field("backend_alive", &(self.backend.strong_count() > 0))
            .finish()
    }
}
