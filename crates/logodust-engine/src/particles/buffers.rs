use wgpu::util::DeviceExt;

use crate::error::{check_dispatch, check_storage_buffer, AllocationError};

use super::ping_pong::PingPong;
use super::record::ParticleRecord;
use super::simulation::WORKGROUP_SIZE;

/// How a new particle set reaches the GPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Upload {
    /// No buffers yet: create both.
    Allocate,
    /// Same count: overwrite both buffers in place.
    InPlace,
    /// Count changed: drop both and create new ones.
    Reallocate,
    /// Empty set: drop the buffers; zero-sized storage cannot be bound.
    Release,
}

pub fn plan_upload(current: Option<u32>, new_count: u32) -> Upload {
    match current {
        _ if new_count == 0 => Upload::Release,
        None => Upload::Allocate,
        Some(count) if count == new_count => Upload::InPlace,
        Some(_) => Upload::Reallocate,
    }
}

/// The two particle buffers.
///
/// Both always hold the same number of records. `generation` changes whenever
/// the underlying buffers are replaced.
pub struct ParticleBuffers {
    slots: PingPong<wgpu::Buffer>,
    count: u32,
    generation: u64,
}

impl ParticleBuffers {
    /// Creates both buffers, each initialized with `records`.
    ///
    /// Fails when the buffers or the advection dispatch over them exceed the
    /// device limits.
    pub fn allocate(
        device: &wgpu::Device,
        records: &[ParticleRecord],
        generation: u64,
    ) -> Result<Self, AllocationError> {
        let bytes: &[u8] = bytemuck::cast_slice(records);
        let limits = device.limits();
        check_storage_buffer(&limits, "particle buffer", bytes.len() as u64)?;
        let count = u32::try_from(records.len()).map_err(|_| AllocationError::BufferTooLarge {
            what: "particle buffer",
            requested: bytes.len() as u64,
            limit: limits.max_storage_buffer_binding_size as u64,
        })?;
        check_dispatch(&limits, "particle advection", count, WORKGROUP_SIZE)?;

        let make = |label: &str| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        };

        Ok(Self {
            slots: PingPong::new(make("logodust particles a"), make("logodust particles b")),
            count,
            generation,
        })
    }

    /// Installs a new particle set, allocating or reusing buffers as needed.
    ///
    /// On error `current` is left untouched.
    pub fn upload(
        current: &mut Option<ParticleBuffers>,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        records: &[ParticleRecord],
    ) -> Result<Upload, AllocationError> {
        let new_count = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let plan = plan_upload(current.as_ref().map(|b| b.count), new_count);

        if plan == Upload::Release {
            if current.take().is_some() {
                log::debug!("particle buffers released for an empty logo");
            }
            return Ok(plan);
        }

        if let (Upload::InPlace, Some(buffers)) = (plan, current.as_ref()) {
            let bytes: &[u8] = bytemuck::cast_slice(records);
            for buffer in buffers.slots.iter() {
                queue.write_buffer(buffer, 0, bytes);
            }
            return Ok(plan);
        }

        let generation = current.as_ref().map_or(0, |b| b.generation + 1);
        *current = Some(Self::allocate(device, records, generation)?);
        log::debug!("particle buffers allocated: {new_count} records ({plan:?})");

        Ok(plan)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn read(&self) -> &wgpu::Buffer {
        self.slots.read()
    }

    pub fn write(&self) -> &wgpu::Buffer {
        self.slots.write()
    }

    pub fn read_index(&self) -> usize {
        self.slots.read_index()
    }

    pub fn slot(&self, index: usize) -> &wgpu::Buffer {
        self.slots.slot(index)
    }

    pub fn swap(&mut self) {
        self.slots.swap();
    }

    pub fn reset(&mut self) {
        self.slots.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upload_allocates() {
        assert_eq!(plan_upload(None, 10), Upload::Allocate);
    }

    #[test]
    fn same_count_reuses_buffers() {
        assert_eq!(plan_upload(Some(10), 10), Upload::InPlace);
    }

    #[test]
    fn count_change_reallocates() {
        assert_eq!(plan_upload(Some(10), 11), Upload::Reallocate);
        assert_eq!(plan_upload(Some(10), 3), Upload::Reallocate);
    }

    #[test]
    fn empty_set_releases() {
        assert_eq!(plan_upload(Some(10), 0), Upload::Release);
        assert_eq!(plan_upload(None, 0), Upload::Release);
    }

    // ── on a device (skipped without an adapter) ──

    fn records(n: usize) -> Vec<ParticleRecord> {
        (0..n).map(|i| ParticleRecord::at_rest([i as f32, 0.0], 1.0)).collect()
    }

    #[test]
    fn upload_paths_track_generation_and_read_slot() {
        let Some((device, queue)) = crate::render::headless::device() else { return };
        let mut current = None;

        let plan = ParticleBuffers::upload(&mut current, &device, &queue, &records(4)).unwrap();
        assert_eq!(plan, Upload::Allocate);
        let buffers = current.as_mut().unwrap();
        assert_eq!((buffers.count(), buffers.generation()), (4, 0));
        buffers.swap();

        let plan = ParticleBuffers::upload(&mut current, &device, &queue, &records(4)).unwrap();
        assert_eq!(plan, Upload::InPlace);
        let buffers = current.as_ref().unwrap();
        assert_eq!(buffers.generation(), 0);
        assert_eq!(buffers.read_index(), 1);

        let plan = ParticleBuffers::upload(&mut current, &device, &queue, &records(7)).unwrap();
        assert_eq!(plan, Upload::Reallocate);
        let buffers = current.as_ref().unwrap();
        assert_eq!((buffers.count(), buffers.generation(), buffers.read_index()), (7, 1, 0));
        assert_eq!(buffers.read().size(), 7 * 32);

        let plan = ParticleBuffers::upload(&mut current, &device, &queue, &[]).unwrap();
        assert_eq!(plan, Upload::Release);
        assert!(current.is_none());
    }
}
