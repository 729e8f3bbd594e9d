// src/crowd/instancing.rs - Per-instance transform and frame-index buffers
use bevy::math::Mat4;
use bevy::prelude::Resource;

/// CPU mirror of the instanced pedestrian buffers. Sized once to the pool
/// capacity and rewritten in full every tick.
#[derive(Resource, Debug, Clone)]
pub struct InstanceBuffers {
    matrices: Vec<Mat4>,
    frame_indices: Vec<f32>,
    written: Vec<bool>,
    needs_update: bool,
}

impl InstanceBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; capacity],
            frame_indices: vec![0.0; capacity],
            written: vec![false; capacity],
            needs_update: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.matrices.len()
    }

    pub fn frame_indices(&self) -> &[f32] {
        &self.frame_indices
    }

    pub fn matrix_at(&self, index: usize) -> Mat4 {
        self.assert_index(index);
        self.matrices[index]
    }

    pub fn frame_at(&self, index: usize) -> f32 {
        self.assert_index(index);
        self.frame_indices[index]
    }

    pub fn begin_frame(&mut self) {
        self.written.fill(false);
    }

    pub fn set_matrix_at(&mut self, index: usize, matrix: Mat4) {
        self.assert_index(index);
        self.matrices[index] = matrix;
        self.written[index] = true;
    }

    pub fn set_frame_at(&mut self, index: usize, frame: f32) {
        self.assert_index(index);
        self.frame_indices[index] = frame;
    }

    /// Matrix slots written since the last `begin_frame`.
    pub fn written_this_frame(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }

    pub fn mark_updated(&mut self) {
        self.needs_update = true;
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Clears the upload flag, returning whether an upload was due.
    pub fn take_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.matrices.len(),
            "instance index {} out of range (capacity {})",
            index,
            self.matrices.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    #[test]
    fn upload_flag_is_consumed_once() {
        let mut buffers = InstanceBuffers::new(4);
        assert!(!buffers.take_update());
        buffers.mark_updated();
        assert!(buffers.take_update());
        assert!(!buffers.take_update());
    }

    #[test]
    fn written_slots_reset_each_frame() {
        let mut buffers = InstanceBuffers::new(3);
        buffers.set_matrix_at(1, Mat4::from_translation(Vec3::X));
        buffers.set_matrix_at(1, Mat4::from_translation(Vec3::Y));
        assert_eq!(buffers.written_this_frame(), 1);
        assert_eq!(buffers.matrix_at(1).w_axis.truncate(), Vec3::Y);
        buffers.begin_frame();
        assert_eq!(buffers.written_this_frame(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn writing_past_capacity_panics() {
        let mut buffers = InstanceBuffers::new(2);
        buffers.set_frame_at(2, 1.0);
    }
}
