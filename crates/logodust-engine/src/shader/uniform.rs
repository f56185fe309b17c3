/// Location of a uniform value: a member of a `var<uniform>` block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Byte offset inside the block.
    pub offset: u32,
    /// Byte size of the value.
    pub size: u32,
}

/// Layout of one `var<uniform>` global.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct UniformBlockLayout {
    pub group: u32,
    pub binding: u32,
    pub size: u32,
}

/// CPU staging copy of a uniform buffer.
///
/// Setters are no-ops when the location is absent, belongs to another block, or
/// has a different size than the written value. Nothing is ever written at a
/// guessed offset.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformBlockLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub(crate) fn new(layout: UniformBlockLayout) -> Self {
        Self {
            layout,
            bytes: vec![0; layout.size as usize],
        }
    }

    pub fn group(&self) -> u32 {
        self.layout.group
    }

    pub fn binding(&self) -> u32 {
        self.layout.binding
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_f32(&mut self, loc: Option<UniformLocation>, value: f32) {
        self.write(loc, bytemuck::bytes_of(&value));
    }

    pub fn set_u32(&mut self, loc: Option<UniformLocation>, value: u32) {
        self.write(loc, bytemuck::bytes_of(&value));
    }

    pub fn set_vec2(&mut self, loc: Option<UniformLocation>, value: [f32; 2]) {
        self.write(loc, bytemuck::cast_slice(&value));
    }

    pub fn set_vec4(&mut self, loc: Option<UniformLocation>, value: [f32; 4]) {
        self.write(loc, bytemuck::cast_slice(&value));
    }

    fn write(&mut self, loc: Option<UniformLocation>, data: &[u8]) {
        let Some(loc) = loc else { return };

        if loc.group != self.layout.group || loc.binding != self.layout.binding {
            log::trace!(
                "uniform write to @group({}) @binding({}) ignored by block @group({}) @binding({})",
                loc.group,
                loc.binding,
                self.layout.group,
                self.layout.binding
            );
            return;
        }
        if loc.size as usize != data.len() {
            log::trace!("uniform write of {} bytes ignored for a {}-byte member", data.len(), loc.size);
            return;
        }

        let start = loc.offset as usize;
        let Some(dst) = self.bytes.get_mut(start..start + data.len()) else { return };
        dst.copy_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> UniformBlock {
        UniformBlock::new(UniformBlockLayout { group: 0, binding: 0, size: 16 })
    }

    fn loc(offset: u32, size: u32) -> Option<UniformLocation> {
        Some(UniformLocation { group: 0, binding: 0, offset, size })
    }

    #[test]
    fn writes_at_offset() {
        let mut b = block();
        b.set_f32(loc(8, 4), 2.0);
        assert_eq!(&b.as_bytes()[8..12], &2.0f32.to_ne_bytes());
        assert!(b.as_bytes()[..8].iter().all(|&x| x == 0));
    }

    #[test]
    fn absent_location_is_noop() {
        let mut b = block();
        b.set_vec2(None, [1.0, 2.0]);
        assert!(b.as_bytes().iter().all(|&x| x == 0));
    }

    #[test]
    fn size_mismatch_is_noop() {
        let mut b = block();
        b.set_f32(loc(0, 8), 1.0);
        assert!(b.as_bytes().iter().all(|&x| x == 0));
    }

    #[test]
    fn other_block_is_noop() {
        let mut b = block();
        b.set_u32(Some(UniformLocation { group: 1, binding: 0, offset: 0, size: 4 }), 7);
        assert!(b.as_bytes().iter().all(|&x| x == 0));
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut b = block();
        b.set_vec2(loc(12, 8), [1.0, 1.0]);
        assert!(b.as_bytes().iter().all(|&x| x == 0));
    }
}
